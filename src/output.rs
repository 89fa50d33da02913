//! User-facing console lines, separate from the tracing log stream.
//! Prefixes are colored only when stdout is a TTY.

use owo_colors::OwoColorize;

use crate::pipeline::RunReport;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Plain line with no prefix (metadata dumps, scripted use).
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// One-line summary of a run.
pub fn summary_line(report: &RunReport, dry_run: bool) -> String {
    let verb = if dry_run { "would relocate" } else { "relocated" };
    let mut line = format!("{verb} {} file(s)", report.relocated);
    if report.undated > 0 {
        line.push_str(&format!(", {} undated", report.undated));
    }
    if report.failed > 0 {
        line.push_str(&format!(", {} failed", report.failed));
    }
    if report.unsupported > 0 {
        line.push_str(&format!(", {} unsupported", report.unsupported));
    }
    if report.pruned_dirs > 0 {
        line.push_str(&format!(", {} empty dir(s) removed", report.pruned_dirs));
    }
    line
}

pub fn print_report(report: &RunReport, dry_run: bool) {
    let line = summary_line(report, dry_run);
    if report.failed > 0 || report.undated > 0 {
        print_warn(&line);
    } else if is_tty() {
        println!("{} {}", "ok:".green().bold(), line);
    } else {
        println!("ok: {}", line);
    }
}

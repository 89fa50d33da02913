use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let cli = photo_sort::cli::parse();
    app::run(cli)
}

//! End-to-end sort runs against temp trees, with a fake metadata decoder standing in
//! for EXIF so dates are fully controlled by the test.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use walkdir::WalkDir;

use photo_sort::extract::filename::date_from_stem;
use photo_sort::extract::metadata::DATE_TIME_ORIGINAL;
use photo_sort::fs_ops::acquire_run_lock;
use photo_sort::{
    Config, ExtractionChain, GroupBy, MetadataDecoder, MetadataFields, NamingPolicy, PhotoSortError,
    RunReport, TransferMode, sort_with,
};

/// DateTimeOriginal values keyed by file name; everything else has no metadata.
#[derive(Default)]
struct FakeDecoder(HashMap<String, String>);

impl FakeDecoder {
    fn with(mut self, name: &str, date: &str) -> Self {
        self.0.insert(name.to_string(), date.to_string());
        self
    }
}

impl MetadataDecoder for FakeDecoder {
    fn decode(&self, path: &Path, _file: &File) -> io::Result<Option<MetadataFields>> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        Ok(self.0.get(name).map(|date| {
            let mut fields = MetadataFields::new();
            fields.insert(DATE_TIME_ORIGINAL.to_string(), date.clone());
            fields
        }))
    }
}

fn roots(temp: &TempDir) -> (PathBuf, PathBuf) {
    let src = temp.child("inbox");
    let dest = temp.child("library");
    src.create_dir_all().unwrap();
    dest.create_dir_all().unwrap();
    (src.path().to_path_buf(), dest.path().to_path_buf())
}

fn run(cfg: &Config, decoder: FakeDecoder) -> RunReport {
    let mut cfg = cfg.clone();
    sort_with(&mut cfg, ExtractionChain::new(Arc::new(decoder))).unwrap()
}

fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    out.sort();
    out
}

#[test]
fn metadata_date_wins_over_file_name() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("IMG_20200101_000000.jpg"), "x").unwrap();

    let decoder = FakeDecoder::default().with("IMG_20200101_000000.jpg", "2019:05:04 10:00:00");
    let report = run(&Config::new(&src, &dest), decoder);

    assert_eq!(report.relocated, 1);
    assert!(dest.join("2019/May/IMG_20200101_000000.jpg").exists());
}

#[test]
fn file_name_dates_files_without_metadata() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("IMG_20230615_143000.jpg"), "a").unwrap();
    fs::write(src.join("VID-20211231-WA0003.mp4"), "b").unwrap();

    let report = run(&Config::new(&src, &dest), FakeDecoder::default());

    assert_eq!(report.relocated, 2);
    assert!(dest.join("2023/Jun/IMG_20230615_143000.jpg").exists());
    assert!(dest.join("2021/Dec/VID-20211231-WA0003.mp4").exists());
}

#[test]
fn undated_and_unsupported_files_stay_put() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("holiday.jpg"), "a").unwrap();
    fs::write(src.join("notes_20230615.txt"), "b").unwrap();

    let report = run(&Config::new(&src, &dest), FakeDecoder::default());

    assert_eq!(report.relocated, 0);
    assert_eq!(report.undated, 1);
    assert_eq!(report.unsupported, 1);
    assert!(src.join("holiday.jpg").exists());
    assert!(src.join("notes_20230615.txt").exists());
    assert!(files_under(&dest).is_empty());
}

#[test]
fn extension_match_ignores_case() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("clip.MoV"), "v").unwrap();

    let decoder = FakeDecoder::default().with("clip.MoV", "2022:02:03 04:05:06");
    run(&Config::new(&src, &dest), decoder);

    assert!(dest.join("2022/Feb/clip.MoV").exists());
}

#[test]
fn colliding_names_get_increasing_suffixes() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    for (dir, body) in [("a", "first"), ("b", "second"), ("c", "third")] {
        fs::create_dir_all(src.join(dir)).unwrap();
        fs::write(src.join(dir).join("IMG_20230615_143000.jpg"), body).unwrap();
    }

    let report = run(&Config::new(&src, &dest), FakeDecoder::default());
    assert_eq!(report.relocated, 3);

    let month = dest.join("2023/Jun");
    assert_eq!(fs::read_to_string(month.join("IMG_20230615_143000.jpg")).unwrap(), "first");
    assert_eq!(fs::read_to_string(month.join("IMG_20230615_143000_1.jpg")).unwrap(), "second");
    assert_eq!(fs::read_to_string(month.join("IMG_20230615_143000_2.jpg")).unwrap(), "third");
}

#[test]
fn existing_library_file_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    let month = dest.join("2023/Jun");
    fs::create_dir_all(&month).unwrap();
    fs::write(month.join("IMG_20230615_143000.jpg"), "old").unwrap();
    fs::write(src.join("IMG_20230615_143000.jpg"), "new").unwrap();

    run(&Config::new(&src, &dest), FakeDecoder::default());

    assert_eq!(fs::read_to_string(month.join("IMG_20230615_143000.jpg")).unwrap(), "old");
    assert_eq!(fs::read_to_string(month.join("IMG_20230615_143000_1.jpg")).unwrap(), "new");
}

#[test]
fn blocked_destination_fails_one_file_and_the_walk_goes_on() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    // a regular file where the 2023 year directory should go
    fs::write(dest.join("2023"), "not a directory").unwrap();
    fs::write(src.join("IMG_20230615_143000.jpg"), "a").unwrap();
    fs::write(src.join("IMG_20200101_000000.jpg"), "b").unwrap();

    let report = run(&Config::new(&src, &dest), FakeDecoder::default());

    assert_eq!(report.failed, 1);
    assert_eq!(report.relocated, 1);
    assert!(src.join("IMG_20230615_143000.jpg").exists());
    assert!(dest.join("2020/Jan/IMG_20200101_000000.jpg").exists());
    assert!(!src.join("IMG_20200101_000000.jpg").exists());
    assert_eq!(fs::read_to_string(dest.join("2023")).unwrap(), "not a directory");
}

#[test]
fn copy_mode_keeps_the_source_tree_intact() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("sub/IMG_20230615_143000.jpg"), "a").unwrap();

    let mut cfg = Config::new(&src, &dest);
    cfg.transfer = TransferMode::Copy;
    let report = run(&cfg, FakeDecoder::default());

    assert_eq!(report.relocated, 1);
    assert_eq!(report.pruned_dirs, 0);
    assert!(src.join("sub/IMG_20230615_143000.jpg").exists());
    assert_eq!(files_under(&dest), vec![PathBuf::from("2023/Jun/IMG_20230615_143000.jpg")]);
}

#[test]
fn emptied_directories_are_pruned_but_occupied_ones_kept() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::create_dir_all(src.join("x/y")).unwrap();
    fs::write(src.join("x/y/IMG_20230615_143000.jpg"), "a").unwrap();
    fs::create_dir_all(src.join("z")).unwrap();
    fs::write(src.join("z/readme.txt"), "keep").unwrap();

    let report = run(&Config::new(&src, &dest), FakeDecoder::default());

    assert_eq!(report.pruned_dirs, 2);
    assert!(!src.join("x").exists());
    assert!(src.join("z/readme.txt").exists());
    assert!(src.exists());
}

#[test]
fn fully_emptied_source_root_is_removed() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("sub/IMG_20230615_143000.jpg"), "a").unwrap();

    let report = run(&Config::new(&src, &dest), FakeDecoder::default());

    assert_eq!(report.pruned_dirs, 2);
    assert!(!src.exists());
    assert!(temp.path().exists());
}

#[test]
fn keep_empty_dirs_leaves_the_tree() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("sub/IMG_20230615_143000.jpg"), "a").unwrap();

    let mut cfg = Config::new(&src, &dest);
    cfg.prune_empty_dirs = false;
    let report = run(&cfg, FakeDecoder::default());

    assert_eq!(report.pruned_dirs, 0);
    assert!(src.join("sub").is_dir());
}

#[test]
fn second_run_over_a_sorted_library_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("IMG_20230615_143000.jpg"), "a").unwrap();
    fs::write(src.join("IMG_20200101_101010.jpg"), "b").unwrap();

    let cfg = Config::new(&src, &dest);
    run(&cfg, FakeDecoder::default());
    let after_first = files_under(&dest);

    // the first run pruned the (now empty) inbox
    fs::create_dir_all(&src).unwrap();
    let report = run(&cfg, FakeDecoder::default());

    assert_eq!(report.relocated, 0);
    assert_eq!(files_under(&dest), after_first);
}

#[test]
fn canonical_names_date_back_to_the_same_instant() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("IMG_20230615_143000.jpg"), "a").unwrap();

    let mut cfg = Config::new(&src, &dest);
    cfg.naming = NamingPolicy::Canonical;
    run(&cfg, FakeDecoder::default());

    let renamed = dest.join("2023/Jun/2023-06-15_143000.jpg");
    assert!(renamed.exists());
    let stem = renamed.file_stem().unwrap().to_str().unwrap();
    let ts = date_from_stem(stem).unwrap();
    assert_eq!(ts.canonical_stem(), "2023-06-15_143000");
}

#[test]
fn group_by_day_and_year() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("IMG_20230615_143000.jpg"), "a").unwrap();

    let mut cfg = Config::new(&src, &dest);
    cfg.group_by = GroupBy::Day;
    cfg.prune_empty_dirs = false;
    run(&cfg, FakeDecoder::default());
    assert!(dest.join("2023/Jun/15/IMG_20230615_143000.jpg").exists());

    fs::write(src.join("IMG_20190101_000000.jpg"), "b").unwrap();
    cfg.group_by = GroupBy::Year;
    run(&cfg, FakeDecoder::default());
    assert!(dest.join("2019/IMG_20190101_000000.jpg").exists());
}

#[test]
fn motion_photos_need_opting_in() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("PXL_20230615_143000.MP"), "a").unwrap();

    let mut cfg = Config::new(&src, &dest);
    cfg.prune_empty_dirs = false;
    let report = run(&cfg, FakeDecoder::default());
    assert_eq!(report.unsupported, 1);

    cfg.extensions = cfg.extensions.with("mp");
    let report = run(&cfg, FakeDecoder::default());
    assert_eq!(report.relocated, 1);
    assert!(dest.join("2023/Jun/PXL_20230615_143000.MP").exists());
}

#[test]
fn destination_inside_source_is_rejected_before_anything_moves() {
    let temp = TempDir::new().unwrap();
    let src = temp.child("inbox");
    src.child("IMG_20230615_143000.jpg").write_str("a").unwrap();
    src.child("sorted").create_dir_all().unwrap();

    let mut cfg = Config::new(src.path(), src.path().join("sorted"));
    let err = sort_with(&mut cfg, ExtractionChain::new(Arc::new(FakeDecoder::default()))).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PhotoSortError>(),
        Some(PhotoSortError::OverlappingRoots { .. })
    ));
    assert!(src.child("IMG_20230615_143000.jpg").path().exists());
}

#[test]
fn missing_destination_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    let src = temp.child("inbox");
    src.create_dir_all().unwrap();

    let mut cfg = Config::new(src.path(), temp.path().join("nope"));
    let err = sort_with(&mut cfg, ExtractionChain::new(Arc::new(FakeDecoder::default()))).unwrap_err();

    let typed = err.downcast_ref::<PhotoSortError>().unwrap();
    assert!(matches!(typed, PhotoSortError::DestinationInvalid { .. }));
    assert_eq!(typed.code(), 11);
}

#[test]
fn held_lock_stops_a_second_run() {
    let temp = TempDir::new().unwrap();
    let (src, dest) = roots(&temp);
    fs::write(src.join("IMG_20230615_143000.jpg"), "a").unwrap();

    let _held = acquire_run_lock(&fs::canonicalize(&dest).unwrap()).unwrap();
    let mut cfg = Config::new(&src, &dest);
    let err = sort_with(&mut cfg, ExtractionChain::new(Arc::new(FakeDecoder::default()))).unwrap_err();

    assert!(matches!(err.downcast_ref::<PhotoSortError>(), Some(PhotoSortError::Locked(_))));
    assert!(src.join("IMG_20230615_143000.jpg").exists());

    // locks can be switched off for filesystems without flock
    cfg.disable_locks = true;
    let report = sort_with(&mut cfg, ExtractionChain::new(Arc::new(FakeDecoder::default()))).unwrap();
    assert_eq!(report.relocated, 1);
}

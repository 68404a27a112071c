use std::fs;
use std::path::{Path, PathBuf};

use dmdview_core::{ReplayOptions, Report, replay_files};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_expected_report(dir: &str) -> Report {
    let expected_path = repo_root().join(dir).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn load_options(dir: &str) -> ReplayOptions {
    let path = repo_root().join(dir).join("options.json");
    match fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json).expect("parse options.json"),
        Err(_) => ReplayOptions::default(),
    }
}

fn message_files(dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(repo_root().join(dir).join("messages"))
        .expect("read messages dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect();
    files.sort();
    files
}

fn run_golden(dir: &str) {
    let expected = load_expected_report(dir);

    let mut actual = replay_files(&message_files(dir), &load_options(dir)).expect("replay");
    actual.tool = expected.tool.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_basic() {
    run_golden("tests/golden/basic");
}

#[test]
fn golden_palette() {
    run_golden("tests/golden/palette");
}

#[test]
fn golden_rows() {
    run_golden("tests/golden/rows");
}

#[test]
fn golden_basic_drops_bad_messages_without_stopping() {
    let report = load_expected_report("tests/golden/basic");
    let outcomes: Vec<&str> = report.messages.iter().map(|m| m.outcome.as_str()).collect();
    assert_eq!(
        outcomes,
        vec![
            "state_updated",
            "state_updated",
            "state_updated",
            "rendered",
            "duplicate",
            "ignored",
            "ignored",
            "rejected",
        ]
    );
    assert_eq!(report.session.frames_rendered, 1);
}

#[test]
fn golden_palette_falls_back_after_clear() {
    let report = load_expected_report("tests/golden/palette");
    assert_eq!(report.session.palette_len, None);
    assert_eq!(report.session.rejected, 1);
    assert_eq!(report.raster.map(|r| r.lit_pixels), Some(32));
}

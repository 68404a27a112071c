use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dmdview_core::{ReplayOptions, replay_files};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.join("messages").is_dir() {
            continue;
        }
        regenerate_one(&path)?;
    }

    Ok(())
}

fn regenerate_one(case: &Path) -> Result<(), String> {
    let options = load_options(case)?;
    let inputs = message_files(&case.join("messages"))?;
    let report = replay_files(&inputs, &options)
        .map_err(|err| format!("replay failed for {}: {}", case.display(), err))?;
    let json = serde_json::to_string(&report)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    let output = case.join("expected_report.json");
    fs::write(&output, json)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}

fn load_options(case: &Path) -> Result<ReplayOptions, String> {
    let path = case.join("options.json");
    if !path.exists() {
        return Ok(ReplayOptions::default());
    }
    let json = fs::read_to_string(&path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    serde_json::from_str(&json).map_err(|err| format!("invalid {}: {}", path.display(), err))
}

fn message_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(dir).map_err(|err| format!("failed to read {}: {}", dir.display(), err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        if entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

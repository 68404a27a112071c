use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let commit = env::var("GITHUB_SHA")
        .ok()
        .filter(|v| !v.is_empty())
        .map(|full| short_commit(&full))
        .or_else(|| run_git(&["rev-parse", "--short=7", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());

    let build_date =
        run_git(&["log", "-1", "--format=%cs"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=DMDVIEW_BUILD_COMMIT={}", commit);
    println!("cargo:rustc-env=DMDVIEW_BUILD_DATE={}", build_date);
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

fn short_commit(full: &str) -> String {
    full.chars().take(7).collect()
}

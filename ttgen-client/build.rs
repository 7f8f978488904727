//! Stamps the `ttgen` binary with the version details it logs at startup
//! (`GIT_HASH`, `BUILD_TIMESTAMP`, `BUILD_PROFILE`).

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

fn main() {
    // Builds from a source tarball have no repository to ask
    emit("GIT_HASH", &git_short_hash().unwrap_or_else(|| UNKNOWN.to_string()));
    emit(
        "BUILD_TIMESTAMP",
        &chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    );
    emit(
        "BUILD_PROFILE",
        &env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()),
    );
}

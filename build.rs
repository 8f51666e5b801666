//! Build script for dietlog
//!
//! Stamps each compilation with a build number and UTC timestamp. The number
//! is kept in `build_number.txt` and bumped on every rebuild of `src/`, unless
//! `DIETLOG_BUILD_NUMBER` is already set in the environment (release builds
//! pin it that way).

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn next_build_number(counter: &Path) -> u64 {
    let previous = fs::read_to_string(counter)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let next = previous + 1;
    if let Err(e) = fs::write(counter, next.to_string()) {
        println!("cargo:warning=could not update {}: {}", counter.display(), e);
    }
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=DIETLOG_BUILD_NUMBER");

    let build_number = match std::env::var("DIETLOG_BUILD_NUMBER") {
        Ok(pinned) => pinned,
        Err(_) => next_build_number(Path::new(COUNTER_FILE)).to_string(),
    };
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=DIETLOG_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=DIETLOG_BUILD_TIMESTAMP={}", timestamp);
}

//! Build metadata
//!
//! Values stamped in by `build.rs`, reported by the `dietlog_status` tool and
//! printed in the startup banner.

use std::path::Path;

use serde::Serialize;

/// Build number from `build.rs`; 0 when built without it or when the pinned
/// value is not a plain decimal number
pub const BUILD_NUMBER: u64 = match option_env!("DIETLOG_BUILD_NUMBER") {
    Some(s) => parse_build_number(s),
    None => 0,
};

/// UTC build time, `YYYY-MM-DDTHH:MM:SSZ`
pub const BUILD_TIMESTAMP: &str = match option_env!("DIETLOG_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// `str::parse` is not usable in a const initializer
const fn parse_build_number(s: &str) -> u64 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return 0;
    }
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            return 0;
        }
        value = value * 10 + (bytes[i] - b'0') as u64;
        i += 1;
    }
    value
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    /// One-line identification, e.g. `dietlog 1.0.0 (build 12, 2026-01-05T10:00:00Z)`
    pub fn summary(&self) -> String {
        format!(
            "{} {} (build {}, {})",
            self.name, self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Startup banner lines: build identification and where data is read from
pub fn startup_banner(data_dir: &Path) -> Vec<String> {
    let rule = "=".repeat(47);
    vec![
        rule.clone(),
        format!("  Diet Log - {}", DESCRIPTION),
        format!("  {}", BuildInfo::current().summary()),
        format!("  Data: {}", data_dir.display()),
        rule,
    ]
}

/// Print the startup banner to stderr (stdout carries the MCP transport)
pub fn print_startup_banner(data_dir: &Path) {
    for line in startup_banner(data_dir) {
        eprintln!("{}", line);
    }
}

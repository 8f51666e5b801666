//! Data file management
//!
//! Resolves the data directory and reads/writes the three data files.
//! Writes go to a temporary sibling file which is synced and then renamed
//! over the target, so a failed write never truncates the previous file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::codec::{self, LoadReport};
use crate::models::{DailyLog, ExerciseCatalog, FoodCatalog};

pub const FOODS_FILE: &str = "foods.csv";
pub const EXERCISES_FILE: &str = "exercise.csv";
pub const LOG_FILE: &str = "log.csv";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "DIETLOG_DATA_DIR";

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Get the data directory from the environment or use `<project>/data`
pub fn default_data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path
        })
}

/// The foods, exercise and log files inside one data directory
#[derive(Debug, Clone)]
pub struct DataFiles {
    dir: PathBuf,
}

impl DataFiles {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Data files in [`default_data_dir`]
    pub fn from_env() -> Self {
        Self::new(default_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn foods_path(&self) -> PathBuf {
        self.dir.join(FOODS_FILE)
    }

    pub fn exercises_path(&self) -> PathBuf {
        self.dir.join(EXERCISES_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// Create the data directory if it does not exist
    pub fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })
    }

    pub fn load_foods(&self) -> StoreResult<(FoodCatalog, LoadReport)> {
        let path = self.foods_path();
        let text = read_optional(&path)?.unwrap_or_default();
        let (catalog, report) = codec::parse_foods(&text);
        log_report(&path, &report);
        Ok((catalog, report))
    }

    pub fn save_foods(&self, catalog: &FoodCatalog) -> StoreResult<()> {
        write_atomic(&self.foods_path(), &codec::encode_foods(catalog))
    }

    pub fn load_exercises(&self) -> StoreResult<(ExerciseCatalog, LoadReport)> {
        let path = self.exercises_path();
        let text = read_optional(&path)?.unwrap_or_default();
        let (catalog, report) = codec::parse_exercises(&text);
        log_report(&path, &report);
        Ok((catalog, report))
    }

    pub fn save_exercises(&self, catalog: &ExerciseCatalog) -> StoreResult<()> {
        write_atomic(&self.exercises_path(), &codec::encode_exercises(catalog))
    }

    /// Load the log; both catalogs must already be populated
    pub fn load_log(
        &self,
        foods: &FoodCatalog,
        exercises: &ExerciseCatalog,
    ) -> StoreResult<(DailyLog, LoadReport)> {
        let path = self.log_path();
        let text = read_optional(&path)?.unwrap_or_default();
        let (log, report) = codec::parse_log(&text, foods, exercises);
        log_report(&path, &report);
        Ok((log, report))
    }

    pub fn save_log(
        &self,
        log: &DailyLog,
        foods: &FoodCatalog,
        exercises: &ExerciseCatalog,
    ) -> StoreResult<()> {
        write_atomic(&self.log_path(), &codec::encode_log(log, foods, exercises))
    }

    /// Size in bytes of each data file that exists
    pub fn file_sizes(&self) -> Vec<(String, Option<u64>)> {
        [self.foods_path(), self.exercises_path(), self.log_path()]
            .iter()
            .map(|p| {
                (
                    p.display().to_string(),
                    fs::metadata(p).ok().map(|m| m.len()),
                )
            })
            .collect()
    }
}

fn log_report(path: &Path, report: &LoadReport) {
    if report.skipped > 0 {
        warn!(path = %path.display(), loaded = report.loaded, skipped = report.skipped, "Loaded with skipped lines");
    } else {
        info!(path = %path.display(), loaded = report.loaded, "Loaded");
    }
}

/// Read a file, treating a missing file as absent rather than an error
fn read_optional(path: &Path) -> StoreResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `contents` to a temp file next to `path`, then rename it into place
fn write_atomic(path: &Path, contents: &str) -> StoreResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = (|| -> io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(source) = result {
        fs::remove_file(&tmp_path).ok();
        return Err(StoreError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), bytes = contents.len(), "Saved");
    Ok(())
}

//! Deduplicated, append-only record of fetched locators.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// History file name inside the cache directory.
pub const HISTORY_FILE_NAME: &str = "EarthViewLog.txt";

/// Plain-text history file, one locator per line.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    /// File path.
    path: PathBuf,
}

impl HistoryLog {
    /// Wrap the history file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What: Create the history file empty if it does not exist.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Ok(())` once the file exists; existing content is untouched.
    ///
    /// # Errors
    /// - Returns `Err` when the file cannot be created.
    pub fn ensure_exists(&self) -> io::Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(drop)
    }

    /// What: Read all recorded lines.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - Lines in file order; empty when the file does not exist.
    ///
    /// # Errors
    /// - Returns `Err` for read failures other than a missing file.
    pub fn entries(&self) -> io::Result<Vec<String>> {
        Ok(self.read_text()?.lines().map(str::to_string).collect())
    }

    /// File content with invalid UTF-8 replaced; empty when the file does not exist.
    fn read_text(&self) -> io::Result<String> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// What: Append `line` unless it is already recorded.
    ///
    /// Inputs:
    /// - `line`: Locator to record
    ///
    /// Output:
    /// - `Ok(true)` when appended; `Ok(false)` when already present.
    ///
    /// # Errors
    /// - Returns `Err` when the file cannot be read or appended to.
    ///
    /// Details:
    /// - Comparison is verbatim against whole lines; bytes that are not UTF-8 never match.
    /// - Opens in append/create mode; never truncates. If the last line lacks a terminator one is
    ///   added first so the new record stays on its own line.
    pub fn record_if_absent(&self, line: &str) -> io::Result<bool> {
        let existing = self.read_text()?;
        if existing.lines().any(|l| l == line) {
            debug!(path = %self.path.display(), line, "[History] already recorded");
            return Ok(false);
        }

        let mut record = String::with_capacity(line.len() + 2);
        if !existing.is_empty() && !existing.ends_with('\n') {
            record.push('\n');
        }
        record.push_str(line);
        record.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        debug!(path = %self.path.display(), line, "[History] recorded");
        Ok(true)
    }
}

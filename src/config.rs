//! Run settings, optionally overridden from `settings.conf`.
//!
//! The file uses `key = value` lines; blank lines and lines starting with `#`, `//`, or `;` are
//! ignored. Unknown keys and unparsable values are logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::CacheDir;
use crate::history::{HISTORY_FILE_NAME, HistoryLog};
use crate::paths;
use crate::sequence::IdentifierRange;

/// Default locator template.
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.gstatic.com/prettyearth/assets/full/{id}.jpg";

/// Default lower identifier bound (inclusive).
pub const DEFAULT_ID_LOWER: u32 = 1000;

/// Default upper identifier bound (exclusive).
pub const DEFAULT_ID_UPPER: u32 = 14794;

/// Immutable configuration shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Locator template containing `{id}`.
    pub url_template: String,
    /// Candidate identifier range.
    pub id_range: IdentifierRange,
    /// Directory holding cached images and the history file.
    pub cache_dir: PathBuf,
    /// Whether to set the desktop background.
    pub apply_wallpaper: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_cache_dir(paths::default_cache_dir())
    }
}

impl Settings {
    /// Defaults with a specific cache directory.
    #[must_use]
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            id_range: IdentifierRange {
                lower: DEFAULT_ID_LOWER,
                upper: DEFAULT_ID_UPPER,
            },
            cache_dir: cache_dir.into(),
            apply_wallpaper: true,
        }
    }

    /// What: Load settings from `path`, falling back to defaults.
    ///
    /// Inputs:
    /// - `path`: Settings file; a missing file is not an error
    ///
    /// Output:
    /// - Defaults overridden by any valid keys in the file.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let mut out = Self::default();
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(
                    path = %path.display(),
                    bytes = content.len(),
                    "[Config] Loaded settings.conf"
                );
                parse_settings(&content, path, &mut out);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    path = %path.display(),
                    "[Config] settings.conf not present, using defaults"
                );
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "[Config] settings.conf unreadable, using defaults"
                );
            }
        }
        out
    }

    /// Path of the history file.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.cache_dir.join(HISTORY_FILE_NAME)
    }

    /// Cache handle for [`Settings::cache_dir`].
    #[must_use]
    pub fn cache(&self) -> CacheDir {
        CacheDir::new(&self.cache_dir)
    }

    /// History handle for [`Settings::history_path`].
    #[must_use]
    pub fn history(&self) -> HistoryLog {
        HistoryLog::new(self.history_path())
    }
}

/// What: Check if a line should be skipped (empty or comment).
///
/// Inputs:
/// - `line`: Line to check
///
/// Output:
/// - `true` for empty lines and lines starting with `#`, `//`, or `;`.
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a `key = value` pair.
///
/// Inputs:
/// - `line`: Line to parse
///
/// Output:
/// - `Some((key, value))` split on the first `=`, both trimmed; `None` without `=`.
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Interpret common boolean spellings.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// What: Apply settings file content onto `out`.
///
/// Inputs:
/// - `content`: File text
/// - `path`: File path (for log context)
/// - `out`: Settings to update
///
/// Output:
/// - Updates `out` in place.
///
/// Details:
/// - Bounds are validated together after parsing; an empty, inverted, or oversized range (span
///   above [`crate::sequence::MAX_SPAN`]) reverts both to the defaults.
/// - A `url_template` without `{id}` is rejected.
pub fn parse_settings(content: &str, path: &Path, out: &mut Settings) {
    let mut lower = out.id_range.lower;
    let mut upper = out.id_range.upper;

    for (lineno, line) in content.lines().enumerate() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((key, value)) = parse_key_value(line) else {
            warn!(path = %path.display(), line = lineno + 1, "[Config] expected key = value");
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "url_template" => {
                if value.contains(crate::fetch::ID_PLACEHOLDER) {
                    out.url_template = value;
                } else {
                    warn!(
                        path = %path.display(),
                        value = %value,
                        "[Config] url_template lacks {{id}}, ignoring"
                    );
                }
            }
            "id_lower" => match value.parse() {
                Ok(v) => lower = v,
                Err(_) => {
                    warn!(
                        path = %path.display(),
                        value = %value,
                        "[Config] invalid id_lower"
                    );
                }
            },
            "id_upper" => match value.parse() {
                Ok(v) => upper = v,
                Err(_) => {
                    warn!(
                        path = %path.display(),
                        value = %value,
                        "[Config] invalid id_upper"
                    );
                }
            },
            "cache_dir" => {
                if value.is_empty() {
                    warn!(path = %path.display(), "[Config] empty cache_dir, ignoring");
                } else {
                    out.cache_dir = paths::expand_home(&value);
                }
            }
            "apply_wallpaper" => match parse_bool(&value) {
                Some(v) => out.apply_wallpaper = v,
                None => {
                    warn!(
                        path = %path.display(),
                        value = %value,
                        "[Config] invalid apply_wallpaper"
                    );
                }
            },
            other => {
                warn!(path = %path.display(), key = other, "[Config] unknown key");
            }
        }
    }

    if let Some(range) = IdentifierRange::new(lower, upper) {
        out.id_range = range;
    } else {
        warn!(
            lower,
            upper,
            max_span = crate::sequence::MAX_SPAN,
            "[Config] id range must be non-empty and at most max_span wide; using defaults"
        );
        out.id_range = IdentifierRange {
            lower: DEFAULT_ID_LOWER,
            upper: DEFAULT_ID_UPPER,
        };
    }
}

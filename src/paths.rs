//! Filesystem locations: config, logs, and the default image cache.

use std::env;
use std::path::{Path, PathBuf};

/// Application directory name under the config base.
const APP_DIR: &str = "earthview";

/// Cache directory name under the user's pictures directory.
pub const CACHE_DIR_NAME: &str = "GoogleEarthViewer";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let mut base = home_dir();
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// `$HOME`, or `.` when unset.
fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// Config directory: `$XDG_CONFIG_HOME/earthview` or `~/.config/earthview` (ensured to exist).
#[must_use]
pub fn config_dir() -> PathBuf {
    let dir = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_DIR);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: `~/.config/earthview/logs` (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Default settings file: `~/.config/earthview/settings.conf`. Not created.
#[must_use]
pub fn settings_path() -> PathBuf {
    xdg_base_dir("XDG_CONFIG_HOME", &[".config"])
        .join(APP_DIR)
        .join("settings.conf")
}

/// What: Default image cache directory.
///
/// Inputs: None
///
/// Output:
/// - `<pictures>/GoogleEarthViewer`, where `<pictures>` comes from the platform's user
///   directories and falls back to `$HOME/Pictures`.
///
/// Details:
/// - Does not create the directory; the pipeline bootstrap does.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    pictures_dir().join(CACHE_DIR_NAME)
}

/// User pictures directory.
fn pictures_dir() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(|| home_dir().join("Pictures"))
}

/// What: Expand a leading `~` in user-supplied paths.
///
/// Inputs:
/// - `raw`: Path text from configuration
///
/// Output:
/// - Path with `~` or `~/` replaced by `$HOME`; other paths unchanged.
#[must_use]
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return home_dir();
    }
    raw.strip_prefix("~/")
        .map_or_else(|| Path::new(raw).to_path_buf(), |rest| home_dir().join(rest))
}

//! Desktop wallpaper backends and the per-display applier.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info, warn};

pub mod detect;
mod gnome;
mod kde;
mod macos;
mod sway;

pub use detect::{DesktopKind, detect_desktop};

/// Wallpaper backend failures.
#[derive(Debug, Error)]
pub enum WallpaperError {
    /// None of the helper programs is on `PATH`.
    #[error("{0} not found in PATH")]
    MissingTool(String),

    /// The helper program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The helper program exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Command {
        /// Program name.
        program: String,
        /// Exit status.
        status: ExitStatus,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// The helper program's output could not be understood.
    #[error("unexpected output from {program}: {detail}")]
    Output {
        /// Program name.
        program: String,
        /// What was wrong.
        detail: String,
    },

    /// The image path cannot be passed to the desktop as text.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

/// One target the desktop can give its own background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    /// Backend-specific identifier (desktop index, output name, ...).
    pub id: String,
    /// Human-readable name for logs.
    pub label: String,
}

/// A way of setting the desktop background.
pub trait DesktopBackend {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// List currently attached displays.
    ///
    /// # Errors
    /// - Returns `Err` when the desktop cannot be queried.
    fn displays(&self) -> Result<Vec<Display>, WallpaperError>;

    /// Set `display`'s background to `image`.
    ///
    /// # Errors
    /// - Returns `Err` when the desktop rejects the request.
    fn set_wallpaper(&self, display: &Display, image: &Path) -> Result<(), WallpaperError>;
}

/// What: Pick the backend for a detected desktop.
///
/// Inputs:
/// - `kind`: Detected desktop
///
/// Output:
/// - `Some(backend)` for supported desktops; `None` for `DesktopKind::Other`.
#[must_use]
pub fn backend_for(kind: DesktopKind) -> Option<Box<dyn DesktopBackend + Send + Sync>> {
    match kind {
        DesktopKind::MacOs => Some(Box::new(macos::MacOsBackend)),
        DesktopKind::Gnome => Some(Box::new(gnome::GnomeBackend)),
        DesktopKind::Kde => Some(Box::new(kde::KdeBackend)),
        DesktopKind::Sway => Some(Box::new(sway::SwayBackend)),
        DesktopKind::Other => None,
    }
}

/// Per-run tally of wallpaper requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    /// Displays updated.
    pub applied: usize,
    /// Displays whose update failed.
    pub failed: usize,
}

/// Applies one image to every attached display.
pub struct WallpaperApplier {
    /// Desktop integration in use.
    backend: Box<dyn DesktopBackend + Send + Sync>,
}

impl std::fmt::Debug for WallpaperApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallpaperApplier")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl WallpaperApplier {
    /// Wrap a backend.
    #[must_use]
    pub const fn new(backend: Box<dyn DesktopBackend + Send + Sync>) -> Self {
        Self { backend }
    }

    /// What: Build an applier for the current session's desktop.
    ///
    /// Inputs: None (reads the session environment)
    ///
    /// Output:
    /// - `Some(applier)` when the desktop is supported; `None` otherwise.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let kind = detect_desktop();
        debug!(desktop = ?kind, "[Wallpaper] detected desktop");
        backend_for(kind).map(Self::new)
    }

    /// Backend name.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// What: Set `image` as the background of every attached display.
    ///
    /// Inputs:
    /// - `image`: Local image path
    ///
    /// Output:
    /// - `ApplyReport` counting successes and failures.
    ///
    /// Details:
    /// - Each display is attempted independently; failures are logged and do not stop the rest.
    /// - An enumeration failure is logged and yields an empty report.
    #[must_use]
    pub fn apply(&self, image: &Path) -> ApplyReport {
        let mut report = ApplyReport::default();
        let displays = match self.backend.displays() {
            Ok(displays) => displays,
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "[Wallpaper] failed to enumerate displays"
                );
                return report;
            }
        };
        if displays.is_empty() {
            warn!(backend = self.backend.name(), "[Wallpaper] no displays attached");
        }

        for target in &displays {
            match self.backend.set_wallpaper(target, image) {
                Ok(()) => {
                    debug!(display = %target.label, path = %image.display(), "[Wallpaper] set");
                    report.applied += 1;
                }
                Err(e) => {
                    warn!(display = %target.label, error = %e, "[Wallpaper] failed to set");
                    report.failed += 1;
                }
            }
        }
        info!(
            backend = self.backend.name(),
            applied = report.applied,
            failed = report.failed,
            "[Wallpaper] applied"
        );
        report
    }
}

/// What: Locate the first available program among `candidates`.
///
/// Inputs:
/// - `candidates`: Program names in preference order
///
/// Output:
/// - Name of the first program found on `PATH`.
///
/// # Errors
/// - `MissingTool` when none is found.
fn find_tool(candidates: &[&'static str]) -> Result<&'static str, WallpaperError> {
    candidates
        .iter()
        .copied()
        .find(|exe| which::which(exe).is_ok())
        .ok_or_else(|| WallpaperError::MissingTool(candidates.join("/")))
}

/// What: Run a helper program and capture its stdout.
///
/// Inputs:
/// - `program`: Executable name
/// - `args`: Arguments
///
/// Output:
/// - Trimmed stdout on success.
///
/// # Errors
/// - `Spawn` when the process cannot start; `Command` on non-zero exit.
fn run_capture(program: &str, args: &[&str]) -> Result<String, WallpaperError> {
    let out = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| WallpaperError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !out.status.success() {
        return Err(WallpaperError::Command {
            program: program.to_string(),
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Borrow `path` as UTF-8.
fn utf8_path(path: &Path) -> Result<&str, WallpaperError> {
    path.to_str()
        .ok_or_else(|| WallpaperError::NonUtf8Path(path.to_path_buf()))
}

/// `file://` URI for an absolute path.
fn file_uri(path: &Path) -> Result<String, WallpaperError> {
    Ok(format!("file://{}", utf8_path(path)?))
}

/// What: Parse a display count printed by a helper program.
///
/// Inputs:
/// - `program`: Program name for error context
/// - `text`: Trimmed output
///
/// Output:
/// - Numbered displays `1..=n` (labelled with `prefix`).
///
/// # Errors
/// - `Output` when the text is not a non-negative integer.
fn numbered_displays(
    program: &str,
    text: &str,
    prefix: &str,
) -> Result<Vec<Display>, WallpaperError> {
    let count: usize = text.trim().parse().map_err(|_| WallpaperError::Output {
        program: program.to_string(),
        detail: format!("expected a display count, got {text:?}"),
    })?;
    Ok((1..=count)
        .map(|i| Display {
            id: i.to_string(),
            label: format!("{prefix} {i}"),
        })
        .collect())
}

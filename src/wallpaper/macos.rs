use std::path::Path;

use super::{DesktopBackend, Display, WallpaperError, numbered_displays, run_capture, utf8_path};

/// macOS: one target per desktop known to System Events.
pub(super) struct MacOsBackend;

/// Escape a string for an AppleScript string literal.
fn applescript_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl DesktopBackend for MacOsBackend {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn displays(&self) -> Result<Vec<Display>, WallpaperError> {
        let out = run_capture(
            "osascript",
            &["-e", "tell application \"System Events\" to count of desktops"],
        )?;
        numbered_displays("osascript", &out, "desktop")
    }

    fn set_wallpaper(&self, display: &Display, image: &Path) -> Result<(), WallpaperError> {
        let path = applescript_quote(utf8_path(image)?);
        let script = format!(
            "tell application \"System Events\" to tell desktop {} \
             to set picture to POSIX file {path}",
            display.id
        );
        run_capture("osascript", &["-e", script.as_str()]).map(drop)
    }
}

use std::path::Path;

use super::{DesktopBackend, Display, WallpaperError, file_uri, find_tool, run_capture};

const SCHEMA: &str = "org.gnome.desktop.background";

/// GNOME: one background setting spans every monitor.
pub(super) struct GnomeBackend;

impl DesktopBackend for GnomeBackend {
    fn name(&self) -> &'static str {
        "gnome"
    }

    fn displays(&self) -> Result<Vec<Display>, WallpaperError> {
        find_tool(&["gsettings"])?;
        Ok(vec![Display {
            id: "all".to_string(),
            label: "all monitors".to_string(),
        }])
    }

    fn set_wallpaper(&self, _display: &Display, image: &Path) -> Result<(), WallpaperError> {
        let uri = file_uri(image)?;
        run_capture("gsettings", &["set", SCHEMA, "picture-uri", uri.as_str()])?;

        // GNOME 42+ keeps a separate dark-mode image; older releases lack the key.
        if let Err(e) = run_capture(
            "gsettings",
            &["set", SCHEMA, "picture-uri-dark", uri.as_str()],
        ) {
            tracing::debug!(error = %e, "[Wallpaper] picture-uri-dark not set");
        }
        if let Err(e) = run_capture("gsettings", &["set", SCHEMA, "picture-options", "zoom"]) {
            tracing::debug!(error = %e, "[Wallpaper] picture-options not set");
        }
        Ok(())
    }
}

use std::path::Path;

use super::{
    DesktopBackend, Display, WallpaperError, file_uri, find_tool, numbered_displays, run_capture,
};

/// Plasma 6 ships `qdbus6`, Plasma 5 `qdbus`.
const QDBUS: &[&str] = &["qdbus6", "qdbus"];

/// KDE Plasma: one target per desktop containment, via PlasmaShell scripting.
pub(super) struct KdeBackend;

impl KdeBackend {
    fn evaluate(script: &str) -> Result<String, WallpaperError> {
        let qdbus = find_tool(QDBUS)?;
        run_capture(
            qdbus,
            &[
                "org.kde.plasmashell",
                "/PlasmaShell",
                "org.kde.PlasmaShell.evaluateScript",
                script,
            ],
        )
    }
}

/// What: PlasmaShell script setting one desktop's image.
///
/// Inputs:
/// - `index`: Zero-based desktop index
/// - `uri`: `file://` URI of the image
///
/// Output:
/// - JavaScript for `evaluateScript`.
fn desktop_script(index: usize, uri: &str) -> String {
    let uri = uri.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "var d = desktops()[{index}];\n\
         d.wallpaperPlugin = 'org.kde.image';\n\
         d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
         d.writeConfig('Image', '{uri}');\n"
    )
}

impl DesktopBackend for KdeBackend {
    fn name(&self) -> &'static str {
        "kde"
    }

    fn displays(&self) -> Result<Vec<Display>, WallpaperError> {
        let out = Self::evaluate("print(desktops().length)")?;
        numbered_displays("qdbus", &out, "desktop")
    }

    fn set_wallpaper(&self, display: &Display, image: &Path) -> Result<(), WallpaperError> {
        let index: usize = display
            .id
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or_else(|| WallpaperError::Output {
                program: "qdbus".to_string(),
                detail: format!("invalid desktop id {:?}", display.id),
            })?;
        let uri = file_uri(image)?;
        Self::evaluate(&desktop_script(index, &uri)).map(drop)
    }
}

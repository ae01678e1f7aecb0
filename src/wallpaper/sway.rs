use std::path::Path;

use serde::Deserialize;

use super::{DesktopBackend, Display, WallpaperError, run_capture, utf8_path};

/// Sway: one target per active output.
pub(super) struct SwayBackend;

/// Subset of `swaymsg -t get_outputs` we need.
#[derive(Debug, Deserialize)]
struct SwayOutput {
    name: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    make: String,
    #[serde(default)]
    model: String,
}

/// What: Parse `swaymsg -t get_outputs -r` JSON into active displays.
///
/// Inputs:
/// - `json`: Raw command output
///
/// Output:
/// - One `Display` per active output, id = output name.
///
/// # Errors
/// - `Output` when the JSON does not parse.
fn parse_outputs(json: &str) -> Result<Vec<Display>, WallpaperError> {
    let outputs: Vec<SwayOutput> =
        serde_json::from_str(json).map_err(|e| WallpaperError::Output {
            program: "swaymsg".to_string(),
            detail: e.to_string(),
        })?;
    Ok(outputs
        .into_iter()
        .filter(|o| o.active)
        .map(|o| {
            let label = format!("{} {} ({})", o.make, o.model, o.name)
                .trim()
                .to_string();
            Display { id: o.name, label }
        })
        .collect())
}

/// What: Quote a path as one sway command argument.
///
/// Inputs:
/// - `path`: Image path
///
/// Output:
/// - `path` in double quotes with `\` and `"` escaped.
///
/// Details:
/// - `swaymsg` joins its arguments into one command string that sway re-tokenises on spaces.
fn sway_quote(path: &str) -> String {
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

impl DesktopBackend for SwayBackend {
    fn name(&self) -> &'static str {
        "sway"
    }

    fn displays(&self) -> Result<Vec<Display>, WallpaperError> {
        let out = run_capture("swaymsg", &["-t", "get_outputs", "-r"])?;
        parse_outputs(&out)
    }

    fn set_wallpaper(&self, display: &Display, image: &Path) -> Result<(), WallpaperError> {
        let path = sway_quote(utf8_path(image)?);
        run_capture(
            "swaymsg",
            &["output", display.id.as_str(), "bg", path.as_str(), "fill"],
        )
        .map(drop)
    }
}

//! Desktop environment detection.

/// Desktop environments with a wallpaper backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopKind {
    /// macOS (System Events).
    MacOs,
    /// GNOME and derivatives using `org.gnome.desktop.background`.
    Gnome,
    /// KDE Plasma.
    Kde,
    /// Sway (wlroots).
    Sway,
    /// Anything else.
    Other,
}

/// What: Detect the desktop of the current session.
///
/// Inputs: None (reads `XDG_CURRENT_DESKTOP`, `SWAYSOCK`, and the target OS)
///
/// Output:
/// - The detected `DesktopKind`.
#[must_use]
pub fn detect_desktop() -> DesktopKind {
    let xdg = std::env::var("XDG_CURRENT_DESKTOP").ok();
    let sway = std::env::var_os("SWAYSOCK").is_some_and(|v| !v.is_empty());
    classify(xdg.as_deref(), sway, cfg!(target_os = "macos"))
}

/// What: Classify a session from its environment.
///
/// Inputs:
/// - `xdg_current_desktop`: Value of `XDG_CURRENT_DESKTOP` (colon-separated list)
/// - `swaysock`: Whether `SWAYSOCK` is set
/// - `macos`: Whether running on macOS
///
/// Output:
/// - First matching `DesktopKind`; macOS wins, then `XDG_CURRENT_DESKTOP` entries in order,
///   then `SWAYSOCK`.
#[must_use]
pub fn classify(xdg_current_desktop: Option<&str>, swaysock: bool, macos: bool) -> DesktopKind {
    if macos {
        return DesktopKind::MacOs;
    }
    for name in xdg_current_desktop.unwrap_or("").split(':') {
        match name.trim().to_ascii_lowercase().as_str() {
            "gnome" | "gnome-classic" | "ubuntu" | "unity" | "budgie" => return DesktopKind::Gnome,
            "kde" | "plasma" => return DesktopKind::Kde,
            "sway" => return DesktopKind::Sway,
            _ => {}
        }
    }
    if swaysock {
        DesktopKind::Sway
    } else {
        DesktopKind::Other
    }
}

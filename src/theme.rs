//! Color palette and filesystem paths for the pkghist TUI.

use std::env;
use std::path::PathBuf;

use ratatui::style::Color;

/// Application theme palette used by rendering code.
pub struct Theme {
    /// Primary background color for the canvas.
    pub base: Color,
    /// Subtle surface color for unfocused borders.
    pub surface: Color,
    /// Muted color for secondary text and labels.
    pub overlay: Color,
    /// Primary foreground text color.
    pub text: Color,
    /// Secondary text for less prominent content.
    pub subtext: Color,
    /// Accent color for the focused surface.
    pub cyan: Color,
    /// Accent color for the committed selection.
    pub green: Color,
    /// Accent color for transient states such as loading.
    pub yellow: Color,
    /// Accent color for selection highlights.
    pub lavender: Color,
    /// Darkest shade, used under highlights.
    pub crust: Color,
}

/// Construct a [`Color::Rgb`] from an 8-bit RGB triplet.
fn hex(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Return the application's default theme palette.
pub fn theme() -> Theme {
    Theme {
        base: hex((0x1e, 0x1e, 0x2e)),
        surface: hex((0x45, 0x47, 0x5a)),
        overlay: hex((0x7f, 0x84, 0x9c)),
        text: hex((0xcd, 0xd6, 0xf4)),
        subtext: hex((0xa6, 0xad, 0xc8)),
        cyan: hex((0x74, 0xc7, 0xec)),
        green: hex((0xa6, 0xe3, 0xa1)),
        yellow: hex((0xf9, 0xe2, 0xaf)),
        lavender: hex((0xb4, 0xbe, 0xfe)),
        crust: hex((0x11, 0x11, 0x1b)),
    }
}

/// Resolve an XDG base directory from the environment, defaulting to
/// `$HOME` plus the given segments.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Directory for log files, created on first use.
pub fn logs_dir() -> PathBuf {
    let dir = xdg_base_dir("XDG_STATE_HOME", &[".local", "state"])
        .join("pkghist")
        .join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

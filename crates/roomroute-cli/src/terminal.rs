//! Terminal styling and color utilities.
//!
//! ANSI escape codes and color detection for the text renderers. Colors
//! follow the occupancy bands used across the tool: green below 70%, yellow
//! below 90%, red otherwise.

use roomroute_lib::{OccupancyLevel, RouteStatus};

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for room names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements (separators, candidate lists).
    pub const GRAY: &str = "\x1b[90m";
    /// Green for quiet rooms and safe routes.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for busy rooms.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red for full rooms and blocked routes.
    pub const RED: &str = "\x1b[31m";
}

/// A collection of resolved color codes, either actual ANSI sequences
/// or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            red: colors::RED,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            yellow: "",
            red: "",
        }
    }

    /// Create a palette based on terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color for an occupancy band.
    #[must_use]
    pub fn level(&self, level: OccupancyLevel) -> &'static str {
        match level {
            OccupancyLevel::Green => self.green,
            OccupancyLevel::Yellow => self.yellow,
            OccupancyLevel::Red => self.red,
        }
    }

    /// Color for a route verdict.
    #[must_use]
    pub fn status(&self, status: RouteStatus) -> &'static str {
        match status {
            RouteStatus::Safe => self.green,
            RouteStatus::Blocked => self.red,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects the `NO_COLOR` environment variable (https://no-color.org/)
/// and the `TERM=dumb` convention.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

//! Terminal styling and color utilities.
//!
//! ANSI escape codes and color detection for the human-readable output
//! formats. Safety levels map onto a traffic-light palette.

use saferoute_lib::SafetyLevel;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    // Badge colors (bold reverse video)
    /// Bold reverse green for very safe routes.
    pub const TAG_VERY_HIGH: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for safe routes.
    pub const TAG_HIGH: &str = "\x1b[1;7;36m";
    /// Bold reverse yellow for middling routes.
    pub const TAG_MEDIUM: &str = "\x1b[1;7;33m";
    /// Bold reverse orange (256-color) for risky routes.
    pub const TAG_LOW: &str = "\x1b[1;7;38;5;208m";
    /// Bold reverse red for the riskiest routes.
    pub const TAG_VERY_LOW: &str = "\x1b[1;7;31m";

    /// Bright bold white for node and street names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements.
    pub const GRAY: &str = "\x1b[90m";
    /// Red for dark street markers.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_very_high: &'static str,
    pub tag_high: &'static str,
    pub tag_medium: &'static str,
    pub tag_low: &'static str,
    pub tag_very_low: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_very_high: colors::TAG_VERY_HIGH,
            tag_high: colors::TAG_HIGH,
            tag_medium: colors::TAG_MEDIUM,
            tag_low: colors::TAG_LOW,
            tag_very_low: colors::TAG_VERY_LOW,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_very_high: "",
            tag_high: "",
            tag_medium: "",
            tag_low: "",
            tag_very_low: "",
            white_bold: "",
            gray: "",
            red: "",
        }
    }

    /// Colored unless `--no-color` was passed or the environment opts out.
    #[must_use]
    pub fn detect(no_color_flag: bool) -> Self {
        if !no_color_flag && supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Badge color for a safety band.
    #[must_use]
    pub fn safety_tag(&self, level: SafetyLevel) -> &'static str {
        match level {
            SafetyLevel::VeryHigh => self.tag_very_high,
            SafetyLevel::High => self.tag_high,
            SafetyLevel::Medium => self.tag_medium,
            SafetyLevel::Low => self.tag_low,
            SafetyLevel::VeryLow => self.tag_very_low,
        }
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (<https://no-color.org/>) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    color_allowed(
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn color_allowed(no_color_set: bool, term: Option<&str>) -> bool {
    if no_color_set {
        return false;
    }
    !matches!(term, Some(term) if term.eq_ignore_ascii_case("dumb"))
}

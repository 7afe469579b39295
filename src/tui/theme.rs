//! Color themes and style presets for the dashboard.
//!
//! Three schemes are available: dark (default), light and high-contrast.
//! The active theme lives in a process-wide lock so rendering code can call
//! [`colors()`] without threading the theme through every function.

use crate::model::ColorTag;
use ratatui::prelude::*;
use std::sync::{PoisonError, RwLock};

// ============================================================================
// Color Scheme
// ============================================================================

/// Color scheme for a theme
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    // UI elements
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub background_alt: Color,
    pub text: Color,
    pub text_muted: Color,
    pub selection: Color,
    pub highlight: Color,

    // Status
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Badge foreground
    pub badge_fg_dark: Color,

    // Grid
    /// Background of rows marked for batch paint
    pub selected_row_bg: Color,
    /// Background of the row holding the active cell
    pub active_row_bg: Color,
    /// Palette for row color tags, indexed like [`ColorTag::PALETTE`]
    pub tags: [Color; 8],
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorScheme {
    /// Const dark scheme, used to initialize the global theme.
    const fn dark_const() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            accent: Color::Yellow,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            background: Color::Reset,
            background_alt: Color::Rgb(30, 30, 40),
            text: Color::White,
            text_muted: Color::Gray,
            selection: Color::Rgb(50, 50, 70),
            highlight: Color::Yellow,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,

            badge_fg_dark: Color::Black,

            selected_row_bg: Color::Rgb(40, 55, 75),
            active_row_bg: Color::Rgb(35, 35, 48),
            tags: [
                Color::Reset,
                Color::Rgb(230, 80, 80),
                Color::Rgb(240, 150, 60),
                Color::Rgb(230, 210, 80),
                Color::Rgb(90, 200, 110),
                Color::Rgb(90, 150, 240),
                Color::Rgb(170, 110, 220),
                Color::Rgb(150, 150, 150),
            ],
        }
    }

    /// Dark theme (default)
    pub const fn dark() -> Self {
        Self::dark_const()
    }

    /// Light theme
    pub const fn light() -> Self {
        Self {
            primary: Color::Rgb(0, 100, 150),
            secondary: Color::Rgb(0, 0, 150),
            accent: Color::Rgb(180, 140, 0),
            muted: Color::Rgb(150, 150, 150),
            border: Color::Rgb(180, 180, 180),
            border_focused: Color::Rgb(0, 100, 150),
            background: Color::Rgb(255, 255, 255),
            background_alt: Color::Rgb(240, 240, 245),
            text: Color::Rgb(30, 30, 30),
            text_muted: Color::Rgb(100, 100, 100),
            selection: Color::Rgb(200, 220, 240),
            highlight: Color::Rgb(180, 140, 0),

            success: Color::Rgb(0, 128, 0),
            warning: Color::Rgb(180, 140, 0),
            error: Color::Rgb(200, 0, 0),
            info: Color::Rgb(0, 0, 200),

            badge_fg_dark: Color::Rgb(30, 30, 30),

            selected_row_bg: Color::Rgb(210, 230, 250),
            active_row_bg: Color::Rgb(235, 235, 240),
            tags: [
                Color::Reset,
                Color::Rgb(200, 0, 0),
                Color::Rgb(210, 110, 0),
                Color::Rgb(170, 140, 0),
                Color::Rgb(0, 128, 0),
                Color::Rgb(0, 80, 200),
                Color::Rgb(128, 0, 160),
                Color::Rgb(110, 110, 110),
            ],
        }
    }

    /// High contrast theme (accessibility)
    pub const fn high_contrast() -> Self {
        Self {
            primary: Color::LightCyan,
            secondary: Color::LightBlue,
            accent: Color::LightYellow,
            muted: Color::Gray,
            border: Color::White,
            border_focused: Color::LightCyan,
            background: Color::Black,
            background_alt: Color::Rgb(20, 20, 20),
            text: Color::White,
            text_muted: Color::Gray,
            selection: Color::White,
            highlight: Color::LightYellow,

            success: Color::LightGreen,
            warning: Color::LightYellow,
            error: Color::LightRed,
            info: Color::LightBlue,

            badge_fg_dark: Color::Black,

            selected_row_bg: Color::Rgb(50, 50, 110),
            active_row_bg: Color::Rgb(40, 40, 40),
            tags: [
                Color::Reset,
                Color::LightRed,
                Color::Rgb(255, 170, 0),
                Color::LightYellow,
                Color::LightGreen,
                Color::LightBlue,
                Color::LightMagenta,
                Color::Gray,
            ],
        }
    }

    /// Display color for a row tag.
    #[must_use]
    pub fn tag_color(&self, tag: ColorTag) -> Color {
        let idx = ColorTag::PALETTE
            .iter()
            .position(|c| *c == tag)
            .unwrap_or_default();
        self.tags[idx]
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Global theme instance (runtime switchable)
static THEME: RwLock<Theme> = RwLock::new(Theme::dark_const());

/// Theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: ColorScheme,
    pub name: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    const fn dark_const() -> Self {
        Self {
            colors: ColorScheme::dark_const(),
            name: "dark",
        }
    }

    pub const fn dark() -> Self {
        Self::dark_const()
    }

    pub const fn light() -> Self {
        Self {
            colors: ColorScheme::light(),
            name: "light",
        }
    }

    pub const fn high_contrast() -> Self {
        Self {
            colors: ColorScheme::high_contrast(),
            name: "high-contrast",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "high-contrast" | "highcontrast" | "hc" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    /// Get the next theme in the rotation
    #[must_use]
    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }
}

/// Get the current theme name
pub fn current_theme_name() -> &'static str {
    THEME.read().unwrap_or_else(PoisonError::into_inner).name
}

/// Set the current theme
pub fn set_theme(theme: Theme) {
    *THEME.write().unwrap_or_else(PoisonError::into_inner) = theme;
}

/// Toggle to the next theme in rotation (dark -> light -> high-contrast -> dark)
pub fn toggle_theme() -> &'static str {
    let mut theme = THEME.write().unwrap_or_else(PoisonError::into_inner);
    *theme = theme.next();
    theme.name
}

/// Convenience function to get current colors
pub fn colors() -> ColorScheme {
    THEME.read().unwrap_or_else(PoisonError::into_inner).colors
}

// ============================================================================
// Style Helpers
// ============================================================================

/// Common style presets for consistent UI elements
pub struct Styles;

impl Styles {
    pub fn header_title() -> Style {
        Style::default().fg(colors().primary).bold()
    }

    pub fn text() -> Style {
        Style::default().fg(colors().text)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(colors().text_muted)
    }

    pub fn label() -> Style {
        Style::default().fg(colors().muted)
    }

    /// Value text style (for data values)
    pub fn value() -> Style {
        Style::default().fg(colors().text).bold()
    }

    pub fn border() -> Style {
        Style::default().fg(colors().border)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors().border_focused)
    }

    /// The active grid cell
    pub fn active_cell() -> Style {
        Style::default()
            .bg(colors().primary)
            .fg(colors().badge_fg_dark)
            .bold()
    }

    /// A focused control inside a popup
    pub fn focused_control() -> Style {
        Style::default()
            .bg(colors().accent)
            .fg(colors().badge_fg_dark)
            .bold()
    }

    pub fn shortcut_key() -> Style {
        Style::default().fg(colors().accent)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(colors().text_muted)
    }

    pub fn success() -> Style {
        Style::default().fg(colors().success)
    }

    pub fn warning() -> Style {
        Style::default().fg(colors().warning)
    }

    pub fn error() -> Style {
        Style::default().fg(colors().error)
    }

    pub fn info() -> Style {
        Style::default().fg(colors().info)
    }
}

/// Render a page badge (e.g. PRODUCTOS, TIENDA)
pub fn mode_badge(label: &str) -> Span<'static> {
    let scheme = colors();
    Span::styled(
        format!(" {} ", label.to_uppercase()),
        Style::default()
            .fg(scheme.badge_fg_dark)
            .bg(scheme.primary)
            .bold(),
    )
}

/// Render footer hints as `[key]desc` spans.
pub fn render_footer_hints(hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!("[{key}]"), Styles::shortcut_key()));
        spans.push(Span::styled((*desc).to_string(), Styles::shortcut_desc()));
    }

    spans
}

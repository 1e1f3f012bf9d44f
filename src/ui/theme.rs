//! Centralized theming for the posta TUI
//!
//! Every color and style used by the composer comes from here, so switching
//! the configured variant restyles the whole screen.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use std::sync::RwLock;

use crate::config::ThemeVariant;

/// Global theme variant storage
static THEME_VARIANT: RwLock<ThemeVariant> = RwLock::new(ThemeVariant::Modern);

/// Initialize the theme variant (call once at startup)
pub fn init_theme(variant: ThemeVariant) {
    if let Ok(mut guard) = THEME_VARIANT.write() {
        *guard = variant;
    }
}

pub fn current_theme() -> ThemeVariant {
    THEME_VARIANT.read().map(|g| *g).unwrap_or_default()
}

/// Catppuccin Mocha color palette for the Modern theme
#[allow(dead_code)]
mod catppuccin {
    use super::Color;

    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e - main background
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825 - status bar, panels
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244 - borders
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a - selection

    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4 - primary
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de - secondary
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086 - muted/disabled

    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe - focused borders
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa - accent
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1 - success
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af - key hints
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8 - errors
    pub const MAUVE: Color = Color::Rgb(203, 166, 247); // #cba6f7 - assist button
}

pub mod borders {
    use super::*;

    /// Border type for popups, menus and modals
    pub fn popup() -> BorderType {
        match current_theme() {
            ThemeVariant::Modern => BorderType::Rounded,
            _ => BorderType::Plain,
        }
    }

    pub fn input_focused() -> BorderType {
        match current_theme() {
            ThemeVariant::Modern => BorderType::Rounded,
            _ => BorderType::Plain,
        }
    }
}

/// Color palette - colors that vary by theme
pub mod colors {
    use super::*;

    pub fn bg_selection() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::SURFACE1,
            ThemeVariant::Dark | ThemeVariant::HighContrast => Color::LightBlue,
        }
    }

    pub fn bg_status() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::MANTLE,
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Black,
        }
    }

    pub fn bg_error() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::RED,
            _ => Color::Red,
        }
    }

    pub fn fg_primary() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::TEXT,
            _ => Color::White,
        }
    }

    pub fn fg_secondary() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::SUBTEXT1,
            ThemeVariant::Dark => Color::Gray,
            ThemeVariant::HighContrast => Color::White,
        }
    }

    pub fn fg_muted() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::OVERLAY0,
            ThemeVariant::Dark | ThemeVariant::HighContrast => Color::Gray,
        }
    }

    pub fn fg_accent() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::BLUE,
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }

    pub fn fg_warning() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::YELLOW,
            ThemeVariant::Dark => Color::Yellow,
            ThemeVariant::HighContrast => Color::LightYellow,
        }
    }

    pub fn fg_success() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::GREEN,
            ThemeVariant::Dark => Color::Green,
            ThemeVariant::HighContrast => Color::LightGreen,
        }
    }

    pub fn assist() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::MAUVE,
            ThemeVariant::Dark => Color::Magenta,
            ThemeVariant::HighContrast => Color::LightMagenta,
        }
    }

    pub fn border() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::SURFACE0,
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Gray,
        }
    }

    pub fn border_focused() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::LAVENDER,
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }

    /// Background for help bar (same as status bar)
    pub fn bg_help() -> Color {
        bg_status()
    }

    /// Main background color for the entire UI
    pub fn bg_main() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::BASE,
            // Basic themes use terminal default
            _ => Color::Reset,
        }
    }
}

pub mod symbols {
    pub const ASSIST: &str = "✦";
    pub const ATTACHMENT: &str = "+";
    pub const MARKED: &str = "●";
    pub const UNMARKED: &str = "○";
    pub const DIRECTORY: &str = "▸";
    pub const SENT: &str = "✓";
}

/// Pre-composed styles for common UI elements
pub struct Theme;

impl Theme {
    pub fn selected() -> Style {
        Style::default()
            .bg(colors::bg_selection())
            .fg(colors::fg_primary())
    }

    pub fn text() -> Style {
        Style::default()
            .fg(colors::fg_primary())
            .bg(colors::bg_main())
    }

    pub fn text_secondary() -> Style {
        Style::default()
            .fg(colors::fg_secondary())
            .bg(colors::bg_main())
    }

    pub fn text_muted() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .bg(colors::bg_main())
    }

    pub fn text_accent() -> Style {
        Style::default()
            .fg(colors::fg_accent())
            .bg(colors::bg_main())
    }

    pub fn text_success() -> Style {
        Style::default()
            .fg(colors::fg_success())
            .bg(colors::bg_main())
    }

    pub fn title() -> Style {
        Self::text_accent().add_modifier(Modifier::BOLD)
    }

    // === Buttons ===

    pub fn button() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    /// The assist trigger, highlighted while its menu is open
    pub fn assist_button(active: bool) -> Style {
        let style = Style::default().fg(colors::assist()).add_modifier(Modifier::BOLD);
        if active {
            style.bg(colors::bg_selection())
        } else {
            style.bg(colors::bg_status())
        }
    }

    // === Bars ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    pub fn error_bar() -> Style {
        Style::default()
            .bg(colors::bg_error())
            .fg(colors::fg_primary())
    }

    pub fn help_bar() -> Style {
        Style::default()
            .bg(colors::bg_help())
            .fg(colors::fg_primary())
    }

    pub fn help_key() -> Style {
        Style::default()
            .bg(colors::bg_help())
            .fg(colors::fg_warning())
    }

    pub fn help_desc() -> Style {
        Style::default()
            .bg(colors::bg_help())
            .fg(colors::fg_muted())
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default().fg(colors::border()).bg(colors::bg_main())
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(colors::border_focused())
            .bg(colors::bg_main())
    }

    /// Main background style - fills the frame for RGB themes
    pub fn main_bg() -> Style {
        Style::default().bg(colors::bg_main())
    }

    pub fn label() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .bg(colors::bg_main())
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted input text (yellow, bold)
    pub fn input_highlight() -> Style {
        Style::default()
            .fg(colors::fg_warning())
            .bg(colors::bg_main())
            .add_modifier(Modifier::BOLD)
    }
}

/// Merge a style with selection or main background so a highlight spans
/// the whole row.
pub fn with_selection_bg(style: Style, selected: bool) -> Style {
    if selected {
        style.bg(colors::bg_selection())
    } else {
        style.bg(colors::bg_main())
    }
}

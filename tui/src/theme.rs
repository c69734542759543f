//! Color theme and glyphs for the Ghostline TUI.
//!
//! Phosphor green on black by default, with an optional 16-color override for
//! terminals that mangle RGB.

use ratatui::style::{Color, Modifier, Style};

use ghostline_types::ui::UiOptions;

/// Phosphor palette constants.
mod colors {
    use super::Color;

    pub const BG: Color = Color::Rgb(0, 0, 0);

    // === Greens ===
    pub const GREEN_BRIGHT: Color = Color::Rgb(74, 222, 128); // binary text
    pub const GREEN: Color = Color::Rgb(34, 197, 94); // hacker lines, gate
    pub const GREEN_DIM: Color = Color::Rgb(20, 83, 45); // system lines, footer
    pub const GREEN_TRACK: Color = Color::Rgb(5, 46, 22); // empty bar

    // === Alerts ===
    pub const RED: Color = Color::Rgb(220, 38, 38); // warnings
    pub const RED_DIM: Color = Color::Rgb(185, 28, 28); // binary marker
    pub const HUD_RED: Color = Color::Rgb(239, 68, 68);

    // === Insight ===
    pub const CYAN: Color = Color::Rgb(6, 182, 212);
    pub const CYAN_DIM: Color = Color::Rgb(22, 78, 99);

    pub const TEXT_MUTED: Color = Color::Rgb(82, 82, 91);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub green_bright: Color,
    pub green: Color,
    pub green_dim: Color,
    pub green_track: Color,
    pub red: Color,
    pub red_dim: Color,
    pub hud_red: Color,
    pub cyan: Color,
    pub cyan_dim: Color,
    pub text_muted: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg: colors::BG,
            green_bright: colors::GREEN_BRIGHT,
            green: colors::GREEN,
            green_dim: colors::GREEN_DIM,
            green_track: colors::GREEN_TRACK,
            red: colors::RED,
            red_dim: colors::RED_DIM,
            hud_red: colors::HUD_RED,
            cyan: colors::CYAN,
            cyan_dim: colors::CYAN_DIM,
            text_muted: colors::TEXT_MUTED,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            green_bright: Color::LightGreen,
            green: Color::Green,
            green_dim: Color::Green,
            green_track: Color::DarkGray,
            red: Color::LightRed,
            red_dim: Color::Red,
            hud_red: Color::LightRed,
            cyan: Color::LightCyan,
            cyan_dim: Color::Cyan,
            text_muted: Color::Gray,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for markers, rules and frames.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub binary_marker: &'static str,
    pub insight_rule: &'static str,
    pub bar_filled: &'static str,
    pub bar_empty: &'static str,
    pub frame_horizontal: &'static str,
    pub frame_vertical: &'static str,
    /// Top-left, top-right, bottom-left, bottom-right.
    pub frame_corners: [&'static str; 4],
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            binary_marker: "#",
            insight_rule: "|",
            bar_filled: "=",
            bar_empty: "-",
            frame_horizontal: "-",
            frame_vertical: "|",
            frame_corners: ["+", "+", "+", "+"],
        }
    } else {
        Glyphs {
            binary_marker: "#",
            insight_rule: "│",
            bar_filled: "━",
            bar_empty: "─",
            frame_horizontal: "─",
            frame_vertical: "│",
            frame_corners: ["┌", "┐", "└", "┘"],
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn binary(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.green_bright)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn binary_marker(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.red_dim)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn hacker(palette: &Palette) -> Style {
        Style::default().fg(palette.green)
    }

    #[must_use]
    pub fn warning(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.red)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn insight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.cyan)
            .add_modifier(Modifier::ITALIC)
    }

    #[must_use]
    pub fn insight_rule(palette: &Palette) -> Style {
        Style::default().fg(palette.cyan_dim)
    }

    #[must_use]
    pub fn system(palette: &Palette) -> Style {
        Style::default().fg(palette.green_dim)
    }

    #[must_use]
    pub fn hud_status(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.hud_red)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn hud_dim(palette: &Palette) -> Style {
        Style::default().fg(palette.green_dim)
    }

    #[must_use]
    pub fn gate(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.green)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }
}

//! Colour palette and styles for the clinic theme.
//!
//! Gold accents on a charcoal background, with the risk colours taken from
//! `RiskLevel::color`.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskLevel;

/// Clinic theme colour palette.
pub struct ClinicTheme;

impl ClinicTheme {
    /// Gold - primary accent
    pub const PRIMARY: Color = Color::Rgb(212, 175, 55); // #D4AF37

    /// Pale gold for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(240, 214, 128); // #F0D680

    /// Warm grey for borders
    pub const BORDER: Color = Color::Rgb(120, 113, 108); // #78716C

    pub const TEXT_PRIMARY: Color = Color::Rgb(250, 250, 249); // #FAFAF9
    pub const TEXT_SECONDARY: Color = Color::Rgb(168, 162, 158); // #A8A29E
    pub const TEXT_MUTED: Color = Color::Rgb(120, 113, 108); // #78716C

    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Foreground colour for a risk tier.
    #[must_use]
    pub fn risk_color(level: RiskLevel) -> Color {
        let (r, g, b) = level.color();
        Color::Rgb(r, g, b)
    }

    #[must_use]
    pub fn risk_level(level: RiskLevel) -> Style {
        Style::default()
            .fg(Self::risk_color(level))
            .add_modifier(Modifier::BOLD)
    }
}

//! Screen palette derived from the current condition

use ratatui::style::Color;

use crate::condition::{Background, Presentation};

/// Base colour for each background artwork
fn base_rgb(background: Background) -> (u8, u8, u8) {
    match background {
        Background::Sunny => (86, 164, 230),
        Background::PartlyCloudy => (110, 150, 190),
        Background::Cloudy => (120, 130, 145),
        Background::Rainy => (70, 95, 125),
        Background::Thunderstorm => (60, 55, 90),
        Background::Snowy => (170, 190, 210),
        Background::Mist => (140, 145, 150),
        Background::ClearNight => (25, 35, 80),
        Background::PartlyCloudyNight => (35, 45, 80),
        Background::CloudyNight => (45, 50, 65),
        Background::RainyNight => (30, 40, 60),
        Background::SnowyNight => (70, 80, 105),
        Background::MistNight => (55, 60, 70),
        Background::Default => (60, 110, 170),
    }
}

/// Darkens a channel by the overlay opacity
fn apply_overlay(channel: u8, opacity: f32) -> u8 {
    let keep = 1.0 - opacity.clamp(0.0, 1.0);
    (channel as f32 * keep).round() as u8
}

/// Colours used to draw a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Screen background
    pub background: Color,
    /// Borders and section headers
    pub accent: Color,
    /// Main text
    pub text: Color,
    /// Labels and secondary text
    pub muted: Color,
}

impl Theme {
    /// Builds the palette for a classified condition
    pub fn from_presentation(presentation: &Presentation) -> Self {
        let (r, g, b) = base_rgb(presentation.background);
        let opacity = presentation.overlay_opacity;
        let background = Color::Rgb(
            apply_overlay(r, opacity),
            apply_overlay(g, opacity),
            apply_overlay(b, opacity),
        );

        Self {
            background,
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::Gray,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_presentation(&crate::condition::classify(None))
    }
}

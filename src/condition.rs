//! Weather condition classification
//!
//! Maps OpenWeatherMap condition codes (`"01d"`, `"10n"`, ...) to the three
//! presentation facts the screens need: an icon glyph, a background art
//! identifier and the opacity of the darkening overlay drawn over it.

use std::fmt;

/// Glyph shown when a condition code has no icon entry
pub const FALLBACK_ICON: &str = "\u{1F324}\u{FE0F}"; // 🌤️

/// Overlay opacity when no condition code is available
pub const DEFAULT_OVERLAY: f32 = 0.3;
/// Overlay opacity for dark background art (rain, storm, snow, mist)
pub const DARK_OVERLAY: f32 = 0.2;
/// Overlay opacity for bright background art (clear and cloudy skies)
pub const BRIGHT_OVERLAY: f32 = 0.4;

/// Weather family encoded by the two leading digits of a condition code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionFamily {
    Clear,
    FewClouds,
    ScatteredClouds,
    BrokenClouds,
    ShowerRain,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

impl ConditionFamily {
    /// Parses the two-digit family prefix of a condition code
    pub fn from_digits(digits: &str) -> Option<Self> {
        match digits {
            "01" => Some(Self::Clear),
            "02" => Some(Self::FewClouds),
            "03" => Some(Self::ScatteredClouds),
            "04" => Some(Self::BrokenClouds),
            "09" => Some(Self::ShowerRain),
            "10" => Some(Self::Rain),
            "11" => Some(Self::Thunderstorm),
            "13" => Some(Self::Snow),
            "50" => Some(Self::Mist),
            _ => None,
        }
    }

    pub fn digits(&self) -> &'static str {
        match self {
            Self::Clear => "01",
            Self::FewClouds => "02",
            Self::ScatteredClouds => "03",
            Self::BrokenClouds => "04",
            Self::ShowerRain => "09",
            Self::Rain => "10",
            Self::Thunderstorm => "11",
            Self::Snow => "13",
            Self::Mist => "50",
        }
    }

    /// Families whose background art is dark and needs less dimming
    pub fn is_dark(&self) -> bool {
        matches!(
            self,
            Self::ShowerRain | Self::Rain | Self::Thunderstorm | Self::Snow | Self::Mist
        )
    }
}

/// Day or night variant of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPart {
    Day,
    Night,
}

/// A condition code from the fixed OpenWeatherMap vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConditionCode {
    pub family: ConditionFamily,
    pub day_part: DayPart,
}

impl ConditionCode {
    /// Parses an exact code such as `"13n"`. Anything else yields `None`.
    pub fn parse(code: &str) -> Option<Self> {
        if code.len() != 3 || !code.is_ascii() {
            return None;
        }
        let family = ConditionFamily::from_digits(&code[..2])?;
        let day_part = match &code[2..] {
            "d" => DayPart::Day,
            "n" => DayPart::Night,
            _ => return None,
        };
        Some(Self { family, day_part })
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.day_part {
            DayPart::Day => 'd',
            DayPart::Night => 'n',
        };
        write!(f, "{}{}", self.family.digits(), suffix)
    }
}

/// Background art shown behind the weather screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Background {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Thunderstorm,
    Snowy,
    Mist,
    ClearNight,
    PartlyCloudyNight,
    CloudyNight,
    RainyNight,
    SnowyNight,
    MistNight,
    /// Fallback art for unknown or missing codes
    Default,
}

impl Background {
    /// Stable identifier of the background art
    pub fn id(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::PartlyCloudy => "partlycloudy",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Thunderstorm => "thunderstorm",
            Self::Snowy => "snowy",
            Self::Mist => "mist",
            Self::ClearNight => "clearnight",
            Self::PartlyCloudyNight => "partlycloudynight",
            Self::CloudyNight => "cloudynight",
            Self::RainyNight => "rainynight",
            Self::SnowyNight => "snowynight",
            Self::MistNight => "mistnight",
            Self::Default => "default",
        }
    }
}

const ICONS: [(&str, &str); 18] = [
    ("01d", "\u{2600}\u{FE0F}"),   // ☀️
    ("01n", "\u{1F319}"),          // 🌙
    ("02d", "\u{26C5}"),           // ⛅
    ("02n", "\u{2601}\u{FE0F}"),   // ☁️
    ("03d", "\u{2601}\u{FE0F}"),
    ("03n", "\u{2601}\u{FE0F}"),
    ("04d", "\u{2601}\u{FE0F}"),
    ("04n", "\u{2601}\u{FE0F}"),
    ("09d", "\u{1F327}\u{FE0F}"),  // 🌧️
    ("09n", "\u{1F327}\u{FE0F}"),
    ("10d", "\u{1F326}\u{FE0F}"),  // 🌦️
    ("10n", "\u{1F327}\u{FE0F}"),
    ("11d", "\u{26C8}\u{FE0F}"),   // ⛈️
    ("11n", "\u{26C8}\u{FE0F}"),
    ("13d", "\u{1F328}\u{FE0F}"),  // 🌨️
    ("13n", "\u{1F328}\u{FE0F}"),
    ("50d", "\u{1F32B}\u{FE0F}"),  // 🌫️
    ("50n", "\u{1F32B}\u{FE0F}"),
];

// Several codes intentionally share one piece of art.
const BACKGROUNDS: [(&str, Background); 18] = [
    ("01d", Background::Sunny),
    ("02d", Background::PartlyCloudy),
    ("03d", Background::Cloudy),
    ("04d", Background::PartlyCloudy),
    ("09d", Background::Rainy),
    ("10d", Background::Rainy),
    ("11d", Background::Thunderstorm),
    ("13d", Background::Snowy),
    ("50d", Background::Mist),
    ("01n", Background::ClearNight),
    ("02n", Background::PartlyCloudyNight),
    ("03n", Background::CloudyNight),
    ("04n", Background::PartlyCloudyNight),
    ("09n", Background::RainyNight),
    ("10n", Background::RainyNight),
    ("11n", Background::Thunderstorm),
    ("13n", Background::SnowyNight),
    ("50n", Background::MistNight),
];

/// Presentation facts derived from a condition code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub icon: &'static str,
    pub background: Background,
    pub overlay_opacity: f32,
}

/// Returns the icon for an exact condition code, or the fallback glyph
pub fn icon_for(code: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, icon)| *icon)
        .unwrap_or(FALLBACK_ICON)
}

/// Returns the background for a condition code, `Background::Default` on a miss
pub fn background_for(code: Option<&str>) -> Background {
    let Some(code) = code.filter(|c| !c.is_empty()) else {
        return Background::Default;
    };
    BACKGROUNDS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, background)| *background)
        .unwrap_or(Background::Default)
}

/// Returns how strongly the background should be darkened behind text
pub fn overlay_opacity(code: Option<&str>) -> f32 {
    match code.filter(|c| !c.is_empty()) {
        None => DEFAULT_OVERLAY,
        Some(code) => match ConditionCode::parse(code) {
            Some(parsed) if parsed.family.is_dark() => DARK_OVERLAY,
            _ => BRIGHT_OVERLAY,
        },
    }
}

/// Classifies a condition code into its presentation facts.
///
/// Total over every input: unknown, empty or missing codes resolve through
/// the fallback icon, the default background and the default overlay.
pub fn classify(code: Option<&str>) -> Presentation {
    Presentation {
        icon: code.map(icon_for).unwrap_or(FALLBACK_ICON),
        background: background_for(code),
        overlay_opacity: overlay_opacity(code),
    }
}

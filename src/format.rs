//! Display formatting for the fixed Turkish locale
//!
//! Every helper is pure and takes raw API values (Celsius, m/s, hPa, meters,
//! Unix timestamps) and returns the text shown on screen.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Placeholder for values that cannot be formatted
const UNKNOWN: &str = "-";

const WEEKDAYS: [&str; 7] = [
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
    "Pazar",
];

const WEEKDAYS_SHORT: [&str; 7] = ["Pzt", "Sal", "Çar", "Per", "Cum", "Cmt", "Paz"];

const MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

const MONTHS_SHORT: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];

/// 16-point compass in Turkish abbreviations, clockwise from north.
///
/// Every bearing goes through this table, 0 and missing values included, so
/// calm or unreported wind reads `K`, never a bare English `N`.
const COMPASS: [&str; 16] = [
    "K", "KKD", "KD", "DKD", "D", "DGD", "GD", "GGD", "G", "GGB", "GB", "BGB", "B", "BBK", "BK",
    "KBK",
];

/// Rounds to the nearest integer with halves going up (2.5 -> 3, -2.5 -> -2)
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Formats a Celsius temperature, e.g. `"27°"`
pub fn format_temperature(celsius: f64) -> String {
    format!("{}\u{00B0}", round_half_up(celsius))
}

/// Formats relative humidity, e.g. `"%58"`
pub fn format_humidity(humidity: i32) -> String {
    format!("%{}", humidity)
}

/// Converts m/s to km/h, e.g. `5.14` -> `"19 km/h"`
pub fn format_wind_speed(meters_per_second: f64) -> String {
    format!("{} km/h", round_half_up(meters_per_second * 3.6))
}

/// Formats pressure, e.g. `"1012 hPa"`
pub fn format_pressure(hpa: i32) -> String {
    format!("{} hPa", hpa)
}

/// Formats visibility in kilometers from 1 km upwards, meters below
pub fn format_visibility(meters: u32) -> String {
    if meters >= 1000 {
        format!("{:.1} km", meters as f64 / 1000.0)
    } else {
        format!("{} m", meters)
    }
}

/// Formats a percentage, e.g. cloud cover `"%20"`
pub fn format_percent(value: i32) -> String {
    format!("%{}", value)
}

fn shifted(timestamp: i64, timezone_offset: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(timestamp.checked_add(timezone_offset)?, 0)
}

/// Long date in the location's local time, e.g. `"15 Temmuz Pazartesi"`
pub fn format_date(timestamp: i64, timezone_offset: i64) -> String {
    match shifted(timestamp, timezone_offset) {
        Some(dt) => format!(
            "{} {} {}",
            dt.day(),
            MONTHS[dt.month0() as usize],
            WEEKDAYS[dt.weekday().num_days_from_monday() as usize]
        ),
        None => UNKNOWN.to_string(),
    }
}

/// Clock time in the location's local time, e.g. `"05:25"`
pub fn format_time(timestamp: i64, timezone_offset: i64) -> String {
    match shifted(timestamp, timezone_offset) {
        Some(dt) => format!("{:02}:{:02}", dt.hour(), dt.minute()),
        None => UNKNOWN.to_string(),
    }
}

/// Short UTC weekday name, e.g. `"Pzt"`
pub fn format_weekday_short(timestamp: i64) -> String {
    match shifted(timestamp, 0) {
        Some(dt) => WEEKDAYS_SHORT[dt.weekday().num_days_from_monday() as usize].to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Short UTC day and month, e.g. `"15 Tem"`
pub fn format_day_month(timestamp: i64) -> String {
    match shifted(timestamp, 0) {
        Some(dt) => format!("{} {}", dt.day(), MONTHS_SHORT[dt.month0() as usize]),
        None => UNKNOWN.to_string(),
    }
}

/// Compass abbreviation for a wind direction in degrees
pub fn wind_direction(degrees: f64) -> &'static str {
    let sector = (degrees / 22.5).round() as i64;
    COMPASS[sector.rem_euclid(16) as usize]
}

/// Precipitation probability (0-1) as a whole percentage
pub fn rain_chance(probability: f64) -> u8 {
    round_half_up(probability * 100.0).clamp(0, 100) as u8
}

/// Uppercases the first character of a description
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

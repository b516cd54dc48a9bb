//! Forecast aggregation
//!
//! Turns the chronological list of forecast samples into the two views the
//! detail screen shows: an hourly strip and one entry per calendar day.

use std::collections::HashSet;

use crate::condition::{classify, Presentation};
use crate::data::ForecastSample;

/// Maximum number of samples in the hourly view
pub const HOURLY_LIMIT: usize = 24;

/// Maximum number of days in the daily view
pub const DAILY_LIMIT: usize = 7;

/// Returns the first [`HOURLY_LIMIT`] samples in input order
pub fn hourly_view(samples: &[ForecastSample]) -> &[ForecastSample] {
    &samples[..samples.len().min(HOURLY_LIMIT)]
}

/// Returns the first sample of each UTC calendar date, in first-seen order,
/// for at most [`DAILY_LIMIT`] dates.
///
/// The first sample stands in for the whole day; nothing is averaged. Dates
/// come from the sample timestamp alone, so a location's timezone offset does
/// not move samples between days.
pub fn daily_view(samples: &[ForecastSample]) -> Vec<&ForecastSample> {
    let mut seen_days = HashSet::new();
    let mut daily = Vec::with_capacity(DAILY_LIMIT);

    for sample in samples {
        if daily.len() == DAILY_LIMIT {
            break;
        }
        if seen_days.insert(sample.day_index()) {
            daily.push(sample);
        }
    }

    daily
}

/// A forecast sample paired with its presentation facts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastEntry<'a> {
    pub sample: &'a ForecastSample,
    pub presentation: Presentation,
}

impl<'a> ForecastEntry<'a> {
    pub fn new(sample: &'a ForecastSample) -> Self {
        Self {
            sample,
            presentation: classify(Some(sample.condition_code.as_str())),
        }
    }
}

/// Hourly view with icons resolved for display
pub fn hourly_entries(samples: &[ForecastSample]) -> Vec<ForecastEntry<'_>> {
    hourly_view(samples).iter().map(ForecastEntry::new).collect()
}

/// Daily view with icons resolved for display
pub fn daily_entries(samples: &[ForecastSample]) -> Vec<ForecastEntry<'_>> {
    daily_view(samples).into_iter().map(ForecastEntry::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FALLBACK_ICON;
    use crate::data::fixtures::sample;
    use chrono::NaiveDate;

    /// 2024-07-15 00:00:00 UTC
    const DAY_START: i64 = 1_721_001_600;
    const THREE_HOURS: i64 = 3 * 3600;

    /// Three-hourly samples starting at the given timestamp
    fn three_hourly(start: i64, count: usize) -> Vec<ForecastSample> {
        (0..count)
            .map(|i| {
                let mut s = sample(start + i as i64 * THREE_HOURS, "01d");
                s.temperature = i as f64;
                s
            })
            .collect()
    }

    #[test]
    fn test_hourly_view_truncates_to_limit() {
        let samples = three_hourly(DAY_START, 40);
        let hourly = hourly_view(&samples);

        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly, &samples[..24]);
    }

    #[test]
    fn test_hourly_view_shorter_input() {
        for count in [0, 1, 23, 24] {
            let samples = three_hourly(DAY_START, count);
            let hourly = hourly_view(&samples);
            assert_eq!(hourly.len(), count.min(HOURLY_LIMIT));
            assert_eq!(hourly, &samples[..]);
        }
    }

    #[test]
    fn test_five_day_scenario() {
        // 40 three-hourly samples from midnight: 8 per day over exactly 5 days
        let samples = three_hourly(DAY_START, 40);

        let hourly = hourly_view(&samples);
        assert_eq!(hourly, &samples[..24]);

        let daily = daily_view(&samples);
        assert_eq!(daily.len(), 5);
        for (day, entry) in daily.iter().enumerate() {
            assert_eq!(*entry, &samples[day * 8], "day {}", day);
        }
    }

    #[test]
    fn test_daily_view_starting_mid_day() {
        // First sample at 21:00, so day one only has a single sample
        let samples = three_hourly(DAY_START + 21 * 3600, 40);
        let daily = daily_view(&samples);

        assert_eq!(daily.len(), 6);
        assert_eq!(daily[0], &samples[0]);
        assert_eq!(daily[1], &samples[1]);
        assert_eq!(daily[2], &samples[9]);
    }

    #[test]
    fn test_daily_view_caps_at_seven_days() {
        // Ten days, one sample each
        let samples: Vec<_> = (0..10)
            .map(|day| sample(DAY_START + day * 86_400 + 3600, "01d"))
            .collect();
        let daily = daily_view(&samples);

        assert_eq!(daily.len(), DAILY_LIMIT);
        assert_eq!(daily, samples.iter().take(7).collect::<Vec<_>>());
    }

    #[test]
    fn test_daily_view_single_date() {
        let samples = three_hourly(DAY_START, 8);
        let daily = daily_view(&samples);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0], &samples[0]);
    }

    #[test]
    fn test_daily_view_identical_timestamps() {
        let mut first = sample(DAY_START, "01d");
        first.description = "first".to_string();
        let mut second = sample(DAY_START, "10d");
        second.description = "second".to_string();
        let samples = vec![first, second];

        let daily = daily_view(&samples);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].description, "first");
    }

    #[test]
    fn test_daily_view_dates_distinct_and_first_seen_order() {
        // Out-of-order input is not re-sorted: a revisited date is skipped
        let samples = vec![
            sample(DAY_START + 2 * 86_400, "01d"),
            sample(DAY_START, "02d"),
            sample(DAY_START + 2 * 86_400 + 3600, "03d"),
            sample(DAY_START + 86_400, "04d"),
        ];
        let daily = daily_view(&samples);

        let codes: Vec<_> = daily.iter().map(|s| s.condition_code.as_str()).collect();
        assert_eq!(codes, vec!["01d", "02d", "04d"]);

        let days: HashSet<_> = daily.iter().map(|s| s.day_index()).collect();
        assert_eq!(days.len(), daily.len());

        let dates: Vec<_> = daily.iter().filter_map(|s| s.date()).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 7, 17).unwrap(),
                NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 7, 16).unwrap(),
            ]
        );
    }

    #[test]
    fn test_daily_view_ignores_timezone_offset() {
        // 22:00 and 23:00 UTC stay on the same date even if local time is UTC+3
        let samples = vec![
            sample(DAY_START + 22 * 3600, "01n"),
            sample(DAY_START + 23 * 3600, "01n"),
        ];
        assert_eq!(daily_view(&samples).len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_views() {
        let samples: Vec<ForecastSample> = Vec::new();
        assert!(hourly_view(&samples).is_empty());
        assert!(daily_view(&samples).is_empty());
        assert!(hourly_entries(&samples).is_empty());
        assert!(daily_entries(&samples).is_empty());
    }

    #[test]
    fn test_views_are_repeatable() {
        let samples = three_hourly(DAY_START + 5 * 3600, 40);
        assert_eq!(daily_view(&samples), daily_view(&samples));
        assert_eq!(hourly_view(&samples), hourly_view(&samples));
    }

    #[test]
    fn test_entries_resolve_presentation() {
        let samples = vec![
            sample(DAY_START, "13d"),
            sample(DAY_START + 86_400, "unknown"),
        ];
        let entries = daily_entries(&samples);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].presentation.icon, "\u{1F328}\u{FE0F}");
        assert_eq!(entries[0].presentation.overlay_opacity, 0.2);
        assert_eq!(entries[1].presentation.icon, FALLBACK_ICON);
        assert!(std::ptr::eq(entries[0].sample, &samples[0]));

        let hourly = hourly_entries(&samples);
        assert_eq!(hourly.len(), 2);
    }
}

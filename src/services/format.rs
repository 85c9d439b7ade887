//! Display formatting for session and visitor records
//!
//! Pure, total functions shared by the CSV and PDF export paths.
//! No side effects, no external I/O.

use crate::domain::Session;
use chrono::{DateTime, Utc};

/// Format a timestamp as a long locale-style date, e.g.
/// "Saturday, June 14, 2025"
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%A, %B %-d, %Y").to_string()
}

/// Format a timestamp as a 12-hour clock time, e.g. "6:05 PM"
pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.format("%-I:%M %p").to_string()
}

/// Format a duration in minutes as "X hours Y minutes"
///
/// Singular/plural aware; a zero hour or minute component is omitted
/// entirely. Zero total renders as "0 minutes".
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    let mut parts = Vec::new();
    if hours != 0 {
        parts.push(format!("{} hour{}", hours, if hours.abs() == 1 { "" } else { "s" }));
    }
    if mins != 0 {
        parts.push(format!("{} minute{}", mins, if mins.abs() == 1 { "" } else { "s" }));
    }
    if parts.is_empty() {
        return "0 minutes".to_string();
    }
    parts.join(" ")
}

/// Actual session duration in minutes, rounded to the nearest minute
///
/// `None` when either actual timestamp is absent. End-before-start data
/// yields a negative duration and is passed through unchanged.
pub fn calculate_duration(session: &Session) -> Option<i64> {
    let start = session.actual_start_time?;
    let end = session.actual_end_time?;
    let ms = (end - start).num_milliseconds();
    Some((ms as f64 / 60_000.0).round() as i64)
}

/// Weighted-average interest level across a session's distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageInterest {
    High,
    Medium,
    Low,
    NotAvailable,
}

impl AverageInterest {
    pub fn as_str(&self) -> &'static str {
        match self {
            AverageInterest::High => "High",
            AverageInterest::Medium => "Medium",
            AverageInterest::Low => "Low",
            AverageInterest::NotAvailable => "N/A",
        }
    }
}

impl std::fmt::Display for AverageInterest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Average interest for a session: weights high=3, medium=2, low=1
///
/// Boundaries are inclusive: a weighted average of exactly 2.5 is High
/// and exactly 1.5 is Medium. Zero counted visitors yields
/// [`AverageInterest::NotAvailable`].
pub fn average_interest(session: &Session) -> AverageInterest {
    let dist = &session.interest_level_distribution;
    let total = dist.total();
    if total == 0 {
        return AverageInterest::NotAvailable;
    }

    let weighted = (dist.high * 3 + dist.medium * 2 + dist.low) as f64 / total as f64;
    if weighted >= 2.5 {
        AverageInterest::High
    } else if weighted >= 1.5 {
        AverageInterest::Medium
    } else {
        AverageInterest::Low
    }
}

/// Percentage of `count` over `total`, rounded; 0 when `total` is 0
pub fn interest_percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Capitalize the first letter only, leaving the rest unchanged
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InterestDistribution, SessionId, SessionStatus};
    use chrono::TimeZone;

    fn session_with_times(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Session {
        Session {
            session_id: SessionId("s-1".to_string()),
            property_address: "12 Ocean Ave".to_string(),
            scheduled_date: Utc::now(),
            scheduled_start_time: Utc::now(),
            actual_start_time: start,
            actual_end_time: end,
            status: SessionStatus::Completed,
            visitor_count: 0,
            interest_level_distribution: InterestDistribution::default(),
            notes: None,
        }
    }

    fn session_with_distribution(high: u32, medium: u32, low: u32) -> Session {
        let mut s = session_with_times(None, None);
        s.interest_level_distribution = InterestDistribution { high, medium, low };
        s.visitor_count = high + medium + low;
        s
    }

    #[test]
    fn test_format_date_long_form() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 14, 18, 5, 0).unwrap();
        assert_eq!(format_date(ts), "Saturday, June 14, 2025");
    }

    #[test]
    fn test_format_date_single_digit_day() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        assert_eq!(format_date(ts), "Sunday, March 2, 2025");
    }

    #[test]
    fn test_format_time_twelve_hour() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 14, 18, 5, 0).unwrap();
        assert_eq!(format_time(ts), "6:05 PM");

        let morning = Utc.with_ymd_and_hms(2025, 6, 14, 9, 30, 0).unwrap();
        assert_eq!(format_time(morning), "9:30 AM");
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(0), "0 minutes");
        assert_eq!(format_duration(1), "1 minute");
        assert_eq!(format_duration(45), "45 minutes");
        assert_eq!(format_duration(60), "1 hour");
        assert_eq!(format_duration(61), "1 hour 1 minute");
        assert_eq!(format_duration(150), "2 hours 30 minutes");
    }

    #[test]
    fn test_calculate_duration_null_safety() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 14, 18, 0, 0).unwrap();
        assert_eq!(calculate_duration(&session_with_times(None, Some(ts))), None);
        assert_eq!(calculate_duration(&session_with_times(Some(ts), None)), None);
        assert_eq!(calculate_duration(&session_with_times(None, None)), None);
    }

    #[test]
    fn test_calculate_duration_ninety_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 6, 14, 18, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 14, 19, 30, 0).unwrap();
        assert_eq!(calculate_duration(&session_with_times(Some(start), Some(end))), Some(90));
    }

    #[test]
    fn test_calculate_duration_negative_passes_through() {
        let start = Utc.with_ymd_and_hms(2025, 6, 14, 19, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 14, 18, 30, 0).unwrap();
        assert_eq!(calculate_duration(&session_with_times(Some(start), Some(end))), Some(-30));
    }

    #[test]
    fn test_average_interest_boundaries() {
        assert_eq!(average_interest(&session_with_distribution(3, 0, 0)), AverageInterest::High);
        assert_eq!(
            average_interest(&session_with_distribution(0, 0, 0)),
            AverageInterest::NotAvailable
        );
        // Weighted average exactly 2.5 is inclusive High
        assert_eq!(average_interest(&session_with_distribution(1, 1, 0)), AverageInterest::High);
        assert_eq!(average_interest(&session_with_distribution(0, 1, 0)), AverageInterest::Medium);
        assert_eq!(average_interest(&session_with_distribution(0, 0, 2)), AverageInterest::Low);
        // Exactly 1.5 is inclusive Medium
        assert_eq!(average_interest(&session_with_distribution(0, 1, 1)), AverageInterest::Medium);
    }

    #[test]
    fn test_interest_percentage_zero_guard() {
        assert_eq!(interest_percentage(3, 0), 0);
        assert_eq!(interest_percentage(1, 3), 33);
        assert_eq!(interest_percentage(2, 3), 67);
        assert_eq!(interest_percentage(3, 3), 100);
    }

    #[test]
    fn test_capitalize_first_letter_only() {
        assert_eq!(capitalize("high"), "High");
        assert_eq!(capitalize("qr"), "Qr");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("mEDIUM"), "MEDIUM");
    }
}

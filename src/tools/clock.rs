//! Current date and time tool
//!
//! Formats the server-local time with German weekday and month names, the
//! way the assistant speaks dates aloud.

use chrono::{DateTime, Datelike, Local, Timelike};

const WEEKDAYS: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Render the current local date and time as spoken German.
#[must_use]
pub fn current_time() -> String {
    format_time(Local::now())
}

/// Render a timestamp as spoken German, e.g.
/// "Aktuelle Zeit: Montag, 5. August 2026, 14:03:22 Uhr"
#[must_use]
pub fn format_time<Tz: chrono::TimeZone>(now: DateTime<Tz>) -> String {
    let weekday = WEEKDAYS[now.weekday().num_days_from_monday() as usize];
    let month = MONTHS[now.month0() as usize];

    format!(
        "Aktuelle Zeit: {weekday}, {}. {month} {}, {:02}:{:02}:{:02} Uhr",
        now.day(),
        now.year(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn formats_german_date() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 5, 14, 3, 22).unwrap();
        assert_eq!(
            format_time(ts),
            "Aktuelle Zeit: Mittwoch, 5. August 2026, 14:03:22 Uhr"
        );
    }

    #[test]
    fn pads_small_time_components() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 7, 5, 9).unwrap();
        let text = format_time(ts);
        assert!(text.contains("07:05:09 Uhr"));
        assert!(text.contains("1. Januar 2026"));
    }

    #[test]
    fn weekday_table_is_monday_based() {
        // 2026-01-05 is a Monday
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        assert!(format_time(ts).contains("Montag"));
    }
}

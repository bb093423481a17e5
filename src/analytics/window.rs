use chrono::{DateTime, Utc};

pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// The UTC calendar day containing an instant, as a half-open millisecond
/// range plus its `YYYY-MM-DD` key in `daily_stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub date: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Day {
    pub fn containing(now: DateTime<Utc>) -> Self {
        let now_ms = now.timestamp_millis();
        let start_ms = now_ms - now_ms.rem_euclid(DAY_MS);
        Self {
            date: date_key(now),
            start_ms,
            end_ms: start_ms + DAY_MS,
        }
    }

    /// Start of the day `days` before this one.
    pub fn start_days_back(&self, days: i64) -> i64 {
        self.start_ms - days * DAY_MS
    }
}

pub fn date_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// `daily_stats` key of the day `days` before `now`.
pub fn date_key_days_back(now: DateTime<Utc>, days: i64) -> String {
    date_key(now - chrono::Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_bounds_are_utc_midnights() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        let day = Day::containing(now);
        let midnight = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap();

        assert_eq!(day.date, "2026-03-14");
        assert_eq!(day.start_ms, midnight.timestamp_millis());
        assert_eq!(day.end_ms - day.start_ms, DAY_MS);
    }

    #[test]
    fn test_midnight_belongs_to_new_day() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let day = Day::containing(now);
        assert_eq!(day.date, "2026-01-01");
        assert_eq!(day.start_ms, now.timestamp_millis());
    }

    #[test]
    fn test_days_back_crosses_month() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        assert_eq!(date_key_days_back(now, 6), "2026-02-24");
        assert_eq!(date_key_days_back(now, 29), "2026-02-01");

        let day = Day::containing(now);
        let feb_24 = Utc.with_ymd_and_hms(2026, 2, 24, 0, 0, 0).unwrap();
        assert_eq!(day.start_days_back(6), feb_24.timestamp_millis());
    }
}

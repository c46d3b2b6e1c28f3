//! Date formatting for list rows.

use chrono::{DateTime, Utc};

/// Human relative time from `now` to `at`: `in 3 days`, `2 hours ago`, `now`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = at.signed_duration_since(now).num_seconds();
    let secs = delta.unsigned_abs();

    let (amount, unit) = match secs {
        0..45 => return "now".to_string(),
        45..2_700 => (round_div(secs, 60), "minute"),
        2_700..79_200 => (round_div(secs, 3_600), "hour"),
        79_200..2_246_400 => (round_div(secs, 86_400), "day"),
        2_246_400..28_512_000 => (round_div(secs, 2_592_000), "month"),
        _ => (round_div(secs, 31_536_000), "year"),
    };
    let unit = if amount == 1 {
        unit.to_string()
    } else {
        format!("{unit}s")
    };

    if delta > 0 {
        format!("in {amount} {unit}")
    } else {
        format!("{amount} {unit} ago")
    }
}

fn round_div(value: u64, by: u64) -> u64 {
    ((value + by / 2) / by).max(1)
}

/// Calendar date, e.g. `Jan 20, 2008`.
pub fn absolute_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// Wall-clock time, e.g. `10:00 PM`.
pub fn absolute_time(at: DateTime<Utc>) -> String {
    at.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn future_and_past() {
        assert_eq!(relative_time(now() + Duration::days(3), now()), "in 3 days");
        assert_eq!(relative_time(now() - Duration::hours(2), now()), "2 hours ago");
        assert_eq!(relative_time(now() + Duration::days(1), now()), "in 1 day");
    }

    #[test]
    fn minutes_and_now() {
        assert_eq!(relative_time(now() + Duration::seconds(10), now()), "now");
        assert_eq!(relative_time(now() + Duration::minutes(5), now()), "in 5 minutes");
        assert_eq!(relative_time(now() - Duration::minutes(1), now()), "1 minute ago");
    }

    #[test]
    fn months_and_years() {
        assert_eq!(relative_time(now() + Duration::days(60), now()), "in 2 months");
        assert_eq!(relative_time(now() - Duration::days(730), now()), "2 years ago");
    }

    #[test]
    fn absolute_formats() {
        let at = Utc.with_ymd_and_hms(2008, 1, 20, 22, 0, 0).unwrap();
        assert_eq!(absolute_date(at), "Jan 20, 2008");
        assert_eq!(absolute_time(at), "10:00 PM");
    }
}

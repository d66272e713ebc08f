use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::utils::constants::DEFAULT_TRANSACTIONS_WINDOW_DAYS;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Resolve a transactions date range. Missing ends fall back to a trailing
/// window that ends `today`. `None` when that window starts before the
/// earliest representable date.
pub fn transactions_window(
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let to = to_date.unwrap_or(today);
    let from = match from_date {
        Some(from) => from,
        None => to.checked_sub_signed(Duration::days(DEFAULT_TRANSACTIONS_WINDOW_DAYS))?,
    };
    Some((from, to))
}

/// Accepts an RFC 3339 / ISO-8601 timestamp, returns it untouched.
pub fn check_rfc3339(value: &str) -> Option<&str> {
    DateTime::parse_from_rfc3339(value).ok().map(|_| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn defaults_to_trailing_thirty_days() {
        let (from, to) = transactions_window(None, None, date("2026-03-31")).unwrap();
        assert_eq!(from, date("2026-03-01"));
        assert_eq!(to, date("2026-03-31"));
    }

    #[test]
    fn window_anchors_on_explicit_end() {
        let (from, to) = transactions_window(None, Some(date("2026-01-31")), date("2026-03-31")).unwrap();
        assert_eq!(from, date("2026-01-01"));
        assert_eq!(to, date("2026-01-31"));

        let (from, _) = transactions_window(Some(date("2025-12-01")), None, date("2026-03-31")).unwrap();
        assert_eq!(from, date("2025-12-01"));
    }

    #[test]
    fn window_before_earliest_date_is_rejected() {
        assert_eq!(transactions_window(None, Some(NaiveDate::MIN), date("2026-03-31")), None);
        assert_eq!(
            transactions_window(Some(NaiveDate::MIN), Some(NaiveDate::MIN), date("2026-03-31")),
            Some((NaiveDate::MIN, NaiveDate::MIN))
        );
    }

    #[test]
    fn rfc3339_check_keeps_original_text() {
        assert_eq!(check_rfc3339("2026-02-01T10:00:00+03:00"), Some("2026-02-01T10:00:00+03:00"));
        assert_eq!(check_rfc3339("yesterday"), None);
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Per-request view of "now" in the user's time zone.
///
/// Built once by the handler from the stored user timezone and passed into
/// every date computation that needs to know what today is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    pub tz: Tz,
    pub today: NaiveDate,
}

impl TimeContext {
    pub fn new(tz: Tz, now: DateTime<Utc>) -> Self {
        Self {
            tz,
            today: now.with_timezone(&tz).date_naive(),
        }
    }

    /// Parse an IANA zone name, falling back to `fallback` when it is unknown.
    pub fn from_user_timezone(name: &str, fallback: Tz, now: DateTime<Utc>) -> Self {
        let tz = match name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(timezone = %name, fallback = %fallback, "Unknown user timezone");
                fallback
            }
        };
        Self::new(tz, now)
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today
    }

    pub fn is_future(&self, date: NaiveDate) -> bool {
        date > self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_follows_user_zone() {
        // 02:30 UTC on the 15th is still the 14th in New York
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 2, 30, 0).unwrap();
        let ctx = TimeContext::new(chrono_tz::America::New_York, now);
        assert_eq!(ctx.today, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());

        let utc = TimeContext::new(chrono_tz::UTC, now);
        assert_eq!(utc.today, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_unknown_timezone_uses_fallback() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let ctx = TimeContext::from_user_timezone("Mars/Olympus", chrono_tz::UTC, now);
        assert_eq!(ctx.tz, chrono_tz::UTC);

        let ctx = TimeContext::from_user_timezone("Asia/Tokyo", chrono_tz::UTC, now);
        assert_eq!(ctx.tz, chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn test_future_and_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let ctx = TimeContext::new(chrono_tz::UTC, now);
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(ctx.is_today(today));
        assert!(!ctx.is_future(today));
        assert!(ctx.is_future(today.succ_opt().unwrap()));
        assert!(!ctx.is_future(today.pred_opt().unwrap()));
    }

    #[test]
    fn test_today_ahead_of_utc() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap();
        let ctx = TimeContext::new(chrono_tz::Asia::Tokyo, now);
        assert_eq!(ctx.today, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }
}

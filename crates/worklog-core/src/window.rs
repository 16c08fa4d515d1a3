//! Bucketing for completed-task counts: the bucket width (view) and how far
//! back the series reaches (lookback).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Width of one completed-count bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionView {
    /// Buckets start Monday 00:00 UTC.
    #[default]
    Week,
    /// Buckets start on the 1st, 00:00 UTC.
    Month,
}

impl CompletionView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Start of the bucket containing `ts`.
    pub fn truncate(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        let start = match self {
            Self::Week => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date),
            Self::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
        };
        start.and_hms_opt(0, 0, 0).map_or(ts, |midnight| midnight.and_utc())
    }

    /// Start of the bucket after the one starting at `bucket`.
    pub fn step(&self, bucket: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Week => bucket
                .checked_add_signed(Duration::weeks(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            Self::Month => bucket
                .checked_add_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

impl fmt::Display for CompletionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionView {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(CoreError::InvalidView(s.to_string())),
        }
    }
}

/// Calendar unit of a [`Lookback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackUnit {
    Day,
    Week,
    Month,
    Year,
}

/// Longest accepted lookback, in days.
pub const MAX_LOOKBACK_DAYS: u64 = 100 * 366;

/// How far back a completed-count series reaches, e.g. `"3 months"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    pub amount: u32,
    pub unit: LookbackUnit,
}

impl Lookback {
    pub fn new(amount: u32, unit: LookbackUnit) -> Self {
        Self { amount, unit }
    }

    /// Upper bound of the span in days, counting months as 31 days and
    /// years as 366.
    pub fn max_days(&self) -> u64 {
        let per_unit = match self.unit {
            LookbackUnit::Day => 1,
            LookbackUnit::Week => 7,
            LookbackUnit::Month => 31,
            LookbackUnit::Year => 366,
        };
        u64::from(self.amount) * per_unit
    }

    /// The instant `self` before `now`.
    ///
    /// Fails for spans over [`MAX_LOOKBACK_DAYS`] or reaching past the
    /// representable calendar.
    pub fn before(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, CoreError> {
        let out_of_range = || CoreError::InvalidLookback(self.to_string());
        if self.max_days() > MAX_LOOKBACK_DAYS {
            return Err(out_of_range());
        }
        let amount = u64::from(self.amount);
        let earlier = match self.unit {
            LookbackUnit::Day => now.checked_sub_days(Days::new(amount)),
            LookbackUnit::Week => now.checked_sub_days(Days::new(amount * 7)),
            LookbackUnit::Month => now.checked_sub_months(Months::new(self.amount)),
            LookbackUnit::Year => self
                .amount
                .checked_mul(12)
                .and_then(|m| now.checked_sub_months(Months::new(m))),
        };
        earlier.ok_or_else(out_of_range)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::new(1, LookbackUnit::Month)
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            LookbackUnit::Day => "day",
            LookbackUnit::Week => "week",
            LookbackUnit::Month => "month",
            LookbackUnit::Year => "year",
        };
        let plural = if self.amount == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.amount, unit, plural)
    }
}

impl FromStr for Lookback {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidLookback(s.to_string());
        let text = s.trim();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, unit) = text.split_at(split);

        let amount: u32 = digits.parse().map_err(|_| invalid())?;
        let unit = match unit.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => LookbackUnit::Day,
            "week" | "weeks" => LookbackUnit::Week,
            "mon" | "mons" | "month" | "months" => LookbackUnit::Month,
            "year" | "years" => LookbackUnit::Year,
            _ => return Err(invalid()),
        };
        let lookback = Self::new(amount, unit);
        if lookback.max_days() > MAX_LOOKBACK_DAYS {
            return Err(invalid());
        }
        Ok(lookback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_week_truncates_to_monday() {
        // 2025-03-13 is a Thursday.
        let ts = Utc.with_ymd_and_hms(2025, 3, 13, 15, 42, 7).unwrap();
        let bucket = CompletionView::Week.truncate(ts);
        assert_eq!(bucket, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(CompletionView::Week.truncate(bucket), bucket);
    }

    #[test]
    fn test_month_truncates_and_steps() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let bucket = CompletionView::Month.truncate(ts);
        assert_eq!(bucket, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            CompletionView::Month.step(bucket),
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("week".parse::<CompletionView>(), Ok(CompletionView::Week));
        assert_eq!("Month".parse::<CompletionView>(), Ok(CompletionView::Month));
        assert!("day".parse::<CompletionView>().is_err());
    }

    #[test]
    fn test_lookback_parse() {
        assert_eq!("1 months".parse::<Lookback>(), Ok(Lookback::new(1, LookbackUnit::Month)));
        assert_eq!("2 week".parse::<Lookback>(), Ok(Lookback::new(2, LookbackUnit::Week)));
        assert_eq!("10days".parse::<Lookback>(), Ok(Lookback::new(10, LookbackUnit::Day)));
        assert_eq!(" 1 Year ".parse::<Lookback>(), Ok(Lookback::new(1, LookbackUnit::Year)));
        assert!("months".parse::<Lookback>().is_err());
        assert!("3".parse::<Lookback>().is_err());
        assert!("3 fortnights".parse::<Lookback>().is_err());
        assert!("1 month; drop table logs".parse::<Lookback>().is_err());
    }

    #[test]
    fn test_lookback_before() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            Lookback::new(1, LookbackUnit::Month).before(now),
            Ok(Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap())
        );
        assert_eq!(
            Lookback::new(2, LookbackUnit::Week).before(now),
            Ok(Utc.with_ymd_and_hms(2025, 3, 17, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_lookback_parse_rejects_oversized_spans() {
        assert!("4294967295 days".parse::<Lookback>().is_err());
        assert!("999999 years".parse::<Lookback>().is_err());
        assert!("101 years".parse::<Lookback>().is_err());
        assert_eq!(
            "100 years".parse::<Lookback>(),
            Ok(Lookback::new(100, LookbackUnit::Year))
        );
    }

    #[test]
    fn test_lookback_before_rejects_oversized_spans() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        for lookback in [
            Lookback::new(u32::MAX, LookbackUnit::Day),
            Lookback::new(u32::MAX, LookbackUnit::Week),
            Lookback::new(999_999, LookbackUnit::Year),
        ] {
            assert!(matches!(
                lookback.before(now),
                Err(CoreError::InvalidLookback(_))
            ));
        }
    }

    #[test]
    fn test_truncate_and_step_saturate_at_calendar_edges() {
        let earliest = DateTime::<Utc>::MIN_UTC;
        assert!(CompletionView::Week.truncate(earliest) <= earliest);
        assert_eq!(
            CompletionView::Week.step(DateTime::<Utc>::MAX_UTC),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn test_lookback_display() {
        assert_eq!(Lookback::default().to_string(), "1 month");
        assert_eq!(Lookback::new(3, LookbackUnit::Week).to_string(), "3 weeks");
    }
}

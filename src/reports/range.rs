//! Date ranges for filtering and aggregation
//!
//! Relative ranges are resolved against a caller-supplied `now`; the calendar
//! day of a transaction is taken in `now`'s time zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

use crate::error::LedgerError;

/// An aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// Seven days starting on the most recent week-start day
    ThisWeek,
    ThisMonth,
    ThisYear,
    /// Inclusive by calendar day; `start > end` matches nothing
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Whether `date` falls in this range as seen from `now`
    pub fn contains<Tz: TimeZone>(
        &self,
        date: &DateTime<Utc>,
        now: &DateTime<Tz>,
        week_start: Weekday,
    ) -> bool {
        let day = date.with_timezone(&now.timezone()).date_naive();
        let today = now.date_naive();

        match self {
            Self::All => true,
            Self::Today => day == today,
            Self::ThisWeek => {
                let (start, end) = week_bounds(today, week_start);
                start <= day && day <= end
            }
            Self::ThisMonth => day.year() == today.year() && day.month() == today.month(),
            Self::ThisYear => day.year() == today.year(),
            Self::Custom { start, end } => *start <= day && day <= *end,
        }
    }

    /// First and last calendar day of the range, `None` for [`DateRange::All`]
    pub fn bounds<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        week_start: Weekday,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let today = now.date_naive();

        match self {
            Self::All => None,
            Self::Today => Some((today, today)),
            Self::ThisWeek => Some(week_bounds(today, week_start)),
            Self::ThisMonth => {
                let start = today.with_day(1)?;
                let next = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
                };
                Some((start, next.pred_opt()?))
            }
            Self::ThisYear => Some((
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
            )),
            Self::Custom { start, end } => Some((*start, *end)),
        }
    }

    /// Build a custom range from optional CLI bounds
    ///
    /// A missing `start` or `end` is open on that side.
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::Custom {
            start: start.unwrap_or(NaiveDate::MIN),
            end: end.unwrap_or(NaiveDate::MAX),
        }
    }
}

fn week_bounds(today: NaiveDate, week_start: Weekday) -> (NaiveDate, NaiveDate) {
    let offset = (today.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    let start = today - Duration::days(i64::from(offset));
    (start, start + Duration::days(6))
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all time"),
            Self::Today => write!(f, "today"),
            Self::ThisWeek => write!(f, "this week"),
            Self::ThisMonth => write!(f, "this month"),
            Self::ThisYear => write!(f, "this year"),
            Self::Custom { start, end } => match (*start == NaiveDate::MIN, *end == NaiveDate::MAX) {
                (true, true) => write!(f, "all time"),
                (true, false) => write!(f, "through {}", end),
                (false, true) => write!(f, "since {}", start),
                (false, false) => write!(f, "{} to {}", start, end),
            },
        }
    }
}

impl FromStr for DateRange {
    type Err = LedgerError;

    /// Parse `all`, `today`, `week`, `month`, `year`, or `YYYY-MM-DD..YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::ThisWeek),
            "month" => Ok(Self::ThisMonth),
            "year" => Ok(Self::ThisYear),
            other => {
                let (start, end) = other.split_once("..").ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "Unknown range '{}'. Use all, today, week, month, year, or START..END",
                        s
                    ))
                })?;
                Ok(Self::Custom {
                    start: parse_day(start)?,
                    end: parse_day(end)?,
                })
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_day(s: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    // Wednesday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_today() {
        let range = DateRange::Today;
        assert!(range.contains(&at(2025, 1, 15, 0), &now(), Weekday::Mon));
        assert!(range.contains(&at(2025, 1, 15, 23), &now(), Weekday::Mon));
        assert!(!range.contains(&at(2025, 1, 14, 23), &now(), Weekday::Mon));
        assert!(!range.contains(&at(2025, 1, 16, 0), &now(), Weekday::Mon));
    }

    #[test]
    fn test_week_depends_on_week_start() {
        let range = DateRange::ThisWeek;
        let sunday = at(2025, 1, 12, 12);
        let monday = at(2025, 1, 13, 12);

        assert!(!range.contains(&sunday, &now(), Weekday::Mon));
        assert!(range.contains(&monday, &now(), Weekday::Mon));
        assert!(range.contains(&sunday, &now(), Weekday::Sun));
        assert!(range.contains(&at(2025, 1, 18, 12), &now(), Weekday::Sun));
        assert!(!range.contains(&at(2025, 1, 19, 12), &now(), Weekday::Sun));
    }

    #[test]
    fn test_week_bounds_when_today_is_week_start() {
        let monday = Utc.with_ymd_and_hms(2025, 1, 13, 8, 0, 0).unwrap();
        let (start, end) = DateRange::ThisWeek.bounds(&monday, Weekday::Mon).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 19).unwrap());
    }

    #[test]
    fn test_month_and_year() {
        assert!(DateRange::ThisMonth.contains(&at(2025, 1, 1, 0), &now(), Weekday::Mon));
        assert!(!DateRange::ThisMonth.contains(&at(2024, 12, 31, 23), &now(), Weekday::Mon));
        assert!(DateRange::ThisYear.contains(&at(2025, 12, 31, 23), &now(), Weekday::Mon));
        assert!(!DateRange::ThisYear.contains(&at(2024, 1, 15, 10), &now(), Weekday::Mon));

        let december = Utc.with_ymd_and_hms(2024, 12, 5, 0, 0, 0).unwrap();
        let (_, end) = DateRange::ThisMonth.bounds(&december, Weekday::Mon).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_custom_is_inclusive_by_day() {
        let range = DateRange::Custom {
            start: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
        };
        let late = Utc.with_ymd_and_hms(2025, 1, 12, 23, 59, 59).unwrap();

        assert!(range.contains(&at(2025, 1, 10, 0), &now(), Weekday::Mon));
        assert!(range.contains(&late, &now(), Weekday::Mon));
        assert!(!range.contains(&at(2025, 1, 13, 0), &now(), Weekday::Mon));
    }

    #[test]
    fn test_inverted_custom_range_matches_nothing() {
        let range = DateRange::Custom {
            start: NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        };
        assert!(!range.contains(&at(2025, 1, 11, 12), &now(), Weekday::Mon));
    }

    #[test]
    fn test_day_is_taken_in_now_time_zone() {
        // 2025-01-15 02:00 UTC is still the 14th in UTC-5
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let local_now = tz.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        let utc_now = local_now.with_timezone(&Utc);
        let date = at(2025, 1, 15, 2);

        assert!(DateRange::Today.contains(&date, &utc_now, Weekday::Mon));
        assert!(!DateRange::Today.contains(&date, &local_now, Weekday::Mon));
    }

    #[test]
    fn test_parse() {
        assert_eq!("week".parse::<DateRange>().unwrap(), DateRange::ThisWeek);
        assert_eq!("ALL".parse::<DateRange>().unwrap(), DateRange::All);
        assert_eq!(
            "2025-01-01..2025-01-31".parse::<DateRange>().unwrap(),
            DateRange::Custom {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            }
        );
        assert!("fortnight".parse::<DateRange>().unwrap_err().is_validation());
        assert!("2025-01-01..soon".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day(" 2025-02-28 ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(parse_day("2025-02-30").unwrap_err().is_validation());
    }
}

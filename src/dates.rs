//! Calendar helpers. Every calendar day in WalkMate is a UTC day, on both
//! the write path (walk dates) and the read path (streaks, reports, stats).

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeDelta, Utc};

/// A span of instants. `end_inclusive` selects between `[start, end]` and
/// `[start, end)`; the weekly report uses the former, ad-hoc ranges the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub end_inclusive: bool,
}

impl DateRange {
    pub fn inclusive(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            end_inclusive: true,
        }
    }

    pub fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            end_inclusive: false,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if instant < self.start {
            return false;
        }
        if self.end_inclusive {
            instant <= self.end
        } else {
            instant < self.end
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
}

/// Sunday 00:00:00.000 through Saturday 23:59:59.999 of the week holding
/// `anchor`. `None` when the week leaves chrono's supported range.
pub fn week_bounds(anchor: DateTime<Utc>) -> Option<DateRange> {
    let start = start_of_day(week_start(anchor.date_naive())?);
    let end = start
        .checked_add_signed(Duration::days(7))?
        .checked_sub_signed(TimeDelta::milliseconds(1))?;
    Some(DateRange::inclusive(start, end))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = first_of_month(date);
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First of month 00:00 up to (excluding) the first of the next month.
pub fn month_bounds(date: NaiveDate) -> Option<DateRange> {
    Some(DateRange::half_open(
        start_of_day(first_of_month(date)),
        start_of_day(first_of_next_month(date)?),
    ))
}

pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    parse_day(value).map(start_of_day)
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.trim().split_once('-')?;
    if month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_is_sunday() {
        // 2026-01-07 is a Wednesday.
        assert_eq!(week_start(day(2026, 1, 7)), Some(day(2026, 1, 4)));
        assert_eq!(week_start(day(2026, 1, 4)), Some(day(2026, 1, 4)));
        assert_eq!(week_start(day(2026, 1, 10)), Some(day(2026, 1, 4)));
        assert_eq!(week_start(day(2026, 1, 3)), Some(day(2025, 12, 28)));
    }

    #[test]
    fn week_bounds_cover_sunday_to_saturday() {
        let anchor = day(2026, 1, 7).and_hms_opt(15, 30, 0).unwrap().and_utc();
        let range = week_bounds(anchor).unwrap();
        assert_eq!(range.start, start_of_day(day(2026, 1, 4)));
        assert_eq!(
            range.end,
            day(2026, 1, 10).and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc()
        );
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(range.end + TimeDelta::milliseconds(1)));
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let range = month_bounds(day(2025, 12, 15)).unwrap();
        assert_eq!(range.start, start_of_day(day(2025, 12, 1)));
        assert_eq!(range.end, start_of_day(day(2026, 1, 1)));
        assert!(!range.contains(range.end));
    }

    #[test]
    fn bounds_at_the_end_of_time_are_none() {
        let last_month = parse_month(&format!("{}-12", NaiveDate::MAX.year())).unwrap();
        assert_eq!(first_of_next_month(last_month), None);
        assert_eq!(month_bounds(last_month), None);

        let last_day = start_of_day(NaiveDate::MAX);
        assert_eq!(week_bounds(last_day), None);
    }

    #[test]
    fn parse_timestamp_accepts_dates_and_rfc3339() {
        assert_eq!(
            parse_timestamp("2026-01-07"),
            Some(start_of_day(day(2026, 1, 7)))
        );
        assert_eq!(
            parse_timestamp("2026-01-07T02:00:00+03:00"),
            Some(day(2026, 1, 6).and_hms_opt(23, 0, 0).unwrap().and_utc())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2026-13-01"), None);
    }

    #[test]
    fn parse_month_requires_two_digit_month() {
        assert_eq!(parse_month("2026-02"), Some(day(2026, 2, 1)));
        assert_eq!(parse_month("2026-2"), None);
        assert_eq!(parse_month("2026-13"), None);
        assert_eq!(parse_month("feb"), None);
    }
}

use chrono::{DateTime, Duration, Utc};

use crate::dates::{date_key, month_bounds, parse_day, start_of_day, week_bounds, DateRange};
use crate::errors::{AppError, FieldError};
use crate::models::{StatsQuery, StatsResponse, Walk};

/// The resolved window of a stats request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub period: StatsPeriod,
    pub range: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    Week,
    Month,
    Custom,
    Trailing,
}

impl StatsPeriod {
    fn label(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Custom => "custom",
            Self::Trailing => "last7days",
        }
    }
}

/// `week` is inclusive on both ends, `month` and explicit ranges are
/// half-open, and the fallback is the trailing seven days ending at `now`.
pub fn resolve_window(query: &StatsQuery, now: DateTime<Utc>) -> Result<StatsWindow, AppError> {
    match query.period.as_deref().map(str::trim) {
        Some("week") => {
            return Ok(StatsWindow {
                period: StatsPeriod::Week,
                range: week_bounds(now).ok_or_else(|| out_of_range(now))?,
            });
        }
        Some("month") => {
            return Ok(StatsWindow {
                period: StatsPeriod::Month,
                range: month_bounds(now.date_naive()).ok_or_else(|| out_of_range(now))?,
            });
        }
        _ => {}
    }

    if let (Some(start), Some(end)) = (&query.start_date, &query.end_date) {
        let start_day = parse_day(start).ok_or_else(|| AppError::invalid_date("startDate", start))?;
        let end_day = parse_day(end).ok_or_else(|| AppError::invalid_date("endDate", end))?;
        if start_day > end_day {
            return Err(AppError::validation(vec![FieldError::new(
                "startDate",
                "must not be after endDate",
            )]));
        }
        return Ok(StatsWindow {
            period: StatsPeriod::Custom,
            range: DateRange::half_open(start_of_day(start_day), start_of_day(end_day)),
        });
    }

    Ok(StatsWindow {
        period: StatsPeriod::Trailing,
        range: DateRange::inclusive(now - Duration::days(7), now),
    })
}

fn out_of_range(now: DateTime<Utc>) -> AppError {
    AppError::invalid_date("date", &now.to_rfc3339())
}

pub fn build_stats(walks: &[Walk], window: &StatsWindow) -> StatsResponse {
    let in_range: Vec<&Walk> = walks
        .iter()
        .filter(|walk| window.range.contains(walk.date))
        .collect();

    let walk_count = in_range.len();
    let total_steps = in_range
        .iter()
        .fold(0u64, |sum, walk| sum.saturating_add(walk.steps));
    let total_distance: f64 = in_range.iter().map(|walk| walk.distance).sum();
    let total_duration = in_range
        .iter()
        .fold(0u64, |sum, walk| sum.saturating_add(walk.duration));

    let mean = |total: f64| {
        if walk_count == 0 {
            0.0
        } else {
            total / walk_count as f64
        }
    };

    StatsResponse {
        period: window.period.label().to_string(),
        start_date: date_key(window.range.start.date_naive()),
        end_date: date_key(window.range.end.date_naive()),
        walk_count,
        total_steps,
        total_distance,
        total_duration,
        average_steps: mean(total_steps as f64),
        average_distance: mean(total_distance),
        average_duration: mean(total_duration as f64),
    }
}

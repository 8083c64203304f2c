//! Per-day bucketing: the weekly report, today's summary and the monthly
//! goal calendar all accumulate walks into `DayBucket`s.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::warn;

use crate::dates::{date_key, first_of_month, first_of_next_month, week_bounds};
use crate::models::{
    DailySummary, DayBucket, Goal, GoalCalendar, GoalType, Walk, WeeklyReport, WeeklyTotals,
};

impl DayBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date: date_key(date),
            steps: 0,
            distance: 0.0,
            duration: 0,
            goal_met: false,
        }
    }

    fn add(&mut self, walk: &Walk) {
        self.steps = self.steps.saturating_add(walk.steps);
        self.distance += walk.distance;
        self.duration = self.duration.saturating_add(walk.duration);
    }

    fn evaluate(&mut self, goal: Goal) {
        self.goal_met = goal.value <= self.metric(goal.goal_type);
    }

    fn metric(&self, goal_type: GoalType) -> f64 {
        match goal_type {
            GoalType::Steps => self.steps as f64,
            GoalType::Distance => self.distance,
        }
    }

    pub fn is_active(&self) -> bool {
        self.steps > 0 || self.distance > 0.0 || self.duration > 0
    }
}

/// `None` when the week holding `anchor` runs past the supported calendar.
pub fn build_weekly_report(
    walks: &[Walk],
    goal: Goal,
    anchor: DateTime<Utc>,
) -> Option<WeeklyReport> {
    let window = week_bounds(anchor)?;
    let first_day = window.start.date_naive();
    let mut daily_data: [DayBucket; 7] =
        std::array::from_fn(|offset| DayBucket::empty(first_day + Duration::days(offset as i64)));

    let mut unmatched_walks = 0;
    for walk in walks.iter().filter(|walk| window.contains(walk.date)) {
        let offset = (walk.date.date_naive() - first_day).num_days();
        match usize::try_from(offset)
            .ok()
            .and_then(|index| daily_data.get_mut(index))
        {
            Some(bucket) => bucket.add(walk),
            None => unmatched_walks += 1,
        }
    }
    if unmatched_walks > 0 {
        warn!(
            week_start = %date_key(first_day),
            unmatched_walks,
            "walks inside the week window did not match a day bucket"
        );
    }

    for bucket in &mut daily_data {
        bucket.evaluate(goal);
    }

    let weekly_totals = WeeklyTotals {
        total_steps: daily_data
            .iter()
            .fold(0u64, |sum, day| sum.saturating_add(day.steps)),
        total_distance: daily_data.iter().map(|day| day.distance).sum(),
        total_duration: daily_data
            .iter()
            .fold(0u64, |sum, day| sum.saturating_add(day.duration)),
        days_active: daily_data.iter().filter(|day| day.is_active()).count() as u8,
        days_goal_met: daily_data.iter().filter(|day| day.goal_met).count() as u8,
    };

    Some(WeeklyReport {
        start_date: date_key(first_day),
        end_date: date_key(window.end.date_naive()),
        daily_data,
        weekly_totals,
        unmatched_walks,
    })
}

pub fn build_daily_summary(walks: &[Walk], goal: Goal, now: DateTime<Utc>) -> DailySummary {
    let today = now.date_naive();
    let mut day = DayBucket::empty(today);
    let mut walk_count = 0;
    for walk in walks.iter().filter(|walk| walk.date.date_naive() == today) {
        day.add(walk);
        walk_count += 1;
    }
    day.evaluate(goal);

    let progress = (day.metric(goal.goal_type) / goal.value).min(1.0);
    DailySummary {
        day,
        walk_count,
        goal_type: goal.goal_type,
        goal_value: goal.value,
        progress,
    }
}

/// One bucket per day of the month that holds `month`; `None` for the last
/// month chrono can represent.
pub fn build_goal_calendar(walks: &[Walk], goal: Goal, month: NaiveDate) -> Option<GoalCalendar> {
    let first = first_of_month(month);
    let next = first_of_next_month(month)?;
    let mut days: Vec<DayBucket> = first
        .iter_days()
        .take_while(|day| *day < next)
        .map(DayBucket::empty)
        .collect();

    for walk in walks {
        let offset = (walk.date.date_naive() - first).num_days();
        if let Some(bucket) = usize::try_from(offset)
            .ok()
            .and_then(|index| days.get_mut(index))
        {
            bucket.add(walk);
        }
    }
    for bucket in &mut days {
        bucket.evaluate(goal);
    }

    Some(GoalCalendar {
        month: first.format("%Y-%m").to_string(),
        days_active: days.iter().filter(|day| day.is_active()).count() as u32,
        days_goal_met: days.iter().filter(|day| day.goal_met).count() as u32,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use uuid::Uuid;

    const STEPS_GOAL: Goal = Goal {
        goal_type: GoalType::Steps,
        value: 10_000.0,
    };

    // Wednesday; the week runs Sunday 2026-01-04 to Saturday 2026-01-10.
    fn anchor() -> DateTime<Utc> {
        at(2026, 1, 7, 15)
    }

    fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn walk(date: DateTime<Utc>, steps: u64, distance: f64) -> Walk {
        Walk {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            steps,
            distance,
            duration: 30,
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn report_always_has_seven_days_in_order() {
        let report = build_weekly_report(&[], STEPS_GOAL, anchor()).unwrap();
        assert_eq!(report.start_date, "2026-01-04");
        assert_eq!(report.end_date, "2026-01-10");
        let dates: Vec<&str> = report.daily_data.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            [
                "2026-01-04",
                "2026-01-05",
                "2026-01-06",
                "2026-01-07",
                "2026-01-08",
                "2026-01-09",
                "2026-01-10"
            ]
        );
        assert_eq!(report.weekly_totals.days_active, 0);
        assert_eq!(report.unmatched_walks, 0);
    }

    #[test]
    fn weekday_walks_below_goal() {
        let walks = [
            walk(at(2026, 1, 5, 8), 5_000, 4_000.0),
            walk(at(2026, 1, 6, 8), 5_000, 4_000.0),
            walk(at(2026, 1, 7, 8), 5_000, 4_000.0),
        ];
        let report = build_weekly_report(&walks, STEPS_GOAL, anchor()).unwrap();
        assert_eq!(report.weekly_totals.days_goal_met, 0);
        assert_eq!(report.weekly_totals.total_steps, 15_000);
        assert_eq!(report.weekly_totals.days_active, 3);
        assert_eq!(report.weekly_totals.total_duration, 90);
    }

    #[test]
    fn totals_match_bucket_sums() {
        let walks = [
            walk(at(2026, 1, 4, 1), 1_200, 900.0),
            walk(at(2026, 1, 4, 20), 800, 600.0),
            walk(at(2026, 1, 8, 12), 7_000, 5_100.0),
            walk(at(2026, 1, 10, 23), 2_500, 1_800.0),
        ];
        let report = build_weekly_report(&walks, STEPS_GOAL, anchor()).unwrap();
        let bucket_steps: u64 = report.daily_data.iter().map(|d| d.steps).sum();
        assert_eq!(report.weekly_totals.total_steps, bucket_steps);
        assert_eq!(report.weekly_totals.total_steps, 11_500);
        assert_eq!(report.weekly_totals.days_active, 3);
        assert_eq!(report.daily_data[0].steps, 2_000);
        assert_eq!(report.daily_data[0].distance, 1_500.0);
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let walks = [
            walk(at(2026, 1, 5, 8), u64::MAX, 0.0),
            walk(at(2026, 1, 6, 8), u64::MAX, 0.0),
            walk(at(2026, 1, 6, 9), 1, 0.0),
        ];
        let report = build_weekly_report(&walks, STEPS_GOAL, anchor()).unwrap();
        assert_eq!(report.daily_data[1].steps, u64::MAX);
        assert_eq!(report.daily_data[2].steps, u64::MAX);
        assert_eq!(report.weekly_totals.total_steps, u64::MAX);
        assert_eq!(report.weekly_totals.days_goal_met, 2);
    }

    #[test]
    fn goal_is_met_at_exact_threshold() {
        let walks = [
            walk(at(2026, 1, 5, 8), 10_000, 0.0),
            walk(at(2026, 1, 6, 8), 9_999, 0.0),
        ];
        let report = build_weekly_report(&walks, STEPS_GOAL, anchor()).unwrap();
        assert!(report.daily_data[1].goal_met);
        assert!(!report.daily_data[2].goal_met);
        assert_eq!(report.weekly_totals.days_goal_met, 1);
    }

    #[test]
    fn distance_goal_uses_distance() {
        let goal = Goal {
            goal_type: GoalType::Distance,
            value: 5_000.0,
        };
        let walks = [
            walk(at(2026, 1, 5, 8), 100, 5_000.0),
            walk(at(2026, 1, 6, 8), 50_000, 4_999.5),
        ];
        let report = build_weekly_report(&walks, goal, anchor()).unwrap();
        assert!(report.daily_data[1].goal_met);
        assert!(!report.daily_data[2].goal_met);
    }

    #[test]
    fn week_window_edges_are_exact() {
        let start = at(2026, 1, 4, 0);
        let end = at(2026, 1, 11, 0) - TimeDelta::milliseconds(1);
        let one_ms = TimeDelta::milliseconds(1);
        let walks = [
            walk(start, 1, 0.0),
            walk(start - one_ms, 10, 0.0),
            walk(end, 100, 0.0),
            walk(end + one_ms, 1_000, 0.0),
        ];
        let report = build_weekly_report(&walks, STEPS_GOAL, anchor()).unwrap();
        assert_eq!(report.weekly_totals.total_steps, 101);
        assert_eq!(report.daily_data[0].steps, 1);
        assert_eq!(report.daily_data[6].steps, 100);
        assert_eq!(report.unmatched_walks, 0);
    }

    #[test]
    fn last_supported_week_and_month_are_none() {
        let last_day = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap().and_utc();
        assert!(build_weekly_report(&[], STEPS_GOAL, last_day).is_none());
        assert!(build_goal_calendar(&[], STEPS_GOAL, NaiveDate::MAX).is_none());
    }

    #[test]
    fn daily_summary_tracks_progress() {
        let walks = [
            walk(at(2026, 1, 7, 7), 3_000, 2_000.0),
            walk(at(2026, 1, 7, 18), 2_000, 1_500.0),
            walk(at(2026, 1, 6, 18), 9_000, 6_000.0),
        ];
        let summary = build_daily_summary(&walks, STEPS_GOAL, anchor());
        assert_eq!(summary.day.date, "2026-01-07");
        assert_eq!(summary.day.steps, 5_000);
        assert_eq!(summary.walk_count, 2);
        assert!(!summary.day.goal_met);
        assert_eq!(summary.progress, 0.5);

        let over = [walk(at(2026, 1, 7, 7), 25_000, 0.0)];
        let summary = build_daily_summary(&over, STEPS_GOAL, anchor());
        assert!(summary.day.goal_met);
        assert_eq!(summary.progress, 1.0);
    }

    #[test]
    fn calendar_covers_whole_month() {
        let walks = [
            walk(at(2026, 2, 1, 9), 12_000, 0.0),
            walk(at(2026, 2, 28, 9), 4_000, 0.0),
            walk(at(2026, 3, 1, 9), 20_000, 0.0),
            walk(at(2026, 1, 31, 9), 20_000, 0.0),
        ];
        let calendar = build_goal_calendar(&walks, STEPS_GOAL, at(2026, 2, 14, 0).date_naive()).unwrap();
        assert_eq!(calendar.month, "2026-02");
        assert_eq!(calendar.days.len(), 28);
        assert_eq!(calendar.days[0].date, "2026-02-01");
        assert_eq!(calendar.days[27].date, "2026-02-28");
        assert_eq!(calendar.days_active, 2);
        assert_eq!(calendar.days_goal_met, 1);
        assert!(calendar.days[0].goal_met);
    }
}

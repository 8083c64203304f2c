use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;

use crate::models::Walk;

/// Number of consecutive UTC days, ending today or yesterday relative to
/// `as_of`, that have at least one walk. Walks dated after `as_of`'s day are
/// not counted.
pub fn compute_streak(walks: &[Walk], as_of: DateTime<Utc>) -> u32 {
    let today = as_of.date_naive();
    let days: BTreeSet<NaiveDate> = walks
        .iter()
        .map(|walk| walk.date.date_naive())
        .filter(|day| *day <= today)
        .collect();

    let mut recent_first = days.iter().rev();
    let Some(&most_recent) = recent_first.next() else {
        return 0;
    };
    if today - most_recent > Duration::days(1) {
        return 0;
    }

    let mut streak = 1;
    let mut previous = most_recent;
    for &day in recent_first {
        if previous - day != Duration::days(1) {
            break;
        }
        streak += 1;
        previous = day;
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 1, 7)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn walk_days_ago(days: i64, hour: u32) -> Walk {
        let day = now().date_naive() - Duration::days(days);
        let date = day.and_hms_opt(hour, 0, 0).unwrap().and_utc();
        Walk {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            steps: 3_000,
            distance: 2_000.0,
            duration: 30,
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(compute_streak(&[], now()), 0);
    }

    #[test]
    fn same_day_walks_count_once() {
        let walks = [walk_days_ago(0, 7), walk_days_ago(0, 19)];
        assert_eq!(compute_streak(&walks, now()), 1);
    }

    #[test]
    fn yesterday_keeps_streak_alive() {
        assert_eq!(compute_streak(&[walk_days_ago(1, 10)], now()), 1);
        assert_eq!(compute_streak(&[walk_days_ago(2, 10)], now()), 0);
    }

    #[test]
    fn consecutive_chain_counts_each_day() {
        let walks = [walk_days_ago(2, 9), walk_days_ago(0, 9), walk_days_ago(1, 9)];
        assert_eq!(compute_streak(&walks, now()), 3);
    }

    #[test]
    fn gap_stops_the_count() {
        let walks = [walk_days_ago(0, 9), walk_days_ago(2, 9), walk_days_ago(3, 9)];
        assert_eq!(compute_streak(&walks, now()), 1);
    }

    #[test]
    fn today_and_yesterday_make_two() {
        let walks = [walk_days_ago(0, 6), walk_days_ago(1, 22)];
        assert_eq!(compute_streak(&walks, now()), 2);
    }

    #[test]
    fn three_days_stale_resets() {
        assert_eq!(compute_streak(&[walk_days_ago(3, 12)], now()), 0);
    }

    #[test]
    fn streak_ending_yesterday_counts_back() {
        let walks = [walk_days_ago(1, 9), walk_days_ago(2, 9), walk_days_ago(3, 9)];
        assert_eq!(compute_streak(&walks, now()), 3);
    }

    #[test]
    fn future_walks_are_ignored() {
        let walks = [walk_days_ago(-1, 9), walk_days_ago(0, 9)];
        assert_eq!(compute_streak(&walks, now()), 1);
        assert_eq!(compute_streak(&[walk_days_ago(-2, 9)], now()), 0);
    }

    #[test]
    fn late_evening_walks_fall_on_their_utc_day() {
        let mut late = walk_days_ago(1, 0);
        late.date = (now().date_naive() - Duration::days(1))
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
            .and_utc();
        let walks = [late, walk_days_ago(0, 0)];
        assert_eq!(compute_streak(&walks, now()), 2);
    }
}

//! Daily streak tracking over calendar days.
//!
//! All comparisons are on `NaiveDate` in whatever timezone the caller uses
//! consistently (the app passes local dates), so midnight boundaries cannot
//! double-count or skip a day.

use chrono::NaiveDate;

pub const STREAK_CAP_DAYS: u32 = 365;

/// Compute the new streak after activity on `today`.
///
/// Same-day repeats leave the streak unchanged (never below 1), a gap of
/// exactly one day extends it, anything else resets to 1. A last-activity
/// date in the future (clock skew) also resets.
pub fn update_streak(last_activity: Option<NaiveDate>, today: NaiveDate, current: u32) -> u32 {
    match last_activity {
        None => 1,
        Some(last) => {
            let diff = (today - last).num_days();
            match diff {
                0 => current.max(1),
                1 => (current + 1).min(STREAK_CAP_DAYS),
                _ => 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        assert_eq!(update_streak(None, date(2026, 3, 1), 0), 1);
    }

    #[test]
    fn test_consecutive_day_increments() {
        assert_eq!(update_streak(Some(date(2026, 3, 1)), date(2026, 3, 2), 4), 5);
    }

    #[test]
    fn test_same_day_unchanged() {
        let today = date(2026, 3, 1);
        assert_eq!(update_streak(Some(today), today, 7), 7);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let today = date(2026, 3, 2);
        let once = update_streak(Some(date(2026, 3, 1)), today, 4);
        let twice = update_streak(Some(today), today, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_same_day_never_below_one() {
        let today = date(2026, 3, 1);
        assert_eq!(update_streak(Some(today), today, 0), 1);
    }

    #[test]
    fn test_two_day_gap_resets() {
        assert_eq!(update_streak(Some(date(2026, 3, 1)), date(2026, 3, 3), 50), 1);
    }

    #[test]
    fn test_long_gap_resets() {
        assert_eq!(update_streak(Some(date(2025, 1, 1)), date(2026, 3, 1), 300), 1);
    }

    #[test]
    fn test_future_last_activity_resets() {
        assert_eq!(update_streak(Some(date(2026, 3, 5)), date(2026, 3, 1), 10), 1);
    }

    #[test]
    fn test_month_boundary_increments() {
        assert_eq!(update_streak(Some(date(2026, 2, 28)), date(2026, 3, 1), 2), 3);
    }

    #[test]
    fn test_cap_at_365() {
        assert_eq!(
            update_streak(Some(date(2026, 3, 1)), date(2026, 3, 2), STREAK_CAP_DAYS),
            STREAK_CAP_DAYS
        );
    }
}

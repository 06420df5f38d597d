use chrono::NaiveDate;

use crate::models::{DailyTotals, LoggedEntry};

/// Sum calories and macros over a day's entries.
///
/// Totals are kept at full precision; rounding is a display concern.
/// Order of entries does not affect the result beyond float addition
/// ordering, which is stable for the magnitudes involved here.
#[must_use]
pub fn aggregate(entries: &[LoggedEntry]) -> DailyTotals {
    let mut totals = DailyTotals::default();
    for entry in entries {
        totals.calories += entry.food.calories as f64;
        totals.protein += entry.food.macros.protein;
        totals.carbs += entry.food.macros.carbs;
        totals.fat += entry.food.macros.fat;
    }
    totals
}

/// Calorie progress toward `goal`, as a percentage capped at 100.
#[must_use]
pub fn goal_percentage(calories: f64, goal: i64) -> f64 {
    if goal <= 0 {
        return 0.0;
    }
    (calories / goal as f64 * 100.0).min(100.0)
}

/// Whether consumed calories exceed the goal. Stays `false` at exactly
/// the goal, even while the progress bar reads 100%.
#[must_use]
pub fn is_over_goal(calories: f64, goal: i64) -> bool {
    calories > goal as f64
}

/// Whether a day log opened on `last` must be cleared before use today.
///
/// `None` means the log has never been used, which also counts as stale
/// so the first touch of a fresh log stamps the date.
#[must_use]
pub fn should_reset(last: Option<NaiveDate>, today: NaiveDate) -> bool {
    last != Some(today)
}

use anyhow::Result;

use stride_core::db::Database;
use stride_core::models::{DEFAULT_CALORIE_GOAL, validate_goal};

const GOAL_KEY: &str = "calorie_goal";

/// The persisted calorie goal, or the default when none is set or the
/// stored value is unreadable.
pub(crate) fn stored_goal(db: &Database) -> Result<i64> {
    let goal = db
        .get_setting(GOAL_KEY)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CALORIE_GOAL);
    Ok(goal)
}

pub(crate) fn cmd_goal_set(db: &Database, calories: i64, json: bool) -> Result<()> {
    validate_goal(calories)?;
    db.set_setting(GOAL_KEY, &calories.to_string())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "goal": calories }))?
        );
    } else {
        println!("Calorie goal set to {calories} kcal/day");
    }

    Ok(())
}

pub(crate) fn cmd_goal_show(db: &Database, json: bool) -> Result<()> {
    let goal = stored_goal(db)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "goal": goal }))?
        );
    } else {
        println!("Calorie goal: {goal} kcal/day");
    }

    Ok(())
}

use anyhow::Result;
use std::process;

use stride_core::db::Database;
use stride_core::models::{DailyGoals, LogCategory};
use stride_core::summary::{goal_percentage, is_over_goal};

use super::goal::stored_goal;
use super::helpers::parse_date;

/// Daily overview: water, steps, calorie totals and macro breakdown,
/// with progress against the stored calorie goal.
pub(crate) fn cmd_summary(db: &Database, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?.format("%Y-%m-%d").to_string();
    let user_id = db.ensure_default_user()?;

    let water = db.daily_logs(LogCategory::Water, user_id, &date)?;
    let steps = db.daily_logs(LogCategory::Steps, user_id, &date)?;
    let totals = db.calorie_day_totals(user_id, &date)?;
    let goal = stored_goal(db)?;
    let goals = DailyGoals {
        calories: goal,
        ..DailyGoals::default()
    };
    let progress = goal_percentage(totals.calories, goal);
    let over = is_over_goal(totals.calories, goal);

    if json {
        let payload = serde_json::json!({
            "date": date,
            "water": water.total,
            "steps": steps.total,
            "totals": totals,
            "goal": goal,
            "progressPercentage": progress,
            "isOverGoal": over,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if water.logs.is_empty() && steps.logs.is_empty() && totals.calories == 0.0 {
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    println!("=== {date} ===\n");
    let water_total = water.total;
    let water_goal = goals.water;
    println!("  WATER: {water_total:.0} / {water_goal} ml");
    let steps_total = steps.total;
    let steps_goal = goals.steps;
    println!("  STEPS: {steps_total:.0} / {steps_goal}");
    let cal = totals.calories;
    let protein = totals.protein;
    let carbs = totals.carbs;
    let fat = totals.fat;
    println!("  CALORIES: {cal:.0} / {goal} kcal ({progress:.0}%)");
    println!("  MACROS: P:{protein:.0}g C:{carbs:.0}g F:{fat:.0}g");
    if over {
        let excess = cal - goal as f64;
        println!("  Over goal by {excess:.0} kcal");
    }

    Ok(())
}

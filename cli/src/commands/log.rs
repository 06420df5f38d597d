use anyhow::{Result, bail};
use chrono::{Local, Utc};

use crate::nutrition::NutritionClient;
use stride_core::db::Database;
use stride_core::models::LogCategory;
use stride_core::search::resolve;

use super::helpers::{print_food_table, prompt_choice};

fn unit_label(category: LogCategory) -> &'static str {
    match category {
        LogCategory::Water => "ml",
        LogCategory::Steps => "steps",
        LogCategory::Calories => "kcal",
    }
}

/// Record a raw amount against a category and report the running total.
pub(crate) fn cmd_log(db: &Database, category: &str, amount: f64, json: bool) -> Result<()> {
    let Some(category) = LogCategory::parse(category) else {
        bail!("Unknown category '{category}'. Use water, steps, or calories");
    };

    let user_id = db.ensure_default_user()?;
    let row = db.insert_log(category, user_id, amount)?;

    let today = Local::now().format("%Y-%m-%d").to_string();
    let summary = db.daily_logs(category, user_id, &today)?;

    if json {
        let payload = serde_json::json!({ "logged": row, "total": summary.total });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let unit = unit_label(category);
        let total = summary.total;
        println!("Logged {amount:.0} {unit} (today: {total:.0} {unit})");
    }

    Ok(())
}

/// Search for a food and log the chosen match into the calorie log.
pub(crate) async fn cmd_eat(
    db: &Database,
    nutrition: &NutritionClient,
    food: &str,
    json: bool,
) -> Result<()> {
    let stamp_ms = Utc::now().timestamp_millis();
    let remote = nutrition.search_async(food, stamp_ms).await;
    let outcome = resolve(remote, food, stamp_ms);
    let is_mock = outcome.is_fallback();
    let records = outcome.into_records();

    if records.is_empty() {
        bail!("No food found for '{food}'");
    }

    let record = if records.len() == 1 || json {
        records.into_iter().next().unwrap()
    } else {
        if is_mock {
            eprintln!("Note: nutrition API unavailable, showing sample data");
        }
        print_food_table(&records);
        let idx = prompt_choice(records.len())?;
        records.into_iter().nth(idx).unwrap()
    };

    let user_id = db.ensure_default_user()?;
    db.insert_calorie_entry(user_id, &record)?;

    let today = Local::now().format("%Y-%m-%d").to_string();
    let totals = db.calorie_day_totals(user_id, &today)?;

    if json {
        let payload = serde_json::json!({ "logged": record, "totals": totals });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let name = &record.name;
        let serving = &record.serving_size;
        let cal = record.calories;
        let total = totals.calories;
        println!("Logged {name} ({serving}, {cal} kcal). Today: {total:.0} kcal");
    }

    Ok(())
}

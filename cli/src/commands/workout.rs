use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Modify, Style, Width, object::Columns},
};

use stride_core::db::Database;
use stride_core::models::Workout;

use super::helpers::{json_error, truncate};

pub(crate) fn cmd_workout_list(
    db: &Database,
    workout_type: Option<&str>,
    json: bool,
) -> Result<()> {
    let workouts = db.list_workouts(workout_type)?;

    if workouts.is_empty() {
        if json {
            println!("{}", json_error("No workouts found"));
        } else {
            eprintln!("No workouts found. Run 'stride workouts seed' to load the starter catalog");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&workouts)?);
    } else {
        print_workout_table(&workouts);
    }

    Ok(())
}

pub(crate) fn cmd_workout_seed(db: &Database, json: bool) -> Result<()> {
    let seeded = db.seed_workouts()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "seeded": seeded }))?
        );
    } else if seeded == 0 {
        println!("Workout catalog already populated, nothing to do");
    } else {
        println!("Seeded {seeded} workouts");
    }

    Ok(())
}

fn print_workout_table(workouts: &[Workout]) {
    #[derive(Tabled)]
    struct WorkoutRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        workout_type: String,
        #[tabled(rename = "Equipment")]
        equipment: String,
        #[tabled(rename = "Muscles")]
        muscles: String,
    }

    let rows: Vec<WorkoutRow> = workouts
        .iter()
        .map(|w| WorkoutRow {
            id: w.id,
            name: truncate(&w.name, 25),
            workout_type: w.workout_type.clone(),
            equipment: w.equipment.as_deref().map(|e| truncate(e, 20)).unwrap_or_default(),
            muscles: w.muscles.as_deref().map(|m| truncate(m, 30)).unwrap_or_default(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..)).with(Width::wrap(30)))
        .to_string();
    println!("{table}");
}

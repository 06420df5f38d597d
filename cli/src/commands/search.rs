use anyhow::Result;
use chrono::Utc;
use std::process;

use crate::nutrition::NutritionClient;
use stride_core::search::resolve;

use super::helpers::{json_error, print_food_table};

pub(crate) async fn cmd_search(
    nutrition: &NutritionClient,
    query: &str,
    json: bool,
) -> Result<()> {
    let stamp_ms = Utc::now().timestamp_millis();
    let remote = nutrition.search_async(query, stamp_ms).await;
    let outcome = resolve(remote, query, stamp_ms);
    let is_mock = outcome.is_fallback();
    let records = outcome.into_records();

    if records.is_empty() {
        if json {
            println!("{}", json_error(&format!("No results found for '{query}'")));
        } else {
            eprintln!("No results found for '{query}'");
        }
        process::exit(2);
    }

    if json {
        let mut payload = serde_json::json!({ "results": records });
        if is_mock {
            payload["isMock"] = serde_json::Value::Bool(true);
        }
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        if is_mock {
            eprintln!("Note: nutrition API unavailable, showing sample data");
        }
        print_food_table(&records);
    }

    Ok(())
}

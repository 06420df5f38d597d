use serde::Deserialize;

use crate::models::{FoodRecord, Macros};

/// Response shape of the CalorieNinjas nutrition endpoint.
#[derive(Debug, Deserialize)]
pub struct NutritionResponse {
    pub items: Vec<NutritionItem>,
}

#[derive(Debug, Deserialize)]
pub struct NutritionItem {
    pub name: String,
    pub serving_size_g: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbohydrates_total_g: f64,
    pub fat_total_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
}

/// Round to one decimal place (display precision for macros).
#[must_use]
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Map one upstream item to the canonical record shape.
///
/// Serving size is formatted as `"<grams>g"`, calories rounded to the
/// nearest integer, macros to one decimal. The id is minted from the
/// caller's timestamp plus the item's position in the response.
#[must_use]
pub fn item_to_record(item: &NutritionItem, stamp_ms: i64, index: usize) -> FoodRecord {
    FoodRecord {
        id: format!("{stamp_ms}-{index}"),
        name: item.name.clone(),
        serving_size: format!("{}g", item.serving_size_g),
        calories: item.calories.round() as i64,
        macros: Macros {
            protein: round1(item.protein_g),
            carbs: round1(item.carbohydrates_total_g),
            fat: round1(item.fat_total_g),
            fiber: round1(item.fiber_g),
            sugar: round1(item.sugar_g),
        },
    }
}

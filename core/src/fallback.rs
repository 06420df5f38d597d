use crate::models::{FoodRecord, Macros};

/// One entry in the built-in sample table used when the nutrition API is
/// unreachable or unconfigured.
struct SampleFood {
    name: &'static str,
    serving_size: &'static str,
    calories: i64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    sugar: f64,
}

const SAMPLE_FOODS: &[SampleFood] = &[
    SampleFood { name: "apple", serving_size: "182g", calories: 95, protein: 0.5, carbs: 25.0, fat: 0.3, fiber: 4.4, sugar: 19.0 },
    SampleFood { name: "banana", serving_size: "118g", calories: 105, protein: 1.3, carbs: 27.0, fat: 0.4, fiber: 3.1, sugar: 14.0 },
    SampleFood { name: "chicken breast", serving_size: "100g", calories: 165, protein: 31.0, carbs: 0.0, fat: 3.6, fiber: 0.0, sugar: 0.0 },
    SampleFood { name: "rice", serving_size: "100g", calories: 130, protein: 2.7, carbs: 28.0, fat: 0.3, fiber: 0.4, sugar: 0.0 },
    SampleFood { name: "egg", serving_size: "50g", calories: 78, protein: 6.0, carbs: 0.6, fat: 5.0, fiber: 0.0, sugar: 0.6 },
    SampleFood { name: "bread", serving_size: "30g", calories: 79, protein: 2.7, carbs: 15.0, fat: 1.0, fiber: 0.6, sugar: 1.5 },
    SampleFood { name: "milk", serving_size: "244g", calories: 149, protein: 8.0, carbs: 12.0, fat: 8.0, fiber: 0.0, sugar: 12.0 },
    SampleFood { name: "salmon", serving_size: "100g", calories: 208, protein: 20.0, carbs: 0.0, fat: 13.0, fiber: 0.0, sugar: 0.0 },
    SampleFood { name: "broccoli", serving_size: "100g", calories: 34, protein: 2.8, carbs: 7.0, fat: 0.4, fiber: 2.6, sugar: 1.7 },
    SampleFood { name: "pasta", serving_size: "100g", calories: 131, protein: 5.0, carbs: 25.0, fat: 1.1, fiber: 1.8, sugar: 0.6 },
    SampleFood { name: "pizza", serving_size: "107g", calories: 285, protein: 12.0, carbs: 36.0, fat: 10.0, fiber: 2.5, sugar: 4.0 },
    SampleFood { name: "salad", serving_size: "100g", calories: 20, protein: 1.5, carbs: 3.5, fat: 0.2, fiber: 2.0, sugar: 1.3 },
    SampleFood { name: "orange", serving_size: "131g", calories: 62, protein: 1.2, carbs: 15.0, fat: 0.2, fiber: 3.1, sugar: 12.0 },
    SampleFood { name: "yogurt", serving_size: "170g", calories: 100, protein: 17.0, carbs: 6.0, fat: 0.7, fiber: 0.0, sugar: 4.0 },
    SampleFood { name: "cheese", serving_size: "28g", calories: 113, protein: 7.0, carbs: 0.4, fat: 9.0, fiber: 0.0, sugar: 0.1 },
];

fn record_from(sample: &SampleFood, stamp_ms: i64, index: usize) -> FoodRecord {
    FoodRecord {
        id: format!("{stamp_ms}-{index}"),
        name: sample.name.to_string(),
        serving_size: sample.serving_size.to_string(),
        calories: sample.calories,
        macros: Macros {
            protein: sample.protein,
            carbs: sample.carbs,
            fat: sample.fat,
            fiber: sample.fiber,
            sugar: sample.sugar,
        },
    }
}

/// Search the sample table with bidirectional case-insensitive substring
/// containment: a food matches when its name contains the query or the
/// query contains its name.
///
/// Zero matches produce a single synthetic record named after the raw
/// query with fixed placeholder nutrition, so this never returns empty.
#[must_use]
pub fn search_fallback(query: &str, stamp_ms: i64) -> Vec<FoodRecord> {
    let query_lower = query.to_lowercase();

    let matches: Vec<FoodRecord> = SAMPLE_FOODS
        .iter()
        .filter(|s| s.name.contains(&query_lower) || query_lower.contains(s.name))
        .enumerate()
        .map(|(i, s)| record_from(s, stamp_ms, i))
        .collect();

    if matches.is_empty() {
        return vec![FoodRecord {
            id: format!("{stamp_ms}-0"),
            name: query.to_string(),
            serving_size: "100g".to_string(),
            calories: 100,
            macros: Macros {
                protein: 5.0,
                carbs: 15.0,
                fat: 3.0,
                fiber: 2.0,
                sugar: 5.0,
            },
        }];
    }

    matches
}

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Macro nutrients in grams, full precision. Rounding happens at display time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
}

/// A normalized food record, immutable once produced.
///
/// `id` is `"<timestamp_ms>-<index>"`, minted at normalization time; it is
/// not stable across repeated searches for the same food.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub id: String,
    pub name: String,
    pub serving_size: String,
    pub calories: i64,
    pub macros: Macros,
}

/// A food record added to a day's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedEntry {
    #[serde(flatten)]
    pub food: FoodRecord,
    pub added_at: i64,
    pub unique_id: String,
}

/// Derived sums over a day's logged entries. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Fixed reference targets for the three activity categories.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DailyGoals {
    pub water: i64,
    pub steps: i64,
    pub calories: i64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            water: 2000,
            steps: 10000,
            calories: 2000,
        }
    }
}

pub const GOAL_MIN: i64 = 1000;
pub const GOAL_MAX: i64 = 5000;
pub const DEFAULT_CALORIE_GOAL: i64 = 2000;

/// Validate a user-settable calorie goal. Out-of-range values are rejected
/// so the caller's stored goal stays untouched.
pub fn validate_goal(calories: i64) -> Result<()> {
    if !(GOAL_MIN..=GOAL_MAX).contains(&calories) {
        bail!("Goal must be between {GOAL_MIN} and {GOAL_MAX} kcal");
    }
    Ok(())
}

/// Validate a logged amount (water ml, step count, quick-add kcal).
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Invalid amount");
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub status: String,
    pub last_active: String,
    pub streak_days: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeEvent {
    pub id: i64,
    pub friend_id: i64,
    pub message: String,
    pub at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub equipment: Option<String>,
    pub muscles: Option<String>,
    pub instructions: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub name: String,
    pub workout_type: String,
    pub equipment: Option<String>,
    pub muscles: Option<String>,
    pub instructions: String,
    pub image_url: Option<String>,
}

pub const WORKOUT_TYPES: &[&str] = &["home", "gym"];

pub fn validate_workout_type(workout_type: &str) -> Result<String> {
    let lower = workout_type.to_lowercase();
    if WORKOUT_TYPES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        bail!(
            "Invalid workout type '{workout_type}'. Must be one of: {}",
            WORKOUT_TYPES.join(", ")
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
    pub week_start_date: String,
    pub plan_data: serde_json::Value,
}

/// One persisted activity log row (water / steps / calories quick-add).
#[derive(Debug, Clone, Serialize)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub timestamp: String,
}

/// `GET /api/logs/{category}` response shape: today's rows plus their sum.
#[derive(Debug, Clone, Serialize)]
pub struct DailyLogSummary {
    pub total: f64,
    pub logs: Vec<LogRow>,
}

/// Activity log categories, one SQLite table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Water,
    Steps,
    Calories,
}

impl LogCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Steps => "steps",
            Self::Calories => "calories",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "water" => Some(Self::Water),
            "steps" => Some(Self::Steps),
            "calories" => Some(Self::Calories),
            _ => None,
        }
    }
}

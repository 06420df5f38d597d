use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::models::{
    DailyLogSummary, DailyTotals, FoodRecord, LogCategory, LogRow, NewWorkout, Schedule, Workout,
    validate_amount, validate_workout_type,
};

/// A friendship row as stored, distinct from the demo roster shape the
/// server hands out.
#[derive(Debug, Clone)]
pub struct FriendLink {
    pub id: i64,
    pub friend_id: i64,
    pub friend_name: String,
    pub status: String,
    pub created_at: String,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("failed to enable foreign keys")?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Schema migrations keyed off `PRAGMA user_version`. Each step runs
    /// at most once per database file.
    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .context("failed to read schema version")?;

        if version < 1 {
            self.conn
                .execute_batch(
                    "BEGIN;
                    CREATE TABLE users (
                        id INTEGER PRIMARY KEY,
                        uuid TEXT NOT NULL UNIQUE,
                        name TEXT NOT NULL,
                        email TEXT UNIQUE,
                        created_at TEXT NOT NULL
                    );
                    CREATE TABLE friends (
                        id INTEGER PRIMARY KEY,
                        user_id INTEGER NOT NULL REFERENCES users(id),
                        friend_id INTEGER NOT NULL REFERENCES users(id),
                        status TEXT NOT NULL DEFAULT 'pending',
                        created_at TEXT NOT NULL,
                        UNIQUE (user_id, friend_id),
                        CHECK (user_id != friend_id)
                    );
                    CREATE TABLE workouts (
                        id INTEGER PRIMARY KEY,
                        name TEXT NOT NULL,
                        type TEXT NOT NULL CHECK (type IN ('home', 'gym')),
                        equipment TEXT,
                        muscles TEXT,
                        instructions TEXT NOT NULL,
                        image_url TEXT
                    );
                    CREATE TABLE water_logs (
                        id INTEGER PRIMARY KEY,
                        user_id INTEGER NOT NULL REFERENCES users(id),
                        amount REAL NOT NULL,
                        unit TEXT NOT NULL DEFAULT 'ml',
                        logged_at TEXT NOT NULL
                    );
                    CREATE TABLE steps_logs (
                        id INTEGER PRIMARY KEY,
                        user_id INTEGER NOT NULL REFERENCES users(id),
                        steps INTEGER NOT NULL,
                        logged_at TEXT NOT NULL
                    );
                    CREATE TABLE calories_logs (
                        id INTEGER PRIMARY KEY,
                        uuid TEXT NOT NULL,
                        user_id INTEGER NOT NULL REFERENCES users(id),
                        food_name TEXT NOT NULL,
                        calories INTEGER NOT NULL,
                        protein REAL,
                        carbs REAL,
                        fat REAL,
                        fiber REAL,
                        sugar REAL,
                        serving_size TEXT,
                        logged_at TEXT NOT NULL
                    );
                    CREATE TABLE schedules (
                        id INTEGER PRIMARY KEY,
                        user_id INTEGER NOT NULL REFERENCES users(id),
                        week_start_date TEXT NOT NULL,
                        plan_data TEXT NOT NULL,
                        created_at TEXT NOT NULL,
                        UNIQUE (user_id, week_start_date)
                    );
                    CREATE TABLE settings (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL
                    );
                    CREATE INDEX idx_water_logs_user ON water_logs (user_id, logged_at);
                    CREATE INDEX idx_steps_logs_user ON steps_logs (user_id, logged_at);
                    CREATE INDEX idx_calories_logs_user ON calories_logs (user_id, logged_at);
                    COMMIT;",
                )
                .context("failed to apply schema migration 1")?;
            self.conn
                .pragma_update(None, "user_version", 1)
                .context("failed to set schema version")?;
        }

        Ok(())
    }

    // -- users ------------------------------------------------------------

    pub fn insert_user(&self, name: &str, email: Option<&str>) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO users (uuid, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    Uuid::new_v4().to_string(),
                    name,
                    email,
                    Local::now().to_rfc3339()
                ],
            )
            .with_context(|| format!("failed to insert user '{name}'"))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The single-device local user every CLI command logs against.
    /// Created on first use.
    pub fn ensure_default_user(&self) -> Result<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM users WHERE name = 'local'", [], |row| {
                row.get(0)
            })
            .optional()
            .context("failed to look up local user")?;
        match existing {
            Some(id) => Ok(id),
            None => self.insert_user("local", None),
        }
    }

    // -- friends ----------------------------------------------------------

    pub fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<i64> {
        if user_id == friend_id {
            bail!("cannot friend yourself");
        }
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM friends WHERE user_id = ?1 AND friend_id = ?2",
                params![user_id, friend_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to check existing friendship")?;
        if exists.is_some() {
            bail!("friendship already exists");
        }
        self.conn
            .execute(
                "INSERT INTO friends (user_id, friend_id, created_at) VALUES (?1, ?2, ?3)",
                params![user_id, friend_id, Local::now().to_rfc3339()],
            )
            .context("failed to insert friendship")?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_friends(&self, user_id: i64) -> Result<Vec<FriendLink>> {
        let mut stmt = self.conn.prepare(
            "SELECT f.id, f.friend_id, u.name, f.status, f.created_at
             FROM friends f JOIN users u ON u.id = f.friend_id
             WHERE f.user_id = ?1 ORDER BY f.created_at DESC",
        )?;
        let links = stmt
            .query_map(params![user_id], |row| {
                Ok(FriendLink {
                    id: row.get(0)?,
                    friend_id: row.get(1)?,
                    friend_name: row.get(2)?,
                    status: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to list friends")?;
        Ok(links)
    }

    /// Mark a pending friendship accepted. Returns whether a row changed.
    pub fn accept_friend(&self, user_id: i64, friend_id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE friends SET status = 'accepted'
                 WHERE user_id = ?1 AND friend_id = ?2 AND status = 'pending'",
                params![user_id, friend_id],
            )
            .context("failed to accept friendship")?;
        Ok(changed > 0)
    }

    // -- workouts ---------------------------------------------------------

    pub fn insert_workout(&self, workout: &NewWorkout) -> Result<i64> {
        let workout_type = validate_workout_type(&workout.workout_type)?;
        self.conn
            .execute(
                "INSERT INTO workouts (name, type, equipment, muscles, instructions, image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    workout.name,
                    workout_type,
                    workout.equipment,
                    workout.muscles,
                    workout.instructions,
                    workout.image_url
                ],
            )
            .with_context(|| format!("failed to insert workout '{}'", workout.name))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_workouts(&self, workout_type: Option<&str>) -> Result<Vec<Workout>> {
        let map = |row: &rusqlite::Row<'_>| {
            Ok(Workout {
                id: row.get(0)?,
                name: row.get(1)?,
                workout_type: row.get(2)?,
                equipment: row.get(3)?,
                muscles: row.get(4)?,
                instructions: row.get(5)?,
                image_url: row.get(6)?,
            })
        };
        let workouts = match workout_type {
            Some(t) => {
                let t = validate_workout_type(t)?;
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, type, equipment, muscles, instructions, image_url
                     FROM workouts WHERE type = ?1 ORDER BY name",
                )?;
                let rows = stmt.query_map(params![t], map)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, type, equipment, muscles, instructions, image_url
                     FROM workouts ORDER BY name",
                )?;
                let rows = stmt.query_map([], map)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
        }
        .context("failed to list workouts")?;
        Ok(workouts)
    }

    /// Load the starter exercise catalog. Skipped when the table already
    /// has rows, so re-running is harmless.
    pub fn seed_workouts(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(0);
        }
        let seeds: &[(&str, &str, &str, &str, &str)] = &[
            (
                "Push-ups",
                "home",
                "None",
                "Chest, Shoulders, Triceps",
                "Get in a plank position with hands shoulder-width apart. Lower your body until your chest nearly touches the floor. Push back up to the starting position. Repeat for desired reps.",
            ),
            (
                "Squats",
                "home",
                "None",
                "Quadriceps, Glutes, Hamstrings",
                "Stand with feet shoulder-width apart. Lower your body by bending your knees and hips. Keep your back straight. Push through your heels to return to starting position.",
            ),
            (
                "Plank",
                "home",
                "None",
                "Core, Shoulders, Back",
                "Hold a push-up position with forearms on the ground. Keep your body in a straight line. Hold for 20-60 seconds.",
            ),
            (
                "Lunges",
                "home",
                "None",
                "Quadriceps, Glutes, Hamstrings",
                "Step forward with one leg and lower your hips until both knees are bent at 90 degrees. Push back to starting position and alternate legs.",
            ),
            (
                "Burpees",
                "home",
                "None",
                "Full Body",
                "Squat down and place hands on ground. Jump back to plank position. Do a push-up. Jump feet back to squat position. Jump up with hands overhead.",
            ),
            (
                "Mountain Climbers",
                "home",
                "None",
                "Core, Shoulders, Legs",
                "Get in a plank position. Bring one knee towards your chest, then quickly switch legs. Continue alternating at a fast pace.",
            ),
            (
                "Dumbbell Bench Press",
                "gym",
                "Dumbbells, Bench",
                "Chest, Shoulders, Triceps",
                "Sit on a bench with dumbbells at shoulder height. Press the dumbbells upward until arms are extended. Lower back to starting position.",
            ),
            (
                "Barbell Deadlift",
                "gym",
                "Barbell, Weights",
                "Back, Glutes, Hamstrings, Core",
                "Stand with feet hip-width apart, barbell in front of shins. Grip the bar and keep it close to your body. Drive through heels to stand up with the bar.",
            ),
            (
                "Leg Press",
                "gym",
                "Leg Press Machine",
                "Quadriceps, Glutes, Hamstrings",
                "Sit in the machine with feet on the platform. Lower the platform by bending your knees. Push back to starting position.",
            ),
            (
                "Treadmill Running",
                "gym",
                "Treadmill",
                "Cardiovascular, Legs",
                "Start with a warm-up walk. Gradually increase speed to your desired pace. Maintain steady breathing throughout your run.",
            ),
        ];
        for (name, workout_type, equipment, muscles, instructions) in seeds {
            self.insert_workout(&NewWorkout {
                name: (*name).to_string(),
                workout_type: (*workout_type).to_string(),
                equipment: Some((*equipment).to_string()),
                muscles: Some((*muscles).to_string()),
                instructions: (*instructions).to_string(),
                image_url: None,
            })?;
        }
        Ok(seeds.len())
    }

    // -- activity logs ----------------------------------------------------

    /// Record one amount against a category. Water goes in as ml, steps
    /// as a whole count, calories as a quick-add entry with a generic
    /// food name.
    pub fn insert_log(&self, category: LogCategory, user_id: i64, amount: f64) -> Result<LogRow> {
        validate_amount(amount)?;
        let now = Local::now();
        let timestamp = now.to_rfc3339();
        let date = now.format("%Y-%m-%d").to_string();
        match category {
            LogCategory::Water => {
                self.conn
                    .execute(
                        "INSERT INTO water_logs (user_id, amount, logged_at) VALUES (?1, ?2, ?3)",
                        params![user_id, amount, timestamp],
                    )
                    .context("failed to insert water log")?;
            }
            LogCategory::Steps => {
                self.conn
                    .execute(
                        "INSERT INTO steps_logs (user_id, steps, logged_at) VALUES (?1, ?2, ?3)",
                        params![user_id, amount.round() as i64, timestamp],
                    )
                    .context("failed to insert steps log")?;
            }
            LogCategory::Calories => {
                self.conn
                    .execute(
                        "INSERT INTO calories_logs (uuid, user_id, food_name, calories, logged_at)
                         VALUES (?1, ?2, 'Quick add', ?3, ?4)",
                        params![
                            Uuid::new_v4().to_string(),
                            user_id,
                            amount.round() as i64,
                            timestamp
                        ],
                    )
                    .context("failed to insert calorie log")?;
            }
        }
        Ok(LogRow {
            id: self.conn.last_insert_rowid(),
            date,
            amount,
            timestamp,
        })
    }

    /// All of a category's rows for one calendar day, plus their sum.
    pub fn daily_logs(
        &self,
        category: LogCategory,
        user_id: i64,
        date: &str,
    ) -> Result<DailyLogSummary> {
        let sql = match category {
            LogCategory::Water => {
                "SELECT id, amount, logged_at FROM water_logs
                 WHERE user_id = ?1 AND substr(logged_at, 1, 10) = ?2 ORDER BY id"
            }
            LogCategory::Steps => {
                "SELECT id, CAST(steps AS REAL), logged_at FROM steps_logs
                 WHERE user_id = ?1 AND substr(logged_at, 1, 10) = ?2 ORDER BY id"
            }
            LogCategory::Calories => {
                "SELECT id, CAST(calories AS REAL), logged_at FROM calories_logs
                 WHERE user_id = ?1 AND substr(logged_at, 1, 10) = ?2 ORDER BY id"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let logs = stmt
            .query_map(params![user_id, date], |row| {
                Ok(LogRow {
                    id: row.get(0)?,
                    date: date.to_string(),
                    amount: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("failed to load {} logs", category.as_str()))?;
        let total = logs.iter().map(|l| l.amount).sum();
        Ok(DailyLogSummary { total, logs })
    }

    /// Persist a full food record into the calorie log.
    pub fn insert_calorie_entry(&self, user_id: i64, food: &FoodRecord) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO calories_logs
                 (uuid, user_id, food_name, calories, protein, carbs, fat, fiber, sugar,
                  serving_size, logged_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    Uuid::new_v4().to_string(),
                    user_id,
                    food.name,
                    food.calories,
                    food.macros.protein,
                    food.macros.carbs,
                    food.macros.fat,
                    food.macros.fiber,
                    food.macros.sugar,
                    food.serving_size,
                    Local::now().to_rfc3339()
                ],
            )
            .with_context(|| format!("failed to log food '{}'", food.name))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Calorie and macro sums for one calendar day, straight from SQL.
    pub fn calorie_day_totals(&self, user_id: i64, date: &str) -> Result<DailyTotals> {
        self.conn
            .query_row(
                "SELECT COALESCE(SUM(calories), 0), COALESCE(SUM(protein), 0),
                        COALESCE(SUM(carbs), 0), COALESCE(SUM(fat), 0)
                 FROM calories_logs
                 WHERE user_id = ?1 AND substr(logged_at, 1, 10) = ?2",
                params![user_id, date],
                |row| {
                    Ok(DailyTotals {
                        calories: row.get(0)?,
                        protein: row.get(1)?,
                        carbs: row.get(2)?,
                        fat: row.get(3)?,
                    })
                },
            )
            .context("failed to compute day totals")
    }

    // -- schedules --------------------------------------------------------

    /// Store a weekly plan. One plan per user per week start date.
    pub fn create_schedule(
        &self,
        user_id: i64,
        week_start_date: &str,
        plan_data: &serde_json::Value,
    ) -> Result<Schedule> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM schedules WHERE user_id = ?1 AND week_start_date = ?2",
                params![user_id, week_start_date],
                |row| row.get(0),
            )
            .optional()
            .context("failed to check existing schedule")?;
        if exists.is_some() {
            bail!("schedule already exists for week {week_start_date}");
        }
        self.conn
            .execute(
                "INSERT INTO schedules (user_id, week_start_date, plan_data, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    user_id,
                    week_start_date,
                    plan_data.to_string(),
                    Local::now().to_rfc3339()
                ],
            )
            .context("failed to insert schedule")?;
        Ok(Schedule {
            id: self.conn.last_insert_rowid(),
            user_id,
            week_start_date: week_start_date.to_string(),
            plan_data: plan_data.clone(),
        })
    }

    pub fn get_schedule(&self, user_id: i64, week_start_date: &str) -> Result<Option<Schedule>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, plan_data FROM schedules
                 WHERE user_id = ?1 AND week_start_date = ?2",
                params![user_id, week_start_date],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("failed to load schedule")?;
        match row {
            Some((id, raw)) => {
                let plan_data =
                    serde_json::from_str(&raw).context("stored schedule plan is not valid JSON")?;
                Ok(Some(Schedule {
                    id,
                    user_id,
                    week_start_date: week_start_date.to_string(),
                    plan_data,
                }))
            }
            None => Ok(None),
        }
    }

    // -- settings ---------------------------------------------------------

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("failed to store setting '{key}'"))?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read setting '{key}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn apple() -> FoodRecord {
        FoodRecord {
            id: "1700000000000-0".to_string(),
            name: "apple".to_string(),
            serving_size: "182g".to_string(),
            calories: 95,
            macros: Macros {
                protein: 0.5,
                carbs: 25.0,
                fat: 0.3,
                fiber: 4.4,
                sugar: 19.0,
            },
        }
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let db = test_db();
        db.migrate().unwrap();
        let version: i64 = db
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_ensure_default_user_is_stable() {
        let db = test_db();
        let first = db.ensure_default_user().unwrap();
        let second = db.ensure_default_user().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_friend_rejects_self_and_duplicate() {
        let db = test_db();
        let me = db.insert_user("me", None).unwrap();
        let other = db.insert_user("other", Some("other@example.com")).unwrap();

        assert!(db.add_friend(me, me).is_err());
        db.add_friend(me, other).unwrap();
        assert!(db.add_friend(me, other).is_err());

        let links = db.list_friends(me).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].friend_name, "other");
        assert_eq!(links[0].status, "pending");
    }

    #[test]
    fn test_accept_friend_only_flips_pending() {
        let db = test_db();
        let me = db.insert_user("me", None).unwrap();
        let other = db.insert_user("other", None).unwrap();
        db.add_friend(me, other).unwrap();

        assert!(db.accept_friend(me, other).unwrap());
        assert!(!db.accept_friend(me, other).unwrap());
        assert!(!db.accept_friend(me, 999).unwrap());
        assert_eq!(db.list_friends(me).unwrap()[0].status, "accepted");
    }

    #[test]
    fn test_insert_workout_validates_type() {
        let db = test_db();
        let bad = NewWorkout {
            name: "Yoga".to_string(),
            workout_type: "outdoor".to_string(),
            equipment: None,
            muscles: None,
            instructions: "Stretch.".to_string(),
            image_url: None,
        };
        assert!(db.insert_workout(&bad).is_err());
    }

    #[test]
    fn test_seed_workouts_once() {
        let db = test_db();
        let seeded = db.seed_workouts().unwrap();
        assert_eq!(seeded, 10);
        assert_eq!(db.seed_workouts().unwrap(), 0);

        let home = db.list_workouts(Some("home")).unwrap();
        assert_eq!(home.len(), 6);
        assert!(home.iter().all(|w| w.workout_type == "home"));
        let gym = db.list_workouts(Some("gym")).unwrap();
        assert_eq!(gym.len(), 4);
        let all = db.list_workouts(None).unwrap();
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn test_insert_log_rejects_non_positive() {
        let db = test_db();
        let user = db.ensure_default_user().unwrap();
        assert!(db.insert_log(LogCategory::Water, user, 0.0).is_err());
        assert!(db.insert_log(LogCategory::Steps, user, -100.0).is_err());
    }

    #[test]
    fn test_daily_logs_totals_per_category() {
        let db = test_db();
        let user = db.ensure_default_user().unwrap();
        db.insert_log(LogCategory::Water, user, 250.0).unwrap();
        db.insert_log(LogCategory::Water, user, 500.0).unwrap();
        db.insert_log(LogCategory::Steps, user, 4000.0).unwrap();

        let today = Local::now().format("%Y-%m-%d").to_string();
        let water = db.daily_logs(LogCategory::Water, user, &today).unwrap();
        assert_eq!(water.logs.len(), 2);
        assert!((water.total - 750.0).abs() < f64::EPSILON);

        let steps = db.daily_logs(LogCategory::Steps, user, &today).unwrap();
        assert_eq!(steps.logs.len(), 1);
        assert!((steps.total - 4000.0).abs() < f64::EPSILON);

        let empty = db
            .daily_logs(LogCategory::Water, user, "1999-01-01")
            .unwrap();
        assert!(empty.logs.is_empty());
        assert!((empty.total - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quick_add_calories_share_table_with_foods() {
        let db = test_db();
        let user = db.ensure_default_user().unwrap();
        db.insert_calorie_entry(user, &apple()).unwrap();
        db.insert_log(LogCategory::Calories, user, 300.0).unwrap();

        let today = Local::now().format("%Y-%m-%d").to_string();
        let summary = db.daily_logs(LogCategory::Calories, user, &today).unwrap();
        assert_eq!(summary.logs.len(), 2);
        assert!((summary.total - 395.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_calorie_day_totals_sums_macros() {
        let db = test_db();
        let user = db.ensure_default_user().unwrap();
        db.insert_calorie_entry(user, &apple()).unwrap();
        db.insert_calorie_entry(user, &apple()).unwrap();

        let today = Local::now().format("%Y-%m-%d").to_string();
        let totals = db.calorie_day_totals(user, &today).unwrap();
        assert!((totals.calories - 190.0).abs() < f64::EPSILON);
        assert!((totals.protein - 1.0).abs() < f64::EPSILON);
        assert!((totals.carbs - 50.0).abs() < f64::EPSILON);

        let empty = db.calorie_day_totals(user, "1999-01-01").unwrap();
        assert_eq!(empty, DailyTotals::default());
    }

    #[test]
    fn test_schedule_unique_per_week() {
        let db = test_db();
        let user = db.ensure_default_user().unwrap();
        let plan = serde_json::json!({"monday": ["Push-ups"], "tuesday": ["Squats"]});

        let created = db.create_schedule(user, "2024-03-11", &plan).unwrap();
        assert_eq!(created.week_start_date, "2024-03-11");
        assert!(db.create_schedule(user, "2024-03-11", &plan).is_err());

        let loaded = db.get_schedule(user, "2024-03-11").unwrap().unwrap();
        assert_eq!(loaded.plan_data, plan);
        assert!(db.get_schedule(user, "2024-03-18").unwrap().is_none());
    }

    #[test]
    fn test_settings_round_trip_and_overwrite() {
        let db = test_db();
        assert!(db.get_setting("calorie_goal").unwrap().is_none());
        db.set_setting("calorie_goal", "2200").unwrap();
        assert_eq!(
            db.get_setting("calorie_goal").unwrap().as_deref(),
            Some("2200")
        );
        db.set_setting("calorie_goal", "1800").unwrap();
        assert_eq!(
            db.get_setting("calorie_goal").unwrap().as_deref(),
            Some("1800")
        );
    }
}

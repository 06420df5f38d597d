use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::models::{
    DEFAULT_CALORIE_GOAL, DailyTotals, FoodRecord, Friend, LoggedEntry, NudgeEvent, validate_goal,
};
use crate::summary::{aggregate, should_reset};

/// Session-scoped state for the demo server: friends roster, nudge
/// events, and the current day's food log. Handlers receive this behind
/// a lock; nothing here touches disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub friends: Vec<Friend>,
    pub nudges: Vec<NudgeEvent>,
    pub day: DayLog,
}

impl MemoryStore {
    /// A store seeded with the demo roster, newest first.
    #[must_use]
    pub fn with_demo_friends() -> Self {
        Self {
            friends: vec![
                Friend {
                    id: 1,
                    name: "Alex".to_string(),
                    email: Some("alex@example.com".to_string()),
                    status: "On track".to_string(),
                    last_active: "Today".to_string(),
                    streak_days: 6,
                },
                Friend {
                    id: 2,
                    name: "Jordan".to_string(),
                    email: Some("jordan@example.com".to_string()),
                    status: "Check in".to_string(),
                    last_active: "Yesterday".to_string(),
                    streak_days: 3,
                },
                Friend {
                    id: 3,
                    name: "Sam".to_string(),
                    email: Some("sam@example.com".to_string()),
                    status: "Ghosting".to_string(),
                    last_active: "3 days ago".to_string(),
                    streak_days: 0,
                },
            ],
            nudges: Vec::new(),
            day: DayLog::default(),
        }
    }

    /// Add a friend to the front of the roster. At least one of name or
    /// email must be present.
    pub fn add_friend(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        now_ms: i64,
    ) -> Result<Friend> {
        let name = name.filter(|n| !n.trim().is_empty());
        let email = email.filter(|e| !e.trim().is_empty());
        let Some(display_name) = name.clone().or_else(|| email.clone()) else {
            bail!("Name or email is required");
        };
        let friend = Friend {
            id: now_ms,
            name: display_name,
            email,
            status: "Pending".to_string(),
            last_active: "Not yet".to_string(),
            streak_days: 0,
        };
        self.friends.insert(0, friend.clone());
        Ok(friend)
    }

    /// Flip a pending friend to "On track". `None` when the id is unknown.
    pub fn accept_friend(&mut self, id: i64) -> Option<Friend> {
        let friend = self.friends.iter_mut().find(|f| f.id == id)?;
        friend.status = "On track".to_string();
        Some(friend.clone())
    }

    /// Record a nudge event for a friend. `None` when the id is unknown.
    pub fn nudge_friend(
        &mut self,
        id: i64,
        message: Option<String>,
        at: String,
    ) -> Option<NudgeEvent> {
        self.friends.iter().find(|f| f.id == id)?;
        let event = NudgeEvent {
            id: self.nudges.len() as i64 + 1,
            friend_id: id,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Nudge!".to_string()),
            at,
        };
        self.nudges.push(event.clone());
        Some(event)
    }
}

/// The current day's food entries plus the session calorie goal.
///
/// `last_date` tracks which calendar day the entries belong to; the
/// first touch on a new day clears them (midnight rollover).
#[derive(Debug)]
pub struct DayLog {
    pub entries: Vec<LoggedEntry>,
    goal: i64,
    pub last_date: Option<NaiveDate>,
}

impl Default for DayLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            goal: DEFAULT_CALORIE_GOAL,
            last_date: None,
        }
    }
}

impl DayLog {
    /// Clear stale entries when the calendar day has changed since the
    /// log was last touched. Returns whether a reset happened. The goal
    /// survives rollover.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if should_reset(self.last_date, today) {
            self.entries.clear();
            self.last_date = Some(today);
            true
        } else {
            false
        }
    }

    /// Append a food to today's log. The entry's unique id combines the
    /// record id with the add timestamp, so the same search result can
    /// be added twice and removed individually.
    pub fn add(&mut self, food: FoodRecord, now_ms: i64) -> LoggedEntry {
        let entry = LoggedEntry {
            unique_id: format!("{}-{now_ms}", food.id),
            food,
            added_at: now_ms,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Remove one entry by unique id. `false` when nothing matched.
    pub fn remove(&mut self, unique_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.unique_id != unique_id);
        self.entries.len() < before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn totals(&self) -> DailyTotals {
        aggregate(&self.entries)
    }

    /// Replace the calorie goal. Out-of-range values are rejected and
    /// the stored goal is left unchanged.
    pub fn set_goal(&mut self, goal: i64) -> Result<()> {
        validate_goal(goal)?;
        self.goal = goal;
        Ok(())
    }

    #[must_use]
    pub fn goal(&self) -> i64 {
        self.goal
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Streak {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub current_streak: i32,
    pub longest_streak: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStreak {
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub current_streak: i32,
    pub longest_streak: i32,
}

impl NewStreak {
    /// A one-day streak starting and ending at `at`.
    pub fn starting_at(user_id: Uuid, at: DateTime<Utc>, longest_streak: i32) -> Self {
        Self {
            user_id,
            start_date: at,
            end_date: at,
            current_streak: 1,
            longest_streak: longest_streak.max(1),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{Achievement, Goal, Streak};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub workout_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExerciseInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1))]
    pub sets: i32,
    #[validate(range(min = 1))]
    pub reps: i32,
    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWorkoutRequest {
    /// Defaults to the time the workout is saved.
    pub date: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub duration_minutes: i32,
    #[validate(length(min = 1, max = 50))]
    pub workout_type: String,
    pub notes: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub exercises: Vec<ExerciseInput>,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub workout_type: String,
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseInput>,
}

/// Inclusive date bounds for workout queries; `None` leaves a side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Everything the save flow produced for one workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLogOutcome {
    pub workout: Workout,
    pub streak: Option<Streak>,
    pub updated_goals: Vec<Goal>,
    pub new_achievements: Vec<Achievement>,
}

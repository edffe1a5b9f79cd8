use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::ExerciseInput;

/// A reusable template of exercises a user can follow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub exercises: Vec<PlanExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanExercise {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub exercises: Vec<ExerciseInput>,
}

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub exercises: Vec<ExerciseInput>,
}

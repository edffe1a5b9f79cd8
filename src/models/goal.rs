use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub start_value: f64, // value when the goal was set
    pub exercise_name: Option<String>, // exercise_weight goals only
    pub start_date: DateTime<Utc>,
    pub target_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "goal_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    TargetWeight,
    WorkoutCount,
    ExerciseWeight,
}

impl GoalType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TargetWeight => "Target Weight",
            Self::WorkoutCount => "Workout Count",
            Self::ExerciseWeight => "Exercise Weight",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    #[validate(range(min = 0.0))]
    pub target_value: f64,
    /// Required for target-weight goals.
    #[validate(range(min = 0.0))]
    pub current_weight: Option<f64>,
    /// Required for exercise-weight goals.
    pub exercise_name: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub start_value: f64,
    pub exercise_name: Option<String>,
    pub start_date: DateTime<Utc>,
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalFilter {
    pub completed: Option<bool>,
    pub goal_type: Option<GoalType>,
}

impl GoalFilter {
    pub fn open() -> Self {
        Self {
            completed: Some(false),
            goal_type: None,
        }
    }

    pub fn open_of_type(goal_type: GoalType) -> Self {
        Self {
            completed: Some(false),
            goal_type: Some(goal_type),
        }
    }

    pub fn matches(&self, goal: &Goal) -> bool {
        self.completed.map_or(true, |c| goal.completed == c)
            && self.goal_type.map_or(true, |t| goal.goal_type == t)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub type_label: String,
    pub progress_percentage: f64,
}

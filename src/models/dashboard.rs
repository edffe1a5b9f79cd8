use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Achievement, MotivationalQuote, Workout};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_workouts: i64,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub workouts_this_week: i64,
    pub recent_workouts: Vec<Workout>,
    pub recent_achievements: Vec<Achievement>,
    /// Least recently shown quote; `None` when no quotes are stored.
    pub quote: Option<MotivationalQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDay {
    pub date: NaiveDate,
    pub workouts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    pub exercise_name: String,
    pub initial_weight: f64,
    pub current_weight: f64,
    pub personal_best: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub window_days: i64,
    pub total_workouts: usize,
    pub average_per_week: f64,
    pub most_active_day: Option<ActiveDay>,
    pub exercise_progress: Vec<ExerciseProgress>,
}

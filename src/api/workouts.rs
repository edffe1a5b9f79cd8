use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::config::tracker::MAX_LIST_LIMIT;
use crate::error::{Result, TrackerError};
use crate::models::{LogWorkoutRequest, Workout, WorkoutLogOutcome};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of workouts to return, newest first (max: 100)
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn get_limit(&self) -> Result<Option<i64>> {
        match self.limit {
            Some(limit) if !(1..=MAX_LIST_LIMIT).contains(&limit) => Err(
                TrackerError::Validation(format!("limit must be between 1 and {MAX_LIST_LIMIT}")),
            ),
            limit => Ok(limit),
        }
    }
}

pub fn workout_routes() -> Router<AppState> {
    Router::new().route("/", get(list_workouts).post(log_workout))
}

/// Save a workout and evaluate streaks, goals and achievements
pub async fn log_workout(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<LogWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutLogOutcome>)> {
    let outcome = state.workouts.log_workout(user_id, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Workout history, newest first
pub async fn list_workouts(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Workout>>> {
    let workouts = state.workouts.history(user_id, query.get_limit()?).await?;
    Ok(Json(workouts))
}

pub async fn list_exercise_options(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.workouts.exercise_options().await?))
}

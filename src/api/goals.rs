use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use super::AppState;
use crate::error::Result;
use crate::models::{CreateGoalRequest, GoalView};

pub fn goal_routes() -> Router<AppState> {
    Router::new().route("/", get(get_goals).post(create_goal))
}

/// All goals for the user with their progress percentage
pub async fn get_goals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<GoalView>>> {
    Ok(Json(state.goals.list_goals(user_id).await?))
}

/// Create a new goal
pub async fn create_goal(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalView>)> {
    let goal = state.goals.create_goal(user_id, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(GoalView::from(goal))))
}

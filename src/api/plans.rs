use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use super::AppState;
use crate::error::Result;
use crate::models::{CreatePlanRequest, WorkoutPlan};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:plan_id", get(get_plan).delete(delete_plan))
}

pub async fn list_plans(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<WorkoutPlan>>> {
    Ok(Json(state.plans.list_plans(user_id).await?))
}

/// Create a named workout plan
pub async fn create_plan(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<WorkoutPlan>)> {
    let plan = state.plans.create_plan(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WorkoutPlan>> {
    Ok(Json(state.plans.get_plan(user_id, plan_id).await?))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    state.plans.delete_plan(user_id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::config::tracker::MAX_LIST_LIMIT;
use crate::error::Result;
use crate::models::{Achievement, DashboardSummary, ProgressReport};

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// Length of the reporting window in days (default: 30)
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AchievementQuery {
    pub limit: Option<i64>,
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/progress", get(get_progress))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DashboardSummary>> {
    Ok(Json(state.dashboard.summary(user_id, Utc::now()).await?))
}

/// Progress report over the requested window
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressReport>> {
    let report = state.progress.report(user_id, query.days, Utc::now()).await?;
    Ok(Json(report))
}

/// Earned achievements, newest first
pub async fn get_achievements(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<AchievementQuery>,
) -> Result<Json<Vec<Achievement>>> {
    let limit = query.limit.map(|l| l.clamp(1, MAX_LIST_LIMIT));
    Ok(Json(state.achievements.list_achievements(user_id, limit).await?))
}

/// A single earned achievement by title
pub async fn get_achievement(
    State(state): State<AppState>,
    Path((user_id, title)): Path<(Uuid, String)>,
) -> Result<Json<Achievement>> {
    Ok(Json(state.achievements.get_achievement(user_id, &title).await?))
}

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use super::AppState;
use crate::error::Result;
use crate::models::{ProfileView, UpdateProfileRequest};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileView>> {
    Ok(Json(state.profiles.get_profile(user_id).await?))
}

/// Update profile fields; a new weight is recorded in the weight history
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileView>> {
    let profile = state
        .profiles
        .update_profile(user_id, request, Utc::now())
        .await?;
    Ok(Json(profile))
}

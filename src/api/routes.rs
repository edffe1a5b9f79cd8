use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::dashboard::{dashboard_routes, get_achievement, get_achievements};
use super::goals::goal_routes;
use super::health::health_check;
use super::plans::plan_routes;
use super::profile::profile_routes;
use super::workouts::{list_exercise_options, workout_routes};
use super::AppState;

pub fn create_routes(state: AppState) -> Router {
    let user_routes = Router::new()
        .nest("/workouts", workout_routes())
        .nest("/goals", goal_routes())
        .nest("/profile", profile_routes())
        .nest("/plans", plan_routes())
        .merge(dashboard_routes())
        .route("/achievements", get(get_achievements))
        .route("/achievements/:title", get(get_achievement));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/exercises", get(list_exercise_options))
        .nest("/api/users/:user_id", user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::{base_time, MockDataGenerator, TestContext};
use nutrisync::api::routes::create_routes;

fn create_test_app(ctx: &TestContext) -> Router {
    create_routes(ctx.state.clone())
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);

    let (status, body) = send(&app, request(Method::GET, "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "nutrisync");
}

#[tokio::test]
async fn test_log_workout_and_read_back() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user = ctx.create_user().await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &format!("/api/users/{}/workouts", user.id),
            Some(json!({
                "duration_minutes": 65,
                "workout_type": "Strength",
                "notes": "Leg day",
                "exercises": [
                    { "name": "Squat", "sets": 5, "reps": 5, "weight_kg": 120.0 },
                    { "name": "Lunge", "sets": 3, "reps": 10 }
                ]
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["workout"]["workout_type"], "Strength");
    assert_eq!(body["workout"]["exercises"].as_array().unwrap().len(), 2);
    assert_eq!(body["streak"]["current_streak"], 1);
    let titles: Vec<_> = body["new_achievements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["First Workout", "Hour Champion"]);

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/users/{}/workouts?limit=10", user.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, request(Method::GET, "/api/exercises", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Lunge", "Squat"]));

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/users/{}/dashboard", user.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_workouts"], 1);
    assert_eq!(body["current_streak"], 1);

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/users/{}/achievements", user.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/users/{}/progress?days=14", user.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_days"], 14);
    assert_eq!(body["total_workouts"], 1);
}

#[tokio::test]
async fn test_invalid_workouts_are_rejected() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user = ctx.create_user().await;
    let uri = format!("/api/users/{}/workouts", user.id);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &uri,
            Some(json!({ "duration_minutes": 30, "workout_type": "  " })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "missing_field");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &uri,
            Some(json!({
                "duration_minutes": -5,
                "workout_type": "Cardio"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("{uri}?limit=0"), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goal_endpoints() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user = ctx.create_user().await;
    let uri = format!("/api/users/{}/goals", user.id);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &uri,
            Some(json!({
                "title": "Bench 100",
                "goal_type": "exercise_weight",
                "target_value": 100.0,
                "exercise_name": "Bench Press"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Bench 100");
    assert_eq!(body["type_label"], "Exercise Weight");
    assert_eq!(body["progress_percentage"], 0.0);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &uri,
            Some(json!({
                "title": "Cut",
                "goal_type": "target_weight",
                "target_value": 75.0
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Missing required field: current_weight");

    let (status, body) = send(&app, request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_profile_endpoints() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user = ctx.create_user().await;
    let uri = format!("/api/users/{}/profile", user.id);

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &uri,
            Some(json!({ "height_cm": 170.0, "weight_kg": 65.0, "fitness_goal": "Run a 10k" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], user.email.as_str());
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["bmi"]["category"], "normal_weight");
    assert_eq!(body["weight_history"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["fitness_goal"], "Run a 10k");

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/users/{}/profile", Uuid::new_v4()), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_writes_for_unknown_user_are_not_found() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user_id = Uuid::new_v4();

    let writes = [
        (
            "workouts",
            json!({ "duration_minutes": 30, "workout_type": "Cardio", "exercises": [] }),
        ),
        (
            "goals",
            json!({ "title": "Ten sessions", "goal_type": "workout_count", "target_value": 10.0 }),
        ),
        (
            "plans",
            json!({ "name": "Push", "exercises": [{ "name": "Bench Press", "sets": 3, "reps": 8 }] }),
        ),
    ];

    for (resource, body) in writes {
        let uri = format!("/api/users/{user_id}/{resource}");
        let (status, body) = send(&app, request(Method::POST, &uri, Some(body))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{resource}");
        assert_eq!(body["error"], "not_found");
    }

    let (_, body) = send(&app, request(Method::GET, "/api/exercises", None)).await;
    assert!(!body
        .as_array()
        .unwrap()
        .iter()
        .any(|name| name == "Bench Press"));
}

#[tokio::test]
async fn test_plan_endpoints() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user = ctx.create_user().await;
    let uri = format!("/api/users/{}/plans", user.id);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            &uri,
            Some(json!({
                "name": " Upper body ",
                "description": "Mondays",
                "exercises": [
                    { "name": "Bench Press", "sets": 4, "reps": 8, "weight_kg": 70.0 },
                    { "name": "Pull-up", "sets": 3, "reps": 10 }
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Upper body");
    assert_eq!(body["exercises"][1]["name"], "Pull-up");
    let plan_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(Method::POST, &uri, Some(json!({ "name": "Empty", "exercises": [] }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "missing_field");

    let (status, body) = send(&app, request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let plan_uri = format!("{uri}/{plan_id}");
    let (status, body) = send(&app, request(Method::GET, &plan_uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Mondays");
    assert_eq!(body["exercises"].as_array().unwrap().len(), 2);

    let other = ctx.create_user().await;
    let foreign_uri = format!("/api/users/{}/plans/{plan_id}", other.id);
    let (status, _) = send(&app, request(Method::DELETE, &foreign_uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request(Method::DELETE, &plan_uri, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, request(Method::GET, &plan_uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_single_achievement_lookup() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx);
    let user = ctx.create_user().await;
    ctx.log_at(user.id, MockDataGenerator::workout(30), base_time()).await;

    let (status, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/users/{}/achievements/First%20Workout", user.id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "First Workout");

    let (status, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/users/{}/achievements/Centurion", user.id),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::{Fake, Faker};
use uuid::Uuid;

use nutrisync::api::AppState;
use nutrisync::config::TrackerConfig;
use nutrisync::models::*;
use nutrisync::store::{FitnessStore, InMemoryStore};

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

/// Services wired over a fresh in-memory store
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        init_test_logging();
        let store = Arc::new(InMemoryStore::new());
        let shared: Arc<dyn FitnessStore> = store.clone();

        Self {
            state: AppState::new(shared, &config),
            store,
        }
    }

    pub async fn create_user(&self) -> User {
        self.store
            .create_user(MockDataGenerator::new_user())
            .await
            .expect("Failed to create test user")
    }

    /// Log a workout through the full save flow at `at`.
    pub async fn log_at(&self, user_id: Uuid, request: LogWorkoutRequest, at: DateTime<Utc>) -> WorkoutLogOutcome {
        self.state
            .workouts
            .log_workout(user_id, request, at)
            .await
            .expect("Failed to log workout")
    }
}

/// Mock data generators
pub struct MockDataGenerator;

impl MockDataGenerator {
    /// Generate a test user
    pub fn new_user() -> NewUser {
        NewUser {
            email: SafeEmail().fake(),
            password_hash: "$2b$12$dummy_hash".to_string(),
        }
    }

    /// Generate a workout without exercises
    pub fn workout(duration_minutes: i32) -> LogWorkoutRequest {
        let workout_types = ["Strength", "Cardio", "HIIT", "Yoga", "Mobility"];

        LogWorkoutRequest {
            date: None,
            duration_minutes,
            workout_type: workout_types[(0..workout_types.len()).fake::<usize>()].to_string(),
            notes: Some(format!("Generated test workout {}", Faker.fake::<u16>())),
            exercises: Vec::new(),
        }
    }

    /// Generate a strength workout with the given lifts
    pub fn strength_workout(lifts: &[(&str, Option<f64>)]) -> LogWorkoutRequest {
        LogWorkoutRequest {
            workout_type: "Strength".to_string(),
            exercises: lifts
                .iter()
                .map(|(name, weight_kg)| ExerciseInput {
                    name: name.to_string(),
                    sets: (3..6).fake(),
                    reps: (5..12).fake(),
                    weight_kg: *weight_kg,
                })
                .collect(),
            ..Self::workout(45)
        }
    }
}

/// A fixed Monday morning, so calendar-day arithmetic in tests is stable.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
}

pub fn days_after_base(days: i64) -> DateTime<Utc> {
    base_time() + Duration::days(days)
}

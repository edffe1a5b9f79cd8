use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{AchievementService, GoalService, StreakService};
use crate::error::{Result, TrackerError};
use crate::models::{DateRange, LogWorkoutRequest, NewWorkout, Workout, WorkoutLogOutcome};
use crate::store::FitnessStore;

/// One async mutex per user; save flows for the same user run one at a time.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the user's entry once no caller holds its mutex, so the map only
    /// holds users with a save in flight.
    pub fn release(&self, user_id: Uuid) {
        self.locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn FitnessStore>,
    streaks: StreakService,
    goals: GoalService,
    achievements: AchievementService,
    locks: UserLocks,
}

impl WorkoutService {
    pub fn new(
        store: Arc<dyn FitnessStore>,
        streaks: StreakService,
        goals: GoalService,
        achievements: AchievementService,
    ) -> Self {
        Self {
            store,
            streaks,
            goals,
            achievements,
            locks: UserLocks::new(),
        }
    }

    /// Save a workout and run the streak, goal and achievement evaluators on
    /// it, in that order.
    ///
    /// A failing step aborts the remaining ones. Steps that already committed
    /// stay committed.
    #[instrument(skip(self, request), fields(workout_type = %request.workout_type))]
    pub async fn log_workout(
        &self,
        user_id: Uuid,
        request: LogWorkoutRequest,
        now: DateTime<Utc>,
    ) -> Result<WorkoutLogOutcome> {
        let new_workout = prepare_workout(user_id, request, now)?;

        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {user_id}")))?;

        let lock = self.locks.for_user(user_id);
        let result = {
            let _guard = lock.lock().await;
            self.save_and_evaluate(user_id, new_workout, now).await
        };
        drop(lock);
        self.locks.release(user_id);

        match result {
            Ok(outcome) => {
                info!(
                    %user_id,
                    workout_id = %outcome.workout.id,
                    goals_updated = outcome.updated_goals.len(),
                    achievements = outcome.new_achievements.len(),
                    "workout saved"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(%user_id, "error saving workout: {}", e);
                Err(e)
            }
        }
    }

    async fn save_and_evaluate(
        &self,
        user_id: Uuid,
        new_workout: NewWorkout,
        now: DateTime<Utc>,
    ) -> Result<WorkoutLogOutcome> {
        for exercise in &new_workout.exercises {
            self.store.ensure_exercise_option(&exercise.name).await?;
        }

        let workout = self.store.insert_workout(new_workout).await?;
        let streak = self.streaks.record_workout(user_id, now).await?;
        let updated_goals = self
            .goals
            .check_and_update_goals(user_id, Some(&workout), now)
            .await?;
        let new_achievements = self.achievements.check_achievements(user_id, now).await?;

        Ok(WorkoutLogOutcome {
            workout,
            streak: Some(streak),
            updated_goals,
            new_achievements,
        })
    }

    pub async fn history(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<Workout>> {
        self.store.list_workouts(user_id, DateRange::all(), limit).await
    }

    pub async fn exercise_options(&self) -> Result<Vec<String>> {
        self.store.list_exercise_options().await
    }
}

fn prepare_workout(user_id: Uuid, request: LogWorkoutRequest, now: DateTime<Utc>) -> Result<NewWorkout> {
    request.validate()?;

    let workout_type = request.workout_type.trim().to_string();
    if workout_type.is_empty() {
        return Err(TrackerError::MissingField("workout_type"));
    }

    let mut exercises = request.exercises;
    for exercise in &mut exercises {
        exercise.name = exercise.name.trim().to_string();
        if exercise.name.is_empty() {
            return Err(TrackerError::MissingField("exercise.name"));
        }
    }

    Ok(NewWorkout {
        user_id,
        date: request.date.unwrap_or(now),
        duration_minutes: request.duration_minutes,
        workout_type,
        notes: request.notes.filter(|n| !n.trim().is_empty()),
        exercises,
    })
}

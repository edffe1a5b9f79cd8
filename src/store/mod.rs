//! Persistence gateway
//!
//! Every service talks to storage through [`FitnessStore`]. `PgFitnessStore`
//! backs production deployments; `InMemoryStore` is used when no database is
//! configured and throughout the test suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Achievement, DateRange, Goal, GoalFilter, MotivationalQuote, NewAchievement, NewGoal,
    NewPlan, NewStreak, NewUser, NewWorkout, Streak, UpdateProfileRequest, User, WeightEntry,
    Workout, WorkoutPlan,
};

pub use memory::InMemoryStore;
pub use postgres::PgFitnessStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FitnessStore: Send + Sync {
    // Users and profile
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<User>>;
    async fn insert_weight_entry(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<WeightEntry>;
    async fn recent_weight_entries(&self, user_id: Uuid, limit: i64) -> Result<Vec<WeightEntry>>;

    // Workouts
    async fn insert_workout(&self, workout: NewWorkout) -> Result<Workout>;
    /// Newest first, exercises attached.
    async fn list_workouts(
        &self,
        user_id: Uuid,
        range: DateRange,
        limit: Option<i64>,
    ) -> Result<Vec<Workout>>;
    async fn count_workouts(&self, user_id: Uuid, range: DateRange) -> Result<i64>;

    // Exercise catalog
    async fn ensure_exercise_option(&self, name: &str) -> Result<()>;
    async fn list_exercise_options(&self) -> Result<Vec<String>>;

    // Streaks
    /// The streak with the latest end date.
    async fn latest_streak(&self, user_id: Uuid) -> Result<Option<Streak>>;
    async fn insert_streak(&self, streak: NewStreak) -> Result<Streak>;
    async fn update_streak(&self, streak: &Streak) -> Result<()>;

    // Goals
    async fn insert_goal(&self, goal: NewGoal) -> Result<Goal>;
    /// Ordered by target date, undated goals last.
    async fn list_goals(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>>;
    /// Applies only while the goal is still open. Returns the updated row, or
    /// `None` if the goal was missing or already completed.
    async fn update_goal_progress(
        &self,
        goal_id: Uuid,
        current_value: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<Goal>>;

    // Achievements
    async fn find_achievement(&self, user_id: Uuid, title: &str) -> Result<Option<Achievement>>;
    /// Inserts unless the user already holds an achievement with this title.
    /// Returns the new row only when one was created.
    async fn insert_achievement_if_absent(
        &self,
        achievement: NewAchievement,
    ) -> Result<Option<Achievement>>;
    /// Newest first.
    async fn list_achievements(&self, user_id: Uuid, limit: Option<i64>)
        -> Result<Vec<Achievement>>;

    // Workout plans
    async fn insert_plan(&self, plan: NewPlan) -> Result<WorkoutPlan>;
    /// Oldest first, exercises attached.
    async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>>;
    async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<Option<WorkoutPlan>>;
    /// Returns whether a plan owned by the user was removed.
    async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<bool>;

    // Motivational quotes
    /// Adds the quote unless the same text is already stored.
    async fn ensure_quote(&self, quote: &str, author: Option<String>) -> Result<()>;
    /// Picks the least recently displayed quote (never shown first) and
    /// marks it displayed at `now`.
    async fn next_quote(&self, now: DateTime<Utc>) -> Result<Option<MotivationalQuote>>;
}

// API routes and handlers

pub mod dashboard;
pub mod goals;
pub mod health;
pub mod plans;
pub mod profile;
pub mod routes;
pub mod workouts;

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::services::{
    AchievementService, DashboardService, GoalService, PlanService, ProfileService,
    ProgressService, StreakService, WorkoutService,
};
use crate::store::FitnessStore;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub workouts: WorkoutService,
    pub goals: GoalService,
    pub achievements: AchievementService,
    pub dashboard: DashboardService,
    pub progress: ProgressService,
    pub profiles: ProfileService,
    pub plans: PlanService,
}

impl AppState {
    pub fn new(store: Arc<dyn FitnessStore>, config: &TrackerConfig) -> Self {
        let streaks = StreakService::new(store.clone(), config.streak_interval_days);
        let goals = GoalService::new(store.clone());
        let achievements = AchievementService::new(store.clone(), config.weekly_window_days);

        Self {
            workouts: WorkoutService::new(
                store.clone(),
                streaks,
                goals.clone(),
                achievements.clone(),
            ),
            dashboard: DashboardService::new(store.clone(), config),
            progress: ProgressService::new(store.clone(), config.progress_window_days),
            plans: PlanService::new(store.clone()),
            profiles: ProfileService::new(store, goals.clone()),
            goals,
            achievements,
        }
    }
}

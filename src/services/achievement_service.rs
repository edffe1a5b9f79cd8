use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Result, TrackerError};
use crate::models::{
    Achievement, DateRange, Milestone, MilestoneFamily, MilestoneTables, NewAchievement, Streak,
    Workout,
};
use crate::store::FitnessStore;

/// Aggregate metrics the milestone tables are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_workouts: u32,
    pub current_streak: u32,
    pub unique_exercises: u32,
    pub recent_workouts: u32,
    /// Longest single workout; any workout at or over a duration threshold
    /// qualifies, so the maximum decides them all.
    pub longest_workout_minutes: u32,
}

impl HistoryStats {
    pub fn collect(
        workouts: &[Workout],
        streak: Option<&Streak>,
        now: DateTime<Utc>,
        window_days: i64,
    ) -> Self {
        let window_start = now - Duration::days(window_days);
        let unique: HashSet<&str> = workouts
            .iter()
            .flat_map(|w| w.exercises.iter().map(|e| e.name.as_str()))
            .collect();

        Self {
            total_workouts: workouts.len() as u32,
            current_streak: streak.map_or(0, |s| s.current_streak.max(0) as u32),
            unique_exercises: unique.len() as u32,
            recent_workouts: workouts.iter().filter(|w| w.date >= window_start).count() as u32,
            longest_workout_minutes: workouts
                .iter()
                .map(|w| w.duration_minutes.max(0) as u32)
                .max()
                .unwrap_or(0),
        }
    }

    fn value(&self, family: MilestoneFamily) -> u32 {
        match family {
            MilestoneFamily::TotalWorkouts => self.total_workouts,
            MilestoneFamily::StreakLength => self.current_streak,
            MilestoneFamily::ExerciseVariety => self.unique_exercises,
            MilestoneFamily::WeeklyVolume => self.recent_workouts,
            MilestoneFamily::WorkoutDuration => self.longest_workout_minutes,
        }
    }
}

const FAMILY_ORDER: [MilestoneFamily; 5] = [
    MilestoneFamily::TotalWorkouts,
    MilestoneFamily::StreakLength,
    MilestoneFamily::ExerciseVariety,
    MilestoneFamily::WeeklyVolume,
    MilestoneFamily::WorkoutDuration,
];

/// Every milestone the stats qualify for, family by family in table order.
pub fn qualifying_milestones<'a>(tables: &'a MilestoneTables, stats: &HistoryStats) -> Vec<&'a Milestone> {
    let mut seen = HashSet::new();
    FAMILY_ORDER
        .iter()
        .flat_map(|family| tables.reached(*family, stats.value(*family)))
        .filter(|&m| seen.insert(m.title.as_str()))
        .collect()
}

#[derive(Clone)]
pub struct AchievementService {
    store: Arc<dyn FitnessStore>,
    tables: Arc<MilestoneTables>,
    window_days: i64,
}

impl AchievementService {
    pub fn new(store: Arc<dyn FitnessStore>, window_days: i64) -> Self {
        Self::with_milestones(store, MilestoneTables::default(), window_days)
    }

    pub fn with_milestones(
        store: Arc<dyn FitnessStore>,
        tables: MilestoneTables,
        window_days: i64,
    ) -> Self {
        Self {
            store,
            tables: Arc::new(tables),
            window_days,
        }
    }

    pub fn milestones(&self) -> &MilestoneTables {
        &self.tables
    }

    /// Award every milestone the user's full history now qualifies for and
    /// return only the achievements created by this call.
    #[instrument(skip(self))]
    pub async fn check_achievements(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Achievement>> {
        let workouts = self.store.list_workouts(user_id, DateRange::all(), None).await?;
        let streak = self.store.latest_streak(user_id).await?;
        let stats = HistoryStats::collect(&workouts, streak.as_ref(), now, self.window_days);

        let mut awarded = Vec::new();
        for milestone in qualifying_milestones(&self.tables, &stats) {
            let candidate = NewAchievement {
                user_id,
                title: milestone.title.clone(),
                description: milestone.description(),
                earned_at: now,
            };

            if let Some(achievement) = self.store.insert_achievement_if_absent(candidate).await? {
                info!(%user_id, title = %achievement.title, "achievement unlocked");
                awarded.push(achievement);
            }
        }

        Ok(awarded)
    }

    pub async fn list_achievements(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<Achievement>> {
        self.store.list_achievements(user_id, limit).await
    }

    pub async fn get_achievement(&self, user_id: Uuid, title: &str) -> Result<Achievement> {
        self.store
            .find_achievement(user_id, title)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("achievement {title}")))
    }
}

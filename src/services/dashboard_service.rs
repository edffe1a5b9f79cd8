use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::models::{DashboardSummary, DateRange};
use crate::store::FitnessStore;

/// Monday 00:00 UTC of the week containing `now`.
pub fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let monday = now.date_naive() - Duration::days(i64::from(now.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN).and_utc()
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn FitnessStore>,
    recent_workouts: i64,
    recent_achievements: i64,
}

impl DashboardService {
    pub fn new(store: Arc<dyn FitnessStore>, config: &TrackerConfig) -> Self {
        Self {
            store,
            recent_workouts: config.dashboard_recent_workouts,
            recent_achievements: config.dashboard_recent_achievements,
        }
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<DashboardSummary> {
        let total_workouts = self.store.count_workouts(user_id, DateRange::all()).await?;
        let streak = self.store.latest_streak(user_id).await?;
        let workouts_this_week = self
            .store
            .count_workouts(user_id, DateRange::since(start_of_week(now)))
            .await?;
        let recent_workouts = self
            .store
            .list_workouts(user_id, DateRange::all(), Some(self.recent_workouts))
            .await?;
        let recent_achievements = self
            .store
            .list_achievements(user_id, Some(self.recent_achievements))
            .await?;
        let quote = self.store.next_quote(now).await?;

        Ok(DashboardSummary {
            total_workouts,
            current_streak: streak.as_ref().map_or(0, |s| s.current_streak),
            longest_streak: streak.as_ref().map_or(0, |s| s.longest_streak),
            workouts_this_week,
            recent_workouts,
            recent_achievements,
            quote,
        })
    }
}

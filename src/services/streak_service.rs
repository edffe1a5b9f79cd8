use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewStreak, Streak};
use crate::store::FitnessStore;

/// What a newly logged workout does to the user's latest streak.
#[derive(Debug, Clone, PartialEq)]
pub enum StreakTransition {
    /// No streak on record yet.
    Start,
    /// Within the interval: the existing row is extended in place.
    Extend(Streak),
    /// Gap too long: a fresh row is opened, carrying the best run so far.
    Restart { longest_streak: i32 },
    /// Same calendar day as the last recorded workout, or a record that ends
    /// after `now`. Nothing is written.
    Unchanged(Streak),
}

/// Whole calendar days (UTC) between the streak's end and `now`.
pub fn days_since(end_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - end_date.date_naive()).num_days()
}

pub fn plan_streak(last: Option<&Streak>, now: DateTime<Utc>, interval_days: i64) -> StreakTransition {
    let Some(last) = last else {
        return StreakTransition::Start;
    };

    let gap = days_since(last.end_date, now);
    if (1..=interval_days).contains(&gap) {
        let current_streak = last.current_streak + 1;
        StreakTransition::Extend(Streak {
            end_date: now,
            current_streak,
            longest_streak: last.longest_streak.max(current_streak),
            ..last.clone()
        })
    } else if gap > interval_days {
        StreakTransition::Restart {
            longest_streak: last.longest_streak.max(1),
        }
    } else {
        StreakTransition::Unchanged(last.clone())
    }
}

#[derive(Clone)]
pub struct StreakService {
    store: Arc<dyn FitnessStore>,
    interval_days: i64,
}

impl StreakService {
    pub fn new(store: Arc<dyn FitnessStore>, interval_days: i64) -> Self {
        Self {
            store,
            interval_days,
        }
    }

    /// Apply a workout logged at `now` to the user's streak record and return
    /// the streak as it stands afterwards.
    #[instrument(skip(self))]
    pub async fn record_workout(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Streak> {
        let last = self.store.latest_streak(user_id).await?;

        let streak = match plan_streak(last.as_ref(), now, self.interval_days) {
            StreakTransition::Start => {
                info!(%user_id, "starting first streak");
                self.store
                    .insert_streak(NewStreak::starting_at(user_id, now, 1))
                    .await?
            }
            StreakTransition::Extend(streak) => {
                debug!(%user_id, current = streak.current_streak, "extending streak");
                self.store.update_streak(&streak).await?;
                streak
            }
            StreakTransition::Restart { longest_streak } => {
                info!(%user_id, longest_streak, "streak broken, starting a new one");
                self.store
                    .insert_streak(NewStreak::starting_at(user_id, now, longest_streak))
                    .await?
            }
            StreakTransition::Unchanged(streak) => {
                debug!(%user_id, "workout already counted for this streak day");
                streak
            }
        };

        Ok(streak)
    }

    pub async fn current_streak(&self, user_id: Uuid) -> Result<Option<Streak>> {
        self.store.latest_streak(user_id).await
    }
}

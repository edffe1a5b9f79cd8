use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::GoalService;
use crate::error::{Result, TrackerError};
use crate::models::{Bmi, ProfileView, UpdateProfileRequest, User};
use crate::store::FitnessStore;

const WEIGHT_HISTORY_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn FitnessStore>,
    goals: GoalService,
}

impl ProfileService {
    pub fn new(store: Arc<dyn FitnessStore>, goals: GoalService) -> Self {
        Self { store, goals }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileView> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {user_id}")))?;

        self.view_of(user).await
    }

    /// Apply a partial profile update. A changed body weight is appended to the
    /// weight history and fed to the user's target-weight goals.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<ProfileView> {
        request.validate()?;

        let previous = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {user_id}")))?;

        let new_weight = request
            .weight_kg
            .filter(|w| previous.weight_kg != Some(*w));

        let user = self
            .store
            .update_profile(user_id, request, now)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {user_id}")))?;

        if let Some(weight_kg) = new_weight {
            self.store.insert_weight_entry(user_id, weight_kg, now).await?;
            let updated = self.goals.update_weight_goals(user_id, weight_kg, now).await?;
            info!(%user_id, weight_kg, goals_updated = updated.len(), "weight recorded");
        }

        self.view_of(user).await
    }

    async fn view_of(&self, user: User) -> Result<ProfileView> {
        let weight_history = self
            .store
            .recent_weight_entries(user.id, WEIGHT_HISTORY_LIMIT)
            .await?;
        let bmi = match (user.height_cm, user.weight_kg) {
            (Some(height), Some(weight)) => Bmi::from_measurements(height, weight),
            _ => None,
        };

        Ok(ProfileView {
            user: user.into(),
            bmi,
            weight_history,
        })
    }
}

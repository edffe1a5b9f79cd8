use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, TrackerError};
use crate::models::{CreatePlanRequest, ExerciseInput, NewPlan, WorkoutPlan};
use crate::store::FitnessStore;

#[derive(Clone)]
pub struct PlanService {
    store: Arc<dyn FitnessStore>,
}

impl PlanService {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self { store }
    }

    /// Store a named plan. A plan needs at least one exercise, and names are
    /// stored trimmed.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_plan(
        &self,
        user_id: Uuid,
        request: CreatePlanRequest,
    ) -> Result<WorkoutPlan> {
        request.validate()?;
        let new_plan = prepare_plan(user_id, request)?;

        self.ensure_user(user_id).await?;

        let plan = self.store.insert_plan(new_plan).await?;
        info!(plan_id = %plan.id, exercises = plan.exercises.len(), "workout plan created");
        Ok(plan)
    }

    pub async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        self.ensure_user(user_id).await?;
        self.store.list_plans(user_id).await
    }

    pub async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<WorkoutPlan> {
        self.store
            .get_plan(user_id, plan_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("plan {plan_id}")))
    }

    #[instrument(skip(self))]
    pub async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<()> {
        if !self.store.delete_plan(user_id, plan_id).await? {
            return Err(TrackerError::NotFound(format!("plan {plan_id}")));
        }

        info!("workout plan deleted");
        Ok(())
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<()> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {user_id}")))?;
        Ok(())
    }
}

fn prepare_plan(user_id: Uuid, request: CreatePlanRequest) -> Result<NewPlan> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(TrackerError::MissingField("name"));
    }
    if request.exercises.is_empty() {
        return Err(TrackerError::MissingField("exercises"));
    }

    let exercises = request
        .exercises
        .into_iter()
        .map(|e| {
            let name = e.name.trim().to_string();
            if name.is_empty() {
                return Err(TrackerError::MissingField("exercise name"));
            }
            Ok(ExerciseInput { name, ..e })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NewPlan {
        user_id,
        name: name.to_string(),
        description: request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        exercises,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn lift(name: &str) -> ExerciseInput {
        ExerciseInput {
            name: name.to_string(),
            sets: 3,
            reps: 10,
            weight_kg: None,
        }
    }

    fn plan_request(name: &str, exercises: Vec<ExerciseInput>) -> CreatePlanRequest {
        CreatePlanRequest {
            name: name.to_string(),
            description: Some("  ".to_string()),
            exercises,
        }
    }

    #[test]
    fn prepare_trims_plan_and_exercise_names() {
        let plan =
            prepare_plan(Uuid::new_v4(), plan_request(" Legs ", vec![lift(" Squat ")])).unwrap();

        assert_eq!(plan.name, "Legs");
        assert_eq!(plan.exercises[0].name, "Squat");
        assert!(plan.description.is_none());
    }

    #[test]
    fn prepare_requires_name_and_exercises() {
        assert_matches!(
            prepare_plan(Uuid::new_v4(), plan_request("   ", vec![lift("Squat")])),
            Err(TrackerError::MissingField("name"))
        );
        assert_matches!(
            prepare_plan(Uuid::new_v4(), plan_request("Legs", vec![])),
            Err(TrackerError::MissingField("exercises"))
        );
        assert_matches!(
            prepare_plan(Uuid::new_v4(), plan_request("Legs", vec![lift(" ")])),
            Err(TrackerError::MissingField("exercise name"))
        );
    }
}

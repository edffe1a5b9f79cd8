use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, TrackerError};
use crate::models::{
    CreateGoalRequest, DateRange, Goal, GoalFilter, GoalType, GoalView, NewGoal, Workout,
};
use crate::store::FitnessStore;

/// Percentage of the way from the goal's start to its target, in [0, 100].
///
/// A goal whose current value equals its target always reads 100, including
/// the degenerate case where both are zero.
pub fn progress_percentage(goal: &Goal) -> f64 {
    if goal.target_value == goal.current_value {
        return 100.0;
    }

    let pct = match goal.goal_type {
        GoalType::TargetWeight => {
            let required = goal.target_value - goal.start_value;
            if required == 0.0 {
                return 0.0;
            }
            // Movement away from the target counts as no progress.
            (goal.current_value - goal.start_value) / required * 100.0
        }
        GoalType::WorkoutCount | GoalType::ExerciseWeight => {
            if goal.target_value <= 0.0 {
                return if goal.current_value > goal.target_value { 100.0 } else { 0.0 };
            }
            goal.current_value / goal.target_value * 100.0
        }
    };

    pct.clamp(0.0, 100.0)
}

/// Whether `weight` reaches a target-weight goal from the side it started on.
pub fn weight_goal_reached(goal: &Goal, weight: f64) -> bool {
    if goal.target_value > goal.start_value {
        weight >= goal.target_value
    } else if goal.target_value < goal.start_value {
        weight <= goal.target_value
    } else {
        weight == goal.target_value
    }
}

/// Heaviest logged weight for `exercise_name` in the workout, if any.
pub fn best_lift(workout: &Workout, exercise_name: &str) -> Option<f64> {
    workout
        .exercises
        .iter()
        .filter(|e| e.name == exercise_name)
        .filter_map(|e| e.weight_kg)
        .fold(None, |best, w| Some(best.map_or(w, |b: f64| b.max(w))))
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        Self {
            type_label: goal.goal_type.label().to_string(),
            progress_percentage: progress_percentage(&goal),
            goal,
        }
    }
}

#[derive(Clone)]
pub struct GoalService {
    store: Arc<dyn FitnessStore>,
}

impl GoalService {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, request), fields(goal_type = ?request.goal_type))]
    pub async fn create_goal(
        &self,
        user_id: Uuid,
        request: CreateGoalRequest,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        request.validate()?;

        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {user_id}")))?;

        let (start_value, exercise_name) = match request.goal_type {
            GoalType::TargetWeight => (
                request
                    .current_weight
                    .ok_or(TrackerError::MissingField("current_weight"))?,
                None,
            ),
            GoalType::ExerciseWeight => {
                let name = request
                    .exercise_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or(TrackerError::MissingField("exercise_name"))?;
                (0.0, Some(name.to_string()))
            }
            GoalType::WorkoutCount => (0.0, None),
        };

        let goal = self
            .store
            .insert_goal(NewGoal {
                user_id,
                title: request.title,
                description: request.description,
                goal_type: request.goal_type,
                target_value: request.target_value,
                current_value: start_value,
                start_value,
                exercise_name,
                start_date: now,
                target_date: request.target_date,
            })
            .await?;

        info!(goal_id = %goal.id, "goal created");
        Ok(goal)
    }

    pub async fn list_goals(&self, user_id: Uuid) -> Result<Vec<GoalView>> {
        let goals = self.store.list_goals(user_id, GoalFilter::default()).await?;

        Ok(goals.into_iter().map(GoalView::from).collect())
    }

    /// Advance every open goal after a workout. Target-weight goals are left to
    /// [`GoalService::update_weight_goals`]. Returns the goals that changed.
    #[instrument(skip(self, workout), fields(workout_id = ?workout.map(|w| w.id)))]
    pub async fn check_and_update_goals(
        &self,
        user_id: Uuid,
        workout: Option<&Workout>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Goal>> {
        let open_goals = self.store.list_goals(user_id, GoalFilter::open()).await?;
        let mut updated = Vec::new();

        for goal in open_goals {
            let progress = match goal.goal_type {
                GoalType::WorkoutCount => Some(self.workout_count_progress(&goal, now).await?),
                GoalType::ExerciseWeight => workout.and_then(|w| exercise_weight_progress(&goal, w)),
                GoalType::TargetWeight => None,
            };

            let Some((current_value, completed)) = progress else {
                continue;
            };
            if current_value == goal.current_value && completed == goal.completed {
                continue;
            }

            if let Some(goal) = self
                .store
                .update_goal_progress(goal.id, current_value, completed, now)
                .await?
            {
                debug!(goal_id = %goal.id, current_value, completed, "goal progress updated");
                updated.push(goal);
            }
        }

        Ok(updated)
    }

    /// Feed a new body weight into the user's open target-weight goals.
    #[instrument(skip(self))]
    pub async fn update_weight_goals(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Goal>> {
        let goals = self
            .store
            .list_goals(user_id, GoalFilter::open_of_type(GoalType::TargetWeight))
            .await?;
        let mut updated = Vec::new();

        for goal in goals {
            let completed = weight_goal_reached(&goal, weight_kg);
            if let Some(goal) = self
                .store
                .update_goal_progress(goal.id, weight_kg, completed, now)
                .await?
            {
                if goal.completed {
                    info!(goal_id = %goal.id, "target weight reached");
                }
                updated.push(goal);
            }
        }

        Ok(updated)
    }

    async fn workout_count_progress(&self, goal: &Goal, now: DateTime<Utc>) -> Result<(f64, bool)> {
        let range = DateRange::between(goal.start_date, goal.target_date.unwrap_or(now));
        let count = self.store.count_workouts(goal.user_id, range).await? as f64;
        Ok((count, count >= goal.target_value))
    }
}

fn exercise_weight_progress(goal: &Goal, workout: &Workout) -> Option<(f64, bool)> {
    let exercise_name = goal.exercise_name.as_deref()?;
    let lifted = best_lift(workout, exercise_name)?;
    (lifted > goal.current_value).then(|| (lifted, lifted >= goal.target_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Exercise;
    use proptest::prelude::*;

    fn goal(goal_type: GoalType, start: f64, current: f64, target: f64) -> Goal {
        let now = Utc::now();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "test".to_string(),
            description: None,
            goal_type,
            target_value: target,
            current_value: current,
            start_value: start,
            exercise_name: Some("Bench Press".to_string()),
            start_date: now,
            target_date: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn workout_with(lifts: &[(&str, Option<f64>)]) -> Workout {
        let id = Uuid::new_v4();
        Workout {
            id,
            user_id: Uuid::new_v4(),
            date: Utc::now(),
            duration_minutes: 45,
            workout_type: "Strength".to_string(),
            notes: None,
            created_at: Utc::now(),
            exercises: lifts
                .iter()
                .map(|(name, weight)| Exercise {
                    id: Uuid::new_v4(),
                    workout_id: id,
                    name: name.to_string(),
                    sets: 3,
                    reps: 8,
                    weight_kg: *weight,
                })
                .collect(),
        }
    }

    #[test]
    fn equal_current_and_target_is_complete() {
        assert_eq!(progress_percentage(&goal(GoalType::WorkoutCount, 0.0, 0.0, 0.0)), 100.0);
        assert_eq!(progress_percentage(&goal(GoalType::WorkoutCount, 0.0, 12.0, 12.0)), 100.0);
    }

    #[test]
    fn count_goal_percentage_is_ratio() {
        assert!((progress_percentage(&goal(GoalType::WorkoutCount, 0.0, 7.0, 10.0)) - 70.0).abs() < 1e-9);
        assert_eq!(progress_percentage(&goal(GoalType::ExerciseWeight, 0.0, 150.0, 100.0)), 100.0);
    }

    #[test]
    fn weight_loss_percentage_tracks_distance_from_start() {
        // 90 -> 80, currently 85.
        let g = goal(GoalType::TargetWeight, 90.0, 85.0, 80.0);
        assert_eq!(progress_percentage(&g), 50.0);

        // Gained instead of lost.
        let g = goal(GoalType::TargetWeight, 90.0, 92.0, 80.0);
        assert_eq!(progress_percentage(&g), 0.0);
    }

    #[test]
    fn weight_gain_percentage_tracks_distance_from_start() {
        let g = goal(GoalType::TargetWeight, 60.0, 63.0, 70.0);
        assert!((progress_percentage(&g) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn weight_goal_completion_respects_direction() {
        let losing = goal(GoalType::TargetWeight, 90.0, 90.0, 80.0);
        assert!(weight_goal_reached(&losing, 79.5));
        assert!(!weight_goal_reached(&losing, 81.0));

        let gaining = goal(GoalType::TargetWeight, 60.0, 60.0, 70.0);
        assert!(weight_goal_reached(&gaining, 70.0));
        assert!(!weight_goal_reached(&gaining, 65.0));
    }

    #[test]
    fn best_lift_takes_heaviest_matching_set() {
        let workout = workout_with(&[
            ("Bench Press", Some(80.0)),
            ("Squat", Some(140.0)),
            ("Bench Press", Some(85.0)),
            ("Bench Press", None),
        ]);
        assert_eq!(best_lift(&workout, "Bench Press"), Some(85.0));
        assert_eq!(best_lift(&workout, "Deadlift"), None);
    }

    #[test]
    fn exercise_progress_only_moves_up() {
        let mut g = goal(GoalType::ExerciseWeight, 0.0, 90.0, 100.0);
        let workout = workout_with(&[("Bench Press", Some(85.0))]);
        assert_eq!(exercise_weight_progress(&g, &workout), None);

        g.current_value = 80.0;
        assert_eq!(exercise_weight_progress(&g, &workout), Some((85.0, false)));

        let heavy = workout_with(&[("Bench Press", Some(100.0))]);
        assert_eq!(exercise_weight_progress(&g, &heavy), Some((100.0, true)));
    }

    proptest! {
        #[test]
        fn percentage_is_always_clamped(
            start in 0.0f64..300.0,
            current in 0.0f64..300.0,
            target in 0.0f64..300.0,
            kind in 0usize..3,
        ) {
            let goal_type = [GoalType::TargetWeight, GoalType::WorkoutCount, GoalType::ExerciseWeight][kind];
            let pct = progress_percentage(&goal(goal_type, start, current, target));
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}

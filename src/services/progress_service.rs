use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::config::tracker::MAX_WINDOW_DAYS;
use crate::error::{Result, TrackerError};
use crate::models::{ActiveDay, DateRange, ExerciseProgress, ProgressReport, Workout};
use crate::store::FitnessStore;

/// Build a progress report from the workouts inside a `window_days` window.
pub fn summarize_progress(workouts: &[Workout], window_days: i64) -> ProgressReport {
    let mut chronological: Vec<&Workout> = workouts.iter().collect();
    chronological.sort_by_key(|w| w.date);

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for workout in &chronological {
        *per_day.entry(workout.date.date_naive()).or_default() += 1;
    }
    // Ties resolve to the earliest day.
    let most_active_day = per_day
        .iter()
        .fold(None::<ActiveDay>, |best, (date, count)| match best {
            Some(b) if b.workouts >= *count => Some(b),
            _ => Some(ActiveDay {
                date: *date,
                workouts: *count,
            }),
        });

    let mut order: Vec<&str> = Vec::new();
    let mut lifts: HashMap<&str, Vec<f64>> = HashMap::new();
    for workout in &chronological {
        for exercise in &workout.exercises {
            if let Some(weight) = exercise.weight_kg {
                let entries = lifts.entry(exercise.name.as_str()).or_insert_with(|| {
                    order.push(exercise.name.as_str());
                    Vec::new()
                });
                entries.push(weight);
            }
        }
    }

    let exercise_progress = order
        .into_iter()
        .filter_map(|name| {
            let weights = lifts.get(name)?;
            if weights.len() < 2 {
                return None;
            }
            let initial_weight = weights[0];
            let current_weight = weights[weights.len() - 1];
            Some(ExerciseProgress {
                exercise_name: name.to_string(),
                initial_weight,
                current_weight,
                personal_best: weights.iter().copied().fold(f64::MIN, f64::max),
                change: current_weight - initial_weight,
            })
        })
        .collect();

    let weeks = window_days as f64 / 7.0;
    let total_workouts = workouts.len();

    ProgressReport {
        window_days,
        total_workouts,
        average_per_week: if weeks > 0.0 { total_workouts as f64 / weeks } else { 0.0 },
        most_active_day,
        exercise_progress,
    }
}

#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn FitnessStore>,
    default_window_days: i64,
}

impl ProgressService {
    pub fn new(store: Arc<dyn FitnessStore>, default_window_days: i64) -> Self {
        Self {
            store,
            default_window_days,
        }
    }

    #[instrument(skip(self))]
    pub async fn report(
        &self,
        user_id: Uuid,
        window_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<ProgressReport> {
        let window_days = window_days.unwrap_or(self.default_window_days);
        if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(TrackerError::Validation(format!(
                "window must be between 1 and {MAX_WINDOW_DAYS} days, got {window_days}"
            )));
        }

        let workouts = self
            .store
            .list_workouts(user_id, DateRange::since(now - Duration::days(window_days)), None)
            .await?;

        Ok(summarize_progress(&workouts, window_days))
    }
}

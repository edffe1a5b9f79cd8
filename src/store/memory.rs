use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::FitnessStore;
use crate::error::{Result, TrackerError};
use crate::models::{
    Achievement, DateRange, Exercise, Goal, GoalFilter, MotivationalQuote, NewAchievement,
    NewGoal, NewPlan, NewStreak, NewUser, NewWorkout, PlanExercise, Streak, UpdateProfileRequest,
    User, WeightEntry, Workout, WorkoutPlan,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    weight_entries: Vec<WeightEntry>,
    workouts: Vec<Workout>,
    exercise_options: BTreeSet<String>,
    streaks: Vec<Streak>,
    goals: Vec<Goal>,
    achievements: Vec<Achievement>,
    plans: Vec<WorkoutPlan>,
    quotes: Vec<MotivationalQuote>,
}

/// Process-local store. All state lives behind one lock, so each call is
/// atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn take_limit<T>(items: Vec<T>, limit: Option<i64>) -> Vec<T> {
    match limit {
        Some(limit) => items.into_iter().take(limit.max(0) as usize).collect(),
        None => items,
    }
}

#[async_trait]
impl FitnessStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(TrackerError::Validation(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: None,
            height_cm: None,
            weight_kg: None,
            age: None,
            gender: None,
            fitness_goal: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&user_id) else {
            return Ok(None);
        };

        if update.name.is_some() {
            user.name = update.name;
        }
        if update.height_cm.is_some() {
            user.height_cm = update.height_cm;
        }
        if update.weight_kg.is_some() {
            user.weight_kg = update.weight_kg;
        }
        if update.age.is_some() {
            user.age = update.age;
        }
        if update.gender.is_some() {
            user.gender = update.gender;
        }
        if update.fitness_goal.is_some() {
            user.fitness_goal = update.fitness_goal;
        }
        user.updated_at = now;

        Ok(Some(user.clone()))
    }

    async fn insert_weight_entry(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<WeightEntry> {
        let entry = WeightEntry {
            id: Uuid::new_v4(),
            user_id,
            weight_kg,
            recorded_at,
        };
        self.state.write().await.weight_entries.push(entry.clone());
        Ok(entry)
    }

    async fn recent_weight_entries(&self, user_id: Uuid, limit: i64) -> Result<Vec<WeightEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<_> = state
            .weight_entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(take_limit(entries, Some(limit)))
    }

    async fn insert_workout(&self, workout: NewWorkout) -> Result<Workout> {
        let workout_id = Uuid::new_v4();
        let exercises = workout
            .exercises
            .into_iter()
            .map(|e| Exercise {
                id: Uuid::new_v4(),
                workout_id,
                name: e.name,
                sets: e.sets,
                reps: e.reps,
                weight_kg: e.weight_kg,
            })
            .collect();

        let workout = Workout {
            id: workout_id,
            user_id: workout.user_id,
            date: workout.date,
            duration_minutes: workout.duration_minutes,
            workout_type: workout.workout_type,
            notes: workout.notes,
            created_at: Utc::now(),
            exercises,
        };
        self.state.write().await.workouts.push(workout.clone());
        Ok(workout)
    }

    async fn list_workouts(
        &self,
        user_id: Uuid,
        range: DateRange,
        limit: Option<i64>,
    ) -> Result<Vec<Workout>> {
        let state = self.state.read().await;
        let mut workouts: Vec<_> = state
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && range.contains(w.date))
            .cloned()
            .collect();
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(take_limit(workouts, limit))
    }

    async fn count_workouts(&self, user_id: Uuid, range: DateRange) -> Result<i64> {
        let state = self.state.read().await;
        let count = state
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && range.contains(w.date))
            .count();
        Ok(count as i64)
    }

    async fn ensure_exercise_option(&self, name: &str) -> Result<()> {
        self.state
            .write()
            .await
            .exercise_options
            .insert(name.to_string());
        Ok(())
    }

    async fn list_exercise_options(&self) -> Result<Vec<String>> {
        Ok(self
            .state
            .read()
            .await
            .exercise_options
            .iter()
            .cloned()
            .collect())
    }

    async fn latest_streak(&self, user_id: Uuid) -> Result<Option<Streak>> {
        let state = self.state.read().await;
        Ok(state
            .streaks
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.end_date)
            .cloned())
    }

    async fn insert_streak(&self, streak: NewStreak) -> Result<Streak> {
        let streak = Streak {
            id: Uuid::new_v4(),
            user_id: streak.user_id,
            start_date: streak.start_date,
            end_date: streak.end_date,
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
        };
        self.state.write().await.streaks.push(streak.clone());
        Ok(streak)
    }

    async fn update_streak(&self, streak: &Streak) -> Result<()> {
        let mut state = self.state.write().await;
        let existing = state
            .streaks
            .iter_mut()
            .find(|s| s.id == streak.id)
            .ok_or_else(|| TrackerError::NotFound(format!("streak {}", streak.id)))?;
        *existing = streak.clone();
        Ok(())
    }

    async fn insert_goal(&self, goal: NewGoal) -> Result<Goal> {
        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: goal.user_id,
            title: goal.title,
            description: goal.description,
            goal_type: goal.goal_type,
            target_value: goal.target_value,
            current_value: goal.current_value,
            start_value: goal.start_value,
            exercise_name: goal.exercise_name,
            start_date: goal.start_date,
            target_date: goal.target_date,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.state.write().await.goals.push(goal.clone());
        Ok(goal)
    }

    async fn list_goals(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>> {
        let state = self.state.read().await;
        let mut goals: Vec<_> = state
            .goals
            .iter()
            .filter(|g| g.user_id == user_id && filter.matches(g))
            .cloned()
            .collect();
        goals.sort_by(|a, b| match (a.target_date, b.target_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.created_at.cmp(&b.created_at),
        });
        Ok(goals)
    }

    async fn update_goal_progress(
        &self,
        goal_id: Uuid,
        current_value: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<Goal>> {
        let mut state = self.state.write().await;
        let Some(goal) = state
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id && !g.completed)
        else {
            return Ok(None);
        };

        goal.current_value = current_value;
        goal.completed = completed;
        goal.updated_at = now;
        Ok(Some(goal.clone()))
    }

    async fn find_achievement(&self, user_id: Uuid, title: &str) -> Result<Option<Achievement>> {
        let state = self.state.read().await;
        Ok(state
            .achievements
            .iter()
            .find(|a| a.user_id == user_id && a.title == title)
            .cloned())
    }

    async fn insert_achievement_if_absent(
        &self,
        achievement: NewAchievement,
    ) -> Result<Option<Achievement>> {
        let mut state = self.state.write().await;
        if state
            .achievements
            .iter()
            .any(|a| a.user_id == achievement.user_id && a.title == achievement.title)
        {
            return Ok(None);
        }

        let achievement = Achievement {
            id: Uuid::new_v4(),
            user_id: achievement.user_id,
            title: achievement.title,
            description: achievement.description,
            earned_at: achievement.earned_at,
        };
        state.achievements.push(achievement.clone());
        Ok(Some(achievement))
    }

    async fn list_achievements(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Achievement>> {
        let state = self.state.read().await;
        // Stable sort keeps insertion order among equal timestamps; reverse it
        // so the most recently awarded comes first.
        let mut achievements: Vec<_> = state
            .achievements
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        achievements.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));
        Ok(take_limit(achievements, limit))
    }

    async fn insert_plan(&self, plan: NewPlan) -> Result<WorkoutPlan> {
        let plan_id = Uuid::new_v4();
        let plan = WorkoutPlan {
            id: plan_id,
            user_id: plan.user_id,
            name: plan.name,
            description: plan.description,
            created_at: Utc::now(),
            exercises: plan
                .exercises
                .into_iter()
                .map(|e| PlanExercise {
                    id: Uuid::new_v4(),
                    plan_id,
                    name: e.name,
                    sets: e.sets,
                    reps: e.reps,
                    weight_kg: e.weight_kg,
                })
                .collect(),
        };
        self.state.write().await.plans.push(plan.clone());
        Ok(plan)
    }

    async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        let state = self.state.read().await;
        Ok(state
            .plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        let state = self.state.read().await;
        Ok(state
            .plans
            .iter()
            .find(|p| p.id == plan_id && p.user_id == user_id)
            .cloned())
    }

    async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.plans.len();
        state
            .plans
            .retain(|p| !(p.id == plan_id && p.user_id == user_id));
        Ok(state.plans.len() < before)
    }

    async fn ensure_quote(&self, quote: &str, author: Option<String>) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.quotes.iter().any(|q| q.quote == quote) {
            state.quotes.push(MotivationalQuote {
                id: Uuid::new_v4(),
                quote: quote.to_string(),
                author,
                date_displayed: None,
            });
        }
        Ok(())
    }

    async fn next_quote(&self, now: DateTime<Utc>) -> Result<Option<MotivationalQuote>> {
        let mut state = self.state.write().await;
        // `None` sorts before any timestamp; ties keep insertion order.
        let Some(quote) = state.quotes.iter_mut().min_by_key(|q| q.date_displayed) else {
            return Ok(None);
        };
        quote.date_displayed = Some(now);
        Ok(Some(quote.clone()))
    }
}

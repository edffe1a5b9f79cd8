use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::FitnessStore;
use crate::error::Result;
use crate::models::{
    Achievement, DateRange, Exercise, Goal, GoalFilter, MotivationalQuote, NewAchievement,
    NewGoal, NewPlan, NewStreak, NewUser, NewWorkout, PlanExercise, Streak, UpdateProfileRequest,
    User, WeightEntry, Workout, WorkoutPlan,
};

const USER_COLUMNS: &str = "id, email, password_hash, name, height_cm, weight_kg, age, gender, \
     fitness_goal, created_at, updated_at";

const GOAL_COLUMNS: &str = "id, user_id, title, description, goal_type, target_value, \
     current_value, start_value, exercise_name, start_date, target_date, completed, created_at, \
     updated_at";

#[derive(Clone)]
pub struct PgFitnessStore {
    db: PgPool,
}

impl PgFitnessStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn attach_exercises(&self, mut workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        if workouts.is_empty() {
            return Ok(workouts);
        }

        let ids: Vec<Uuid> = workouts.iter().map(|w| w.id).collect();
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, workout_id, name, sets, reps, weight_kg FROM exercises \
             WHERE workout_id = ANY($1) ORDER BY position",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_workout: HashMap<Uuid, Vec<Exercise>> = HashMap::new();
        for exercise in exercises {
            by_workout.entry(exercise.workout_id).or_default().push(exercise);
        }
        for workout in &mut workouts {
            workout.exercises = by_workout.remove(&workout.id).unwrap_or_default();
        }

        Ok(workouts)
    }

    async fn attach_plan_exercises(&self, mut plans: Vec<WorkoutPlan>) -> Result<Vec<WorkoutPlan>> {
        if plans.is_empty() {
            return Ok(plans);
        }

        let ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
        let exercises = sqlx::query_as::<_, PlanExercise>(
            "SELECT id, plan_id, name, sets, reps, weight_kg FROM plan_exercises \
             WHERE plan_id = ANY($1) ORDER BY position",
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_plan: HashMap<Uuid, Vec<PlanExercise>> = HashMap::new();
        for exercise in exercises {
            by_plan.entry(exercise.plan_id).or_default().push(exercise);
        }
        for plan in &mut plans {
            plan.exercises = by_plan.remove(&plan.id).unwrap_or_default();
        }

        Ok(plans)
    }
}

#[async_trait]
impl FitnessStore for PgFitnessStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $3) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                height_cm = COALESCE($3, height_cm),
                weight_kg = COALESCE($4, weight_kg),
                age = COALESCE($5, age),
                gender = COALESCE($6, gender),
                fitness_goal = COALESCE($7, fitness_goal),
                updated_at = $8
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(update.name)
            .bind(update.height_cm)
            .bind(update.weight_kg)
            .bind(update.age)
            .bind(update.gender)
            .bind(update.fitness_goal)
            .bind(now)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn insert_weight_entry(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<WeightEntry> {
        let entry = sqlx::query_as::<_, WeightEntry>(
            "INSERT INTO weight_history (user_id, weight_kg, recorded_at) VALUES ($1, $2, $3) \
             RETURNING id, user_id, weight_kg, recorded_at",
        )
        .bind(user_id)
        .bind(weight_kg)
        .bind(recorded_at)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    async fn recent_weight_entries(&self, user_id: Uuid, limit: i64) -> Result<Vec<WeightEntry>> {
        let entries = sqlx::query_as::<_, WeightEntry>(
            "SELECT id, user_id, weight_kg, recorded_at FROM weight_history \
             WHERE user_id = $1 ORDER BY recorded_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn insert_workout(&self, workout: NewWorkout) -> Result<Workout> {
        let mut tx = self.db.begin().await?;

        let mut saved = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (user_id, date, duration_minutes, workout_type, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, date, duration_minutes, workout_type, notes, created_at
            "#,
        )
        .bind(workout.user_id)
        .bind(workout.date)
        .bind(workout.duration_minutes)
        .bind(&workout.workout_type)
        .bind(&workout.notes)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for (position, exercise) in workout.exercises.iter().enumerate() {
            let row = sqlx::query_as::<_, Exercise>(
                r#"
                INSERT INTO exercises (workout_id, position, name, sets, reps, weight_kg)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, workout_id, name, sets, reps, weight_kg
                "#,
            )
            .bind(saved.id)
            .bind(position as i32)
            .bind(&exercise.name)
            .bind(exercise.sets)
            .bind(exercise.reps)
            .bind(exercise.weight_kg)
            .fetch_one(&mut *tx)
            .await?;
            saved.exercises.push(row);
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn list_workouts(
        &self,
        user_id: Uuid,
        range: DateRange,
        limit: Option<i64>,
    ) -> Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, date, duration_minutes, workout_type, notes, created_at
            FROM workouts
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            ORDER BY date DESC, created_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        self.attach_exercises(workouts).await
    }

    async fn count_workouts(&self, user_id: Uuid, range: DateRange) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM workouts
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn ensure_exercise_option(&self, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO exercise_options (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn list_exercise_options(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar("SELECT name FROM exercise_options ORDER BY name ASC")
            .fetch_all(&self.db)
            .await?;

        Ok(names)
    }

    async fn latest_streak(&self, user_id: Uuid) -> Result<Option<Streak>> {
        let streak = sqlx::query_as::<_, Streak>(
            r#"
            SELECT id, user_id, start_date, end_date, current_streak, longest_streak
            FROM streaks
            WHERE user_id = $1
            ORDER BY end_date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(streak)
    }

    async fn insert_streak(&self, streak: NewStreak) -> Result<Streak> {
        let streak = sqlx::query_as::<_, Streak>(
            r#"
            INSERT INTO streaks (user_id, start_date, end_date, current_streak, longest_streak)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, start_date, end_date, current_streak, longest_streak
            "#,
        )
        .bind(streak.user_id)
        .bind(streak.start_date)
        .bind(streak.end_date)
        .bind(streak.current_streak)
        .bind(streak.longest_streak)
        .fetch_one(&self.db)
        .await?;

        Ok(streak)
    }

    async fn update_streak(&self, streak: &Streak) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE streaks
            SET start_date = $2, end_date = $3, current_streak = $4, longest_streak = $5
            WHERE id = $1
            "#,
        )
        .bind(streak.id)
        .bind(streak.start_date)
        .bind(streak.end_date)
        .bind(streak.current_streak)
        .bind(streak.longest_streak)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn insert_goal(&self, goal: NewGoal) -> Result<Goal> {
        let sql = format!(
            r#"
            INSERT INTO goals (
                user_id, title, description, goal_type, target_value, current_value,
                start_value, exercise_name, start_date, target_date, completed,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $11)
            RETURNING {GOAL_COLUMNS}
            "#
        );
        let goal = sqlx::query_as::<_, Goal>(&sql)
            .bind(goal.user_id)
            .bind(&goal.title)
            .bind(&goal.description)
            .bind(goal.goal_type)
            .bind(goal.target_value)
            .bind(goal.current_value)
            .bind(goal.start_value)
            .bind(&goal.exercise_name)
            .bind(goal.start_date)
            .bind(goal.target_date)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await?;

        Ok(goal)
    }

    async fn list_goals(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>> {
        let sql = format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM goals
            WHERE user_id = $1
              AND ($2::boolean IS NULL OR completed = $2)
              AND ($3::goal_type IS NULL OR goal_type = $3)
            ORDER BY target_date ASC NULLS LAST, created_at ASC
            "#
        );
        let goals = sqlx::query_as::<_, Goal>(&sql)
            .bind(user_id)
            .bind(filter.completed)
            .bind(filter.goal_type)
            .fetch_all(&self.db)
            .await?;

        Ok(goals)
    }

    async fn update_goal_progress(
        &self,
        goal_id: Uuid,
        current_value: f64,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<Goal>> {
        let sql = format!(
            r#"
            UPDATE goals
            SET current_value = $2, completed = $3, updated_at = $4
            WHERE id = $1 AND completed = FALSE
            RETURNING {GOAL_COLUMNS}
            "#
        );
        let goal = sqlx::query_as::<_, Goal>(&sql)
            .bind(goal_id)
            .bind(current_value)
            .bind(completed)
            .bind(now)
            .fetch_optional(&self.db)
            .await?;

        Ok(goal)
    }

    async fn find_achievement(&self, user_id: Uuid, title: &str) -> Result<Option<Achievement>> {
        let achievement = sqlx::query_as::<_, Achievement>(
            "SELECT id, user_id, title, description, earned_at FROM achievements \
             WHERE user_id = $1 AND title = $2",
        )
        .bind(user_id)
        .bind(title)
        .fetch_optional(&self.db)
        .await?;

        Ok(achievement)
    }

    async fn insert_achievement_if_absent(
        &self,
        achievement: NewAchievement,
    ) -> Result<Option<Achievement>> {
        let achievement = sqlx::query_as::<_, Achievement>(
            r#"
            INSERT INTO achievements (user_id, title, description, earned_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, title) DO NOTHING
            RETURNING id, user_id, title, description, earned_at
            "#,
        )
        .bind(achievement.user_id)
        .bind(&achievement.title)
        .bind(&achievement.description)
        .bind(achievement.earned_at)
        .fetch_optional(&self.db)
        .await?;

        Ok(achievement)
    }

    async fn list_achievements(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Achievement>> {
        let achievements = sqlx::query_as::<_, Achievement>(
            r#"
            SELECT id, user_id, title, description, earned_at
            FROM achievements
            WHERE user_id = $1
            ORDER BY earned_at DESC, created_seq DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(achievements)
    }

    async fn insert_plan(&self, plan: NewPlan) -> Result<WorkoutPlan> {
        let mut tx = self.db.begin().await?;

        let mut saved = sqlx::query_as::<_, WorkoutPlan>(
            r#"
            INSERT INTO workout_plans (user_id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, description, created_at
            "#,
        )
        .bind(plan.user_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for (position, exercise) in plan.exercises.iter().enumerate() {
            let row = sqlx::query_as::<_, PlanExercise>(
                r#"
                INSERT INTO plan_exercises (plan_id, position, name, sets, reps, weight_kg)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, plan_id, name, sets, reps, weight_kg
                "#,
            )
            .bind(saved.id)
            .bind(position as i32)
            .bind(&exercise.name)
            .bind(exercise.sets)
            .bind(exercise.reps)
            .bind(exercise.weight_kg)
            .fetch_one(&mut *tx)
            .await?;
            saved.exercises.push(row);
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        let plans = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT id, user_id, name, description, created_at FROM workout_plans \
             WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        self.attach_plan_exercises(plans).await
    }

    async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        let plan = sqlx::query_as::<_, WorkoutPlan>(
            "SELECT id, user_id, name, description, created_at FROM workout_plans \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(plan) = plan else {
            return Ok(None);
        };
        Ok(self.attach_plan_exercises(vec![plan]).await?.pop())
    }

    async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workout_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_quote(&self, quote: &str, author: Option<String>) -> Result<()> {
        sqlx::query(
            "INSERT INTO motivational_quotes (quote, author) VALUES ($1, $2) \
             ON CONFLICT (quote) DO NOTHING",
        )
        .bind(quote)
        .bind(author)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn next_quote(&self, now: DateTime<Utc>) -> Result<Option<MotivationalQuote>> {
        let quote = sqlx::query_as::<_, MotivationalQuote>(
            r#"
            UPDATE motivational_quotes
            SET date_displayed = $1
            WHERE id = (
                SELECT id FROM motivational_quotes
                ORDER BY date_displayed ASC NULLS FIRST, id
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, quote, author, date_displayed
            "#,
        )
        .bind(now)
        .fetch_optional(&self.db)
        .await?;

        Ok(quote)
    }
}

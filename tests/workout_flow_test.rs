mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use pretty_assertions::assert_eq;

use common::{base_time, days_after_base, MockDataGenerator, TestContext};
use nutrisync::models::DateRange;
use nutrisync::store::FitnessStore;
use nutrisync::TrackerError;

#[tokio::test]
async fn first_workout_starts_streak_and_unlocks_first_achievement() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    let outcome = ctx
        .log_at(
            user.id,
            MockDataGenerator::strength_workout(&[("Squat", Some(100.0)), ("Bench Press", Some(70.0))]),
            base_time(),
        )
        .await;

    let streak = outcome.streak.expect("streak recorded");
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.longest_streak, 1);

    let titles: Vec<_> = outcome.new_achievements.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["First Workout"]);

    assert_eq!(outcome.workout.exercises.len(), 2);
    assert_eq!(
        ctx.state.workouts.exercise_options().await.unwrap(),
        vec!["Bench Press".to_string(), "Squat".to_string()]
    );
}

#[tokio::test]
async fn streak_extends_then_restarts_after_a_long_gap() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    for day in 0..3 {
        ctx.log_at(user.id, MockDataGenerator::workout(30), days_after_base(day)).await;
    }
    let streak = ctx.state.dashboard.summary(user.id, days_after_base(2)).await.unwrap();
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.longest_streak, 3);

    // Gap of three calendar days with a two-day interval.
    let outcome = ctx.log_at(user.id, MockDataGenerator::workout(30), days_after_base(5)).await;
    let streak = outcome.streak.unwrap();
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.longest_streak, 3);
    assert_eq!(streak.start_date, days_after_base(5));
}

#[tokio::test]
async fn skipping_one_day_keeps_the_streak() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    ctx.log_at(user.id, MockDataGenerator::workout(30), days_after_base(0)).await;
    let outcome = ctx.log_at(user.id, MockDataGenerator::workout(30), days_after_base(2)).await;

    assert_eq!(outcome.streak.unwrap().current_streak, 2);
}

#[tokio::test]
async fn second_workout_on_the_same_day_leaves_streak_alone() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    let first = ctx.log_at(user.id, MockDataGenerator::workout(30), base_time()).await;
    let second = ctx
        .log_at(user.id, MockDataGenerator::workout(30), base_time() + Duration::hours(8))
        .await;

    let (first, second) = (first.streak.unwrap(), second.streak.unwrap());
    assert_eq!(first.id, second.id);
    assert_eq!(second.current_streak, 1);
    assert_eq!(second.end_date, base_time());
}

#[tokio::test]
async fn rejected_workout_writes_nothing() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    let mut request = MockDataGenerator::workout(30);
    request.workout_type = "   ".to_string();

    let result = ctx.state.workouts.log_workout(user.id, request, base_time()).await;
    assert_matches!(result, Err(TrackerError::MissingField("workout_type")));

    assert_eq!(ctx.store.count_workouts(user.id, DateRange::all()).await.unwrap(), 0);
    assert!(ctx.store.latest_streak(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_saves_award_each_achievement_once() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let workouts = ctx.state.workouts.clone();
            let user_id = user.id;
            tokio::spawn(async move {
                workouts
                    .log_workout(user_id, MockDataGenerator::workout(20), base_time())
                    .await
            })
        })
        .collect();

    let mut awarded = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        awarded.extend(outcome.new_achievements.into_iter().map(|a| a.title));
    }
    awarded.sort();

    // Five workouts in one week: First Workout, Getting Started, Weekly Warrior, Five-Star Week.
    assert_eq!(
        awarded,
        vec!["First Workout", "Five-Star Week", "Getting Started", "Weekly Warrior"]
    );
    assert_eq!(ctx.store.count_workouts(user.id, DateRange::all()).await.unwrap(), 5);
    assert_eq!(
        ctx.store.latest_streak(user.id).await.unwrap().unwrap().current_streak,
        1
    );
}

#[tokio::test]
async fn history_is_newest_first_and_limited() {
    let ctx = TestContext::new();
    let user = ctx.create_user().await;

    for day in 0..4 {
        ctx.log_at(user.id, MockDataGenerator::workout(30 + day as i32), days_after_base(day)).await;
    }

    let history = ctx.state.workouts.history(user.id, Some(2)).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, days_after_base(3));
    assert_eq!(history[1].date, days_after_base(2));
}

//! Milestone tables for achievements
//!
//! Each family is an ordered list of thresholds. A milestone is reached when
//! the family's metric is at or above its threshold.

use serde::{Deserialize, Serialize};

/// Metric a milestone family is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneFamily {
    /// Total number of logged workouts
    TotalWorkouts,
    /// Length of the user's current streak
    StreakLength,
    /// Number of distinct exercise names ever logged
    ExerciseVariety,
    /// Workouts in the trailing week
    WeeklyVolume,
    /// Duration of any single workout, in minutes
    WorkoutDuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub threshold: u32,
    pub title: String,
    /// `{n}` is replaced with the threshold.
    pub description_template: String,
}

impl Milestone {
    pub fn new(threshold: u32, title: &str, description_template: &str) -> Self {
        Self {
            threshold,
            title: title.to_string(),
            description_template: description_template.to_string(),
        }
    }

    pub fn description(&self) -> String {
        self.description_template
            .replace("{n}", &self.threshold.to_string())
    }

    pub fn is_reached(&self, value: u32) -> bool {
        value >= self.threshold
    }
}

fn table(entries: &[(u32, &str)], description_template: &str) -> Vec<Milestone> {
    entries
        .iter()
        .map(|(threshold, title)| Milestone::new(*threshold, title, description_template))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneTables {
    pub total_workouts: Vec<Milestone>,
    pub streak_length: Vec<Milestone>,
    pub exercise_variety: Vec<Milestone>,
    pub weekly_volume: Vec<Milestone>,
    pub workout_duration: Vec<Milestone>,
}

impl MilestoneTables {
    pub fn empty() -> Self {
        Self {
            total_workouts: Vec::new(),
            streak_length: Vec::new(),
            exercise_variety: Vec::new(),
            weekly_volume: Vec::new(),
            workout_duration: Vec::new(),
        }
    }

    pub fn family(&self, family: MilestoneFamily) -> &[Milestone] {
        match family {
            MilestoneFamily::TotalWorkouts => &self.total_workouts,
            MilestoneFamily::StreakLength => &self.streak_length,
            MilestoneFamily::ExerciseVariety => &self.exercise_variety,
            MilestoneFamily::WeeklyVolume => &self.weekly_volume,
            MilestoneFamily::WorkoutDuration => &self.workout_duration,
        }
    }

    /// Milestones of `family` reached by `value`, in table order.
    pub fn reached(&self, family: MilestoneFamily, value: u32) -> impl Iterator<Item = &Milestone> {
        self.family(family)
            .iter()
            .filter(move |milestone| milestone.is_reached(value))
    }
}

impl Default for MilestoneTables {
    fn default() -> Self {
        Self {
            total_workouts: table(
                &[
                    (1, "First Workout"),
                    (5, "Getting Started"),
                    (10, "Dedicated Athlete"),
                    (25, "Fitness Enthusiast"),
                    (50, "Workout Warrior"),
                    (100, "Centurion"),
                    (200, "Double Centurion"),
                    (365, "Year-Round Athlete"),
                ],
                "Completed {n} workouts!",
            ),
            streak_length: table(
                &[
                    (3, "Three-Day Streak"),
                    (7, "Week Warrior"),
                    (14, "Two-Week Terror"),
                    (30, "Monthly Master"),
                    (60, "Consistency King"),
                    (90, "Quarterly Champion"),
                    (180, "Half-Year Hero"),
                    (365, "Year of Dedication"),
                ],
                "Maintained a {n}-day workout streak!",
            ),
            exercise_variety: table(
                &[
                    (5, "Jack of All Trades"),
                    (10, "Exercise Explorer"),
                    (20, "Variety Virtuoso"),
                    (30, "Master of Many"),
                ],
                "Performed {n} different exercises!",
            ),
            weekly_volume: table(
                &[(3, "Weekly Warrior"), (5, "Five-Star Week")],
                "Completed {n} or more workouts in a week!",
            ),
            workout_duration: table(
                &[
                    (60, "Hour Champion"),
                    (90, "Endurance Explorer"),
                    (120, "Marathon Trainer"),
                ],
                "Completed a {n}-minute workout!",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_render_threshold() {
        let tables = MilestoneTables::default();
        assert_eq!(tables.total_workouts[2].description(), "Completed 10 workouts!");
        assert_eq!(
            tables.weekly_volume[0].description(),
            "Completed 3 or more workouts in a week!"
        );
        assert_eq!(
            tables.workout_duration[0].description(),
            "Completed a 60-minute workout!"
        );
    }

    #[test]
    fn reached_is_threshold_inclusive_and_ordered() {
        let tables = MilestoneTables::default();
        let titles: Vec<_> = tables
            .reached(MilestoneFamily::StreakLength, 7)
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Three-Day Streak", "Week Warrior"]);

        assert_eq!(tables.reached(MilestoneFamily::ExerciseVariety, 4).count(), 0);
    }
}

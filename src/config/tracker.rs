use anyhow::Result;
use std::env;
use std::ops::RangeInclusive;

/// Longest reporting window, in days, any read model accepts.
pub const MAX_WINDOW_DAYS: i64 = 3650;
/// Largest page of workouts or achievements a single read returns.
pub const MAX_LIST_LIMIT: i64 = 100;

const STREAK_INTERVAL_RANGE: RangeInclusive<i64> = 1..=365;
const WINDOW_RANGE: RangeInclusive<i64> = 1..=MAX_WINDOW_DAYS;
const LIST_LIMIT_RANGE: RangeInclusive<i64> = 1..=MAX_LIST_LIMIT;

/// Tuning knobs for the evaluators and read models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Maximum gap, in calendar days, between workouts that keeps a streak alive.
    pub streak_interval_days: i64,
    pub weekly_window_days: i64,
    pub progress_window_days: i64,
    pub dashboard_recent_workouts: i64,
    pub dashboard_recent_achievements: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            streak_interval_days: 2,
            weekly_window_days: 7,
            progress_window_days: 30,
            dashboard_recent_workouts: 5,
            dashboard_recent_achievements: 3,
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let read = |key: &str, default: i64, range: RangeInclusive<i64>| {
            parse_in_range(key, lookup(key), default, range)
        };

        Ok(Self {
            streak_interval_days: read(
                "STREAK_INTERVAL_DAYS",
                defaults.streak_interval_days,
                STREAK_INTERVAL_RANGE,
            )?,
            weekly_window_days: read(
                "WEEKLY_WINDOW_DAYS",
                defaults.weekly_window_days,
                WINDOW_RANGE,
            )?,
            progress_window_days: read(
                "PROGRESS_WINDOW_DAYS",
                defaults.progress_window_days,
                WINDOW_RANGE,
            )?,
            dashboard_recent_workouts: read(
                "DASHBOARD_RECENT_WORKOUTS",
                defaults.dashboard_recent_workouts,
                LIST_LIMIT_RANGE,
            )?,
            dashboard_recent_achievements: read(
                "DASHBOARD_RECENT_ACHIEVEMENTS",
                defaults.dashboard_recent_achievements,
                LIST_LIMIT_RANGE,
            )?,
        })
    }
}

fn parse_in_range(
    key: &str,
    raw: Option<String>,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{key} must be an integer: {e}"))?;
    if !range.contains(&value) {
        anyhow::bail!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        );
    }
    Ok(value)
}

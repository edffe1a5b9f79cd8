use std::sync::Arc;

use anyhow::Result;

use crate::store::FitnessStore;

/// Exercise names offered before any user has logged one.
pub const DEFAULT_EXERCISES: [&str; 16] = [
    "Bench Press",
    "Squat",
    "Deadlift",
    "Overhead Press",
    "Barbell Row",
    "Pull-up",
    "Dip",
    "Leg Press",
    "Lat Pulldown",
    "Bicep Curl",
    "Tricep Extension",
    "Leg Curl",
    "Leg Extension",
    "Calf Raise",
    "Shoulder Press",
    "Lateral Raise",
];

/// Quotes rotated through the dashboard, as `(quote, author)`.
pub const DEFAULT_QUOTES: [(&str, Option<&str>); 5] = [
    ("Stay consistent, stay strong!", None),
    ("The only bad workout is the one that didn't happen.", None),
    (
        "Strength does not come from winning. Your struggles develop your strengths.",
        Some("Arnold Schwarzenegger"),
    ),
    ("It never gets easier, you just get better.", None),
    ("Start where you are. Use what you have. Do what you can.", Some("Arthur Ashe")),
];

pub struct CatalogSeeder {
    store: Arc<dyn FitnessStore>,
}

impl CatalogSeeder {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self { store }
    }

    /// Registers the default exercise catalog. Existing names are left as they are.
    pub async fn seed_exercise_catalog(&self) -> Result<()> {
        tracing::info!("Seeding exercise catalog...");

        for name in DEFAULT_EXERCISES {
            self.store.ensure_exercise_option(name).await?;
        }

        tracing::info!(count = DEFAULT_EXERCISES.len(), "Exercise catalog seeded");
        Ok(())
    }

    /// Registers the default motivational quotes. Known quotes keep their
    /// display history.
    pub async fn seed_quotes(&self) -> Result<()> {
        for (quote, author) in DEFAULT_QUOTES {
            self.store
                .ensure_quote(quote, author.map(str::to_string))
                .await?;
        }

        tracing::info!(count = DEFAULT_QUOTES.len(), "Motivational quotes seeded");
        Ok(())
    }
}

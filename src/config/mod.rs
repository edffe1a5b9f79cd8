pub mod app;
pub mod database;
pub mod seeding;
pub mod tracker;

pub use app::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
pub use seeding::CatalogSeeder;
pub use tracker::TrackerConfig;

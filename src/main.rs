use std::sync::Arc;

use nutrisync::api::{routes::create_routes, AppState};
use nutrisync::config::{run_migrations, AppConfig, CatalogSeeder, DatabaseConfig, TrackerConfig};
use nutrisync::store::{FitnessStore, InMemoryStore, PgFitnessStore};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_level)),
        )
        .init();

    if app_config.is_development() {
        info!("Running in development mode");
    }

    let db_config = DatabaseConfig::from_env()?;
    let tracker_config = TrackerConfig::from_env()?;

    let store: Arc<dyn FitnessStore> = match &db_config.database_url {
        Some(url) => {
            let pool = db_config.create_pool(url).await?;
            run_migrations(&pool).await?;
            info!("Connected to PostgreSQL, migrations applied");
            Arc::new(PgFitnessStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    if app_config.seed_exercise_catalog {
        let seeder = CatalogSeeder::new(store.clone());
        seeder.seed_exercise_catalog().await?;
        seeder.seed_quotes().await?;
    }

    let app = create_routes(AppState::new(store, &tracker_config));

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("NutriSync server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}

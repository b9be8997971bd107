use crate::config::{BootstrapSettings, init_database, migrate_database};

/// Connect to the configured database and apply pending migrations
///
/// Does not build `AppData`.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = init_database(settings).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}

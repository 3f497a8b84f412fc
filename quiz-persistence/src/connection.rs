use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Default store location: a fixed path in the OS temp directory. The store
/// is not meant to survive reinstallation, only the lifetime of one event.
pub fn default_database_url() -> String {
    let path = std::env::temp_dir().join("scramble_live.db");
    format!("sqlite://{}?mode=rwc", path.display())
}

pub async fn connect_to_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());
    Database::connect(&database_url).await
}

pub async fn connect_and_migrate() -> Result<DatabaseConnection, DbErr> {
    let db = connect_to_database().await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn connect_to_memory_database() -> Result<DatabaseConnection, DbErr> {
    Database::connect("sqlite::memory:").await
}

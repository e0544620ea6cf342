use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;

use crate::config::AppConfig;

pub type DbPool = SqlitePool;

/// Application state holding the database pool and configuration
pub struct AppState {
  pub db: DbPool,
  pub config: AppConfig,
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, Box<dyn std::error::Error>> {
  // Create parent directory if it doesn't exist
  if let Some(parent) = db_path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }

  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  log::info!("Initializing database at: {}", db_path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  log::info!("Database initialized successfully");

  Ok(pool)
}

pub mod briefing;
pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod savings;
pub mod sessions;
pub mod settings;
pub mod timeline;
pub mod weather;
pub mod zones;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use db::AppState;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  env_logger::init();

  let cli = cli::Cli::parse();
  let config = config::AppConfig::from_env()?;

  let pool = db::initialize_db(&config.db_path).await?;
  let state = AppState { db: pool, config };

  let result = cli::execute(cli, &state).await;
  state.db.close().await;

  result.map_err(|e| e.into())
}

//! Configuration loading
//!
//! Priority order (highest to lowest):
//! 1. `--database-url` flag
//! 2. Environment variables already set (clap reads `DATABASE_URL`)
//! 3. Current directory .env
//! 4. ~/.todoctl/.env

use std::path::PathBuf;

use todoctl_store::StoreConfig;
use tracing::debug;

/// Get the todoctl config directory path (~/.todoctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".todoctl"))
}

/// Load environment variables from .env files and return the files read.
///
/// dotenvy never overwrites variables that are already set, so loading the
/// current directory first gives it priority over ~/.todoctl/.env. Runs
/// before argument parsing so `env` bound flags see the loaded values.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }
    loaded_from
}

/// Log where configuration came from, once tracing is up
pub fn log_sources(loaded_from: &[PathBuf]) {
    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.todoctl)");
    } else {
        let paths: Vec<_> = loaded_from.iter().map(|p| p.display().to_string()).collect();
        debug!("Loaded configuration from: {}", paths.join(", "));
    }
}

/// Build the store configuration; a URL from the flag or `DATABASE_URL` wins
pub fn store_config(database_url: Option<String>) -> StoreConfig {
    let mut config = StoreConfig::from_env();
    if let Some(url) = database_url {
        config.database_url = url;
    }
    config
}

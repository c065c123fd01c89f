//! Engine configuration.
//!
//! The embedding application owns configuration loading; this module
//! only defines what the engine consumes and a convenience
//! environment-backed constructor (`.env` honoured via `dotenvy`).

use std::env;
use std::time::Duration;

use crate::error::{DbError, DbResult};

/// Everything the persistence engine needs to come up.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path of the SQLite database file.
    pub path: String,
    /// Optional SQLCipher passphrase applied to every connection.
    pub passphrase: Option<String>,
    /// Number of pooled connections.
    pub pool_size: usize,
    /// How long `acquire` blocks before giving up with `PoolTimeout`.
    pub acquire_timeout: Duration,
    /// Execute the destructive (`DROP`) statements of the schema
    /// script before recreating tables.
    pub reset_schema: bool,
    /// Load the seed script after the schema. Seed failures are
    /// logged and swallowed.
    pub populate_seed: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: "grimoire.db".to_string(),
            passphrase: None,
            pool_size: 10,
            acquire_timeout: Duration::from_secs(30),
            reset_schema: false,
            populate_seed: false,
        }
    }
}

impl DbConfig {
    /// Reads configuration from the process environment, loading a
    /// `.env` file first if one exists. `GRIMOIRE_DB_PATH` is
    /// required; everything else falls back to the defaults.
    pub fn from_env() -> DbResult<Self> {
        dotenvy::dotenv().ok();

        let path = env::var("GRIMOIRE_DB_PATH")
            .map_err(|_| DbError::Config("GRIMOIRE_DB_PATH is required but not set".to_string()))?;

        let defaults = Self::default();
        Ok(Self {
            path,
            passphrase: env::var("GRIMOIRE_DB_PASSPHRASE").ok(),
            pool_size: optional_var("GRIMOIRE_POOL_SIZE")?.unwrap_or(defaults.pool_size),
            acquire_timeout: optional_var("GRIMOIRE_ACQUIRE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            reset_schema: optional_var("GRIMOIRE_RESET_DATABASE")?.unwrap_or(false),
            populate_seed: optional_var("GRIMOIRE_POPULATE_SEED")?.unwrap_or(false),
        })
    }

    /// Fail-fast validation, run before any connection is opened.
    pub fn validate(&self) -> DbResult<()> {
        if self.path.trim().is_empty() {
            return Err(DbError::Config("database path must not be blank".to_string()));
        }
        if self.pool_size == 0 {
            return Err(DbError::Config("pool size must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn optional_var<T: std::str::FromStr>(key: &str) -> DbResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DbError::Config(format!("could not parse {key}: {raw:?}"))),
        Err(_) => Ok(None),
    }
}

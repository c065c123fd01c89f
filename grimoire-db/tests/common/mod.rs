#![allow(dead_code)]

use std::time::Duration;

use tempfile::TempDir;

use grimoire_db::{ConnectionPool, DbConfig};

/// A pooled database in a temporary directory, torn down with the
/// test.
pub struct TestDb {
    pub pool: ConnectionPool,
    // Held so the directory outlives the pool.
    _dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut DbConfig)) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let mut config = DbConfig {
            path: dir
                .path()
                .join("grimoire.db")
                .to_string_lossy()
                .into_owned(),
            pool_size: 2,
            acquire_timeout: Duration::from_millis(250),
            ..DbConfig::default()
        };
        adjust(&mut config);
        let pool = ConnectionPool::connect(&config).expect("connect pool");
        Self { pool, _dir: dir }
    }
}

//! Bounded connection pool with blocking acquisition.
//!
//! The pool opens a fixed set of connections at startup, bootstraps
//! the schema through a scratch connection, and hands connections out
//! as RAII guards: dropping a [`PooledConnection`] returns it to the
//! pool exactly once, so callers never release by hand.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::script;

const SCHEMA_SQL: &str = include_str!("sql/schema.sql");
const SEED_SQL: &str = include_str!("sql/seed.sql");

/// A fixed-size pool of SQLite connections, safe to share across
/// threads.
#[derive(Clone)]
pub struct ConnectionPool {
    shared: Arc<PoolShared>,
}

#[derive(Debug)]
struct PoolShared {
    state: Mutex<PoolState>,
    available: Condvar,
    size: usize,
    acquire_timeout: Duration,
}

#[derive(Debug)]
struct PoolState {
    idle: VecDeque<Connection>,
    closed: bool,
}

impl ConnectionPool {
    /// Validates the configuration, bootstraps the schema (and seed
    /// data when requested), and opens the pooled connections.
    ///
    /// `DROP` statements in the schema script only run under the
    /// reset flag. Seed failures are logged and swallowed; a broken
    /// seed file must not take the service down.
    pub fn connect(config: &DbConfig) -> DbResult<Self> {
        config.validate()?;

        let scratch = open_connection(config)?;
        script::run_script(&scratch, SCHEMA_SQL, config.reset_schema)?;
        if config.populate_seed {
            if let Err(err) = script::run_script(&scratch, SEED_SQL, false) {
                warn!(error = %err, "seed data population failed; continuing without it");
            }
        }
        drop(scratch);

        let mut idle = VecDeque::with_capacity(config.pool_size);
        for _ in 0..config.pool_size {
            idle.push_back(open_connection(config)?);
        }
        info!(
            path = %config.path,
            size = config.pool_size,
            "database connection pool ready"
        );

        Ok(Self {
            shared: Arc::new(PoolShared {
                state: Mutex::new(PoolState { idle, closed: false }),
                available: Condvar::new(),
                size: config.pool_size,
                acquire_timeout: config.acquire_timeout,
            }),
        })
    }

    /// Blocks until a connection is available, bounded by the
    /// configured acquire timeout. Fails with [`DbError::PoolClosed`]
    /// if the pool shuts down while waiting.
    pub fn acquire(&self) -> DbResult<PooledConnection> {
        let deadline = Instant::now() + self.shared.acquire_timeout;
        let mut state = self.shared.lock_state();
        loop {
            if state.closed {
                return Err(DbError::PoolClosed);
            }
            if let Some(conn) = state.idle.pop_front() {
                return Ok(PooledConnection {
                    conn: Some(conn),
                    shared: Arc::clone(&self.shared),
                });
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(DbError::PoolTimeout);
            }
            state = self
                .shared
                .available
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .0;
        }
    }

    /// Closes every pooled connection and wakes blocked waiters,
    /// which fail with [`DbError::PoolClosed`].
    pub fn shutdown(&self) {
        let drained: Vec<Connection> = {
            let mut state = self.shared.lock_state();
            state.closed = true;
            state.idle.drain(..).collect()
        };
        drop(drained);
        self.shared.available.notify_all();
        info!("database connection pool closed");
    }
}

impl PoolShared {
    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release(&self, conn: Connection) {
        // A transaction left open by the previous borrower must not
        // leak into the next one.
        if !conn.is_autocommit() {
            if let Err(err) = conn.execute_batch("ROLLBACK") {
                warn!(error = %err, "dropping connection that failed to roll back");
                return;
            }
        }

        let mut state = self.lock_state();
        if state.closed {
            return;
        }
        if state.idle.len() >= self.size {
            drop(state);
            warn!("connection pool full; closing an extra connection");
            return;
        }
        state.idle.push_back(conn);
        drop(state);
        self.available.notify_one();
    }
}

/// A pooled connection. Dereferences to [`rusqlite::Connection`];
/// dropping it returns the connection to the pool.
#[derive(Debug)]
pub struct PooledConnection {
    conn: Option<Connection>,
    shared: Arc<PoolShared>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.shared.release(conn);
        }
    }
}

/// Opens one prepared connection: passphrase applied when configured,
/// foreign keys enforced, WAL journal, and a busy timeout so
/// concurrent writers queue instead of failing immediately. SQLite
/// has no isolation knob; WAL plus the busy timeout is the closest
/// analogue to read-committed the engine offers.
fn open_connection(config: &DbConfig) -> DbResult<Connection> {
    let conn = Connection::open(&config.path)?;
    if let Some(passphrase) = &config.passphrase {
        conn.pragma_update(None, "key", passphrase)?;
    }
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    let _mode: String = conn.query_row("PRAGMA journal_mode = wal", [], |row| row.get(0))?;
    Ok(conn)
}

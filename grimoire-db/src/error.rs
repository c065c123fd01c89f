//! Error types for the persistence engine, including the single place
//! where SQLite result codes are interpreted.

use grimoire_domain::EntityKind;
use thiserror::Error;
use tracing::debug;

/// Result type for persistence operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in persistence operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database rejected a write because it would violate an
    /// integrity constraint (unique, foreign key, not-null, check).
    /// Client-correctable: the submitted data is bad, duplicated, or
    /// references something that does not exist.
    #[error("constraint violation: {detail}")]
    ConstraintViolation {
        /// SQLite extended result code.
        code: i32,
        /// The violated constraint, when the driver names it.
        constraint: Option<String>,
        detail: String,
    },

    /// Any other driver-level failure (connectivity, corruption,
    /// unexpected driver error).
    #[error("database error: {0}")]
    Persistence(rusqlite::Error),

    /// Caller misuse: inserting an entity that already has an id,
    /// updating or deleting one that lacks one, bridging an unsaved
    /// modifier, or handing a mapper the wrong entity kind.
    #[error("illegal persistence operation: {0}")]
    IllegalOperation(String),

    /// No mapper is registered for the entity kind. A programming
    /// error in registry wiring, not a recoverable condition.
    #[error("no mapper registered for `{0}` entities")]
    MapperMissing(EntityKind),

    /// `acquire` gave up waiting for a pooled connection.
    #[error("timed out waiting for a pooled connection")]
    PoolTimeout,

    /// The pool has been shut down; blocked waiters are woken with
    /// this instead of being left wedged.
    #[error("connection pool is shut down")]
    PoolClosed,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(cause, message)
                if cause.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = message
                    .clone()
                    .unwrap_or_else(|| cause.to_string());
                DbError::ConstraintViolation {
                    code: cause.extended_code,
                    constraint: constraint_name(&detail),
                    detail,
                }
            }
            _ => {
                debug!(error = %err, "unclassified database error");
                DbError::Persistence(err)
            }
        }
    }
}

/// Recovers the violated constraint from the driver's message, e.g.
/// `UNIQUE constraint failed: language.name` names `language.name`.
fn constraint_name(detail: &str) -> Option<String> {
    detail
        .split_once("constraint failed: ")
        .map(|(_, name)| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

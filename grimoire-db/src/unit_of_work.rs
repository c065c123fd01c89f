//! The write ledger.
//!
//! A [`UnitOfWork`] accumulates intent (created, modified, and
//! removed objects plus arbitrary deferred statements) and flushes
//! it in one transaction. It is a plain value the caller owns and
//! passes around; nothing is stashed in thread-local state. Commit
//! consumes the ledger, so a flushed unit cannot be reused.
//!
//! Ledger membership is object identity: registering the same
//! [`Tracked`] handle twice is a no-op, and registrations resolve
//! against each other (a new object that is then deleted simply
//! leaves the ledger).

use rusqlite::Connection;
use tracing::debug;

use std::rc::Rc;

use crate::error::{DbError, DbResult};
use crate::object::Tracked;
use crate::pool::ConnectionPool;
use crate::registry::MapperRegistry;

/// Deferred work run between the update and delete phases, in
/// registration order, on the commit transaction.
pub type Work = Box<dyn FnOnce(&Connection) -> DbResult<()>>;

/// Counts of what a successful commit actually flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitSummary {
    pub inserted: usize,
    pub updated: usize,
    pub work_items: usize,
    pub deleted: usize,
}

#[derive(Default)]
pub struct UnitOfWork {
    fresh: Vec<Tracked>,
    dirty: Vec<Tracked>,
    removed: Vec<Tracked>,
    work: Vec<Work>,
}

fn contains(ledger: &[Tracked], obj: &Tracked) -> bool {
    ledger.iter().any(|entry| Rc::ptr_eq(entry, obj))
}

fn remove(ledger: &mut Vec<Tracked>, obj: &Tracked) -> bool {
    if let Some(pos) = ledger.iter().position(|entry| Rc::ptr_eq(entry, obj)) {
        ledger.remove(pos);
        return true;
    }
    false
}

impl UnitOfWork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an insert. Ignored when the object is already
    /// tracked in any ledger.
    pub fn register_new(&mut self, obj: &Tracked) {
        if contains(&self.fresh, obj)
            || contains(&self.dirty, obj)
            || contains(&self.removed, obj)
        {
            return;
        }
        self.fresh.push(Rc::clone(obj));
    }

    /// Schedules an update. A freshly registered object stays fresh,
    /// and a removed object cannot come back dirty.
    pub fn register_dirty(&mut self, obj: &Tracked) {
        if contains(&self.fresh, obj)
            || contains(&self.dirty, obj)
            || contains(&self.removed, obj)
        {
            return;
        }
        self.dirty.push(Rc::clone(obj));
    }

    /// Schedules a delete. An object still pending insert is dropped
    /// from the ledger instead, since it has no row to remove.
    pub fn register_deleted(&mut self, obj: &Tracked) {
        if remove(&mut self.fresh, obj) {
            return;
        }
        remove(&mut self.dirty, obj);
        if !contains(&self.removed, obj) {
            self.removed.push(Rc::clone(obj));
        }
    }

    /// Schedules a closure to run on the commit transaction, after
    /// updates and before deletes.
    pub fn register_work(&mut self, work: impl FnOnce(&Connection) -> DbResult<()> + 'static) {
        self.work.push(Box::new(work));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fresh.is_empty() && self.dirty.is_empty() && self.removed.is_empty() && self.work.is_empty()
    }

    /// Flushes the ledger in one transaction: inserts, then updates,
    /// then deferred work, then deletes. Any failure rolls the whole
    /// transaction back and nothing is persisted.
    pub fn commit(
        self,
        pool: &ConnectionPool,
        registry: &MapperRegistry,
    ) -> DbResult<CommitSummary> {
        let mut pooled = pool.acquire()?;
        let tx = pooled.transaction()?;

        let mut summary = CommitSummary::default();

        for obj in &self.fresh {
            let mut obj = obj
                .try_borrow_mut()
                .map_err(|_| borrowed_during_commit())?;
            let mapper = registry
                .resolve(obj.kind())
                .ok_or(DbError::MapperMissing(obj.kind()))?;
            mapper.insert_object(&mut obj, &tx)?;
            summary.inserted += 1;
        }
        for obj in &self.dirty {
            let mut obj = obj
                .try_borrow_mut()
                .map_err(|_| borrowed_during_commit())?;
            let mapper = registry
                .resolve(obj.kind())
                .ok_or(DbError::MapperMissing(obj.kind()))?;
            mapper.update_object(&mut obj, &tx)?;
            summary.updated += 1;
        }
        for work in self.work {
            work(&tx)?;
            summary.work_items += 1;
        }
        for obj in &self.removed {
            let obj = obj.try_borrow().map_err(|_| borrowed_during_commit())?;
            let mapper = registry
                .resolve(obj.kind())
                .ok_or(DbError::MapperMissing(obj.kind()))?;
            mapper.delete_object(&obj, &tx)?;
            summary.deleted += 1;
        }

        tx.commit()?;
        debug!(
            inserted = summary.inserted,
            updated = summary.updated,
            work_items = summary.work_items,
            deleted = summary.deleted,
            "unit of work committed"
        );
        Ok(summary)
    }
}

fn borrowed_during_commit() -> DbError {
    DbError::IllegalOperation("tracked object is borrowed during commit".into())
}

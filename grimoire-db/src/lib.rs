//! SQLite persistence for the grimoire domain model.
//!
//! The crate is organised around three pieces:
//!
//! * a bounded [`ConnectionPool`] handing out RAII
//!   [`PooledConnection`] guards,
//! * per-entity data mappers behind a [`MapperRegistry`], and
//! * a [`UnitOfWork`] ledger that flushes a batch of changes in one
//!   transaction.
//!
//! Typical usage: build a [`DbConfig`], connect a pool, wrap entities
//! with [`track`], register them on a unit of work, and commit it
//! against [`MapperRegistry::standard`].

mod config;
mod error;
mod mapper;
mod mappers;
mod object;
mod pool;
mod registry;
mod script;
mod supply;
mod unit_of_work;

pub use config::DbConfig;
pub use error::{DbError, DbResult};
pub use mapper::{ErasedMapper, Mapper};
pub use mappers::{AsmMapper, FeatMapper, LanguageMapper, ProficiencyMapper};
pub use object::{track, DomainObject, ObjectVariant, Tracked};
pub use pool::{ConnectionPool, PooledConnection};
pub use registry::MapperRegistry;
pub use supply::SupplyMapper;
pub use unit_of_work::{CommitSummary, UnitOfWork, Work};

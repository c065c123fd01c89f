//! The data-mapper contract.
//!
//! [`Mapper`] is the typed per-entity contract; the provided
//! `find_by_id`/`find_all`/`delete` are SQL templates parametrized by
//! the implementor's table, so concrete mappers only supply their
//! column-specific insert/update and row translation.
//! [`ErasedMapper`] is the object-safe surface the registry and unit
//! of work dispatch through.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use grimoire_domain::{Entity, EntityId};

use crate::error::{DbError, DbResult};
use crate::object::{DomainObject, ObjectVariant};

/// Relational mapping for one entity kind. An already established
/// connection is passed to every operation so calls batch onto one
/// transaction.
pub trait Mapper {
    type Entity: Entity;

    /// The table this mapper owns.
    fn table(&self) -> &'static str;

    /// Translates one result row into a domain object.
    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity>;

    /// Inserts the entity and assigns its generated identifier.
    /// Fails with [`DbError::IllegalOperation`] if it already has one.
    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()>;

    /// Updates the entity's row. Requires an identifier.
    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()>;

    /// The entity's identifier, or [`DbError::IllegalOperation`] when
    /// the entity has never been persisted.
    fn entity_id(&self, obj: &Self::Entity) -> DbResult<i64> {
        obj.id().map(EntityId::value).ok_or_else(|| {
            DbError::IllegalOperation(format!("`{}` entity has no id", self.table()))
        })
    }

    fn find_by_id(&self, id: i64, conn: &Connection) -> DbResult<Option<Self::Entity>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", self.table());
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.map_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_all(&self, conn: &Connection) -> DbResult<Vec<Self::Entity>> {
        let sql = format!("SELECT * FROM {}", self.table());
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| self.map_row(row))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }

    fn delete(&self, obj: &Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table());
        let affected = conn.execute(&sql, params![id])?;
        if affected == 0 {
            return Err(DbError::IllegalOperation(format!(
                "no `{}` row with id {id} to delete",
                self.table()
            )));
        }
        Ok(())
    }
}

/// Object-safe mapper dispatch over [`DomainObject`], used by the
/// registry and the unit of work.
pub trait ErasedMapper: Send + Sync {
    fn insert_object(&self, obj: &mut DomainObject, conn: &Connection) -> DbResult<()>;
    fn update_object(&self, obj: &mut DomainObject, conn: &Connection) -> DbResult<()>;
    fn delete_object(&self, obj: &DomainObject, conn: &Connection) -> DbResult<()>;
}

/// Every typed mapper whose entity is a domain-object variant is
/// usable through the erased surface. Handing it the wrong variant is
/// caller misuse, not a crash.
impl<M> ErasedMapper for M
where
    M: Mapper + Send + Sync,
    M::Entity: ObjectVariant,
{
    fn insert_object(&self, obj: &mut DomainObject, conn: &Connection) -> DbResult<()> {
        let got = obj.kind();
        let entity =
            M::Entity::from_object_mut(obj).ok_or_else(|| wrong_variant::<M>(self, got))?;
        self.insert(entity, conn)
    }

    fn update_object(&self, obj: &mut DomainObject, conn: &Connection) -> DbResult<()> {
        let got = obj.kind();
        let entity =
            M::Entity::from_object_mut(obj).ok_or_else(|| wrong_variant::<M>(self, got))?;
        self.update(entity, conn)
    }

    fn delete_object(&self, obj: &DomainObject, conn: &Connection) -> DbResult<()> {
        let got = obj.kind();
        let entity = M::Entity::from_object(obj).ok_or_else(|| wrong_variant::<M>(self, got))?;
        self.delete(entity, conn)
    }
}

fn wrong_variant<M>(mapper: &M, got: grimoire_domain::EntityKind) -> DbError
where
    M: Mapper,
{
    DbError::IllegalOperation(format!(
        "`{}` mapper received a `{got}` object",
        mapper.table()
    ))
}

/// Wraps a domain parse failure as the driver's conversion error so
/// `map_row` implementations stay on `rusqlite::Result`.
pub(crate) fn conversion_err<E>(err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

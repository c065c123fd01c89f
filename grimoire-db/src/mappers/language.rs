use rusqlite::{params, Connection, Row};

use grimoire_domain::{Entity, EntityId, Language};

use crate::error::{DbError, DbResult};
use crate::mapper::Mapper;

/// Mapper for the `language` table. Language names carry a unique
/// constraint, so a duplicate insert surfaces as a
/// [`DbError::ConstraintViolation`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageMapper;

impl LanguageMapper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Mapper for LanguageMapper {
    type Entity = Language;

    fn table(&self) -> &'static str {
        "language"
    }

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity> {
        let mut language = Language::new(
            row.get::<_, String>("name")?,
            row.get::<_, String>("description")?,
            row.get::<_, String>("script")?,
            row.get("exotic")?,
        );
        language.set_id(EntityId::new(row.get("id")?));
        Ok(language)
    }

    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        if obj.has_id() {
            return Err(DbError::IllegalOperation(
                "language is already persisted".into(),
            ));
        }
        let id = conn.query_row(
            "INSERT INTO language (name, description, script, exotic) \
             VALUES (?1, ?2, ?3, ?4) RETURNING id",
            params![obj.name, obj.description, obj.script, obj.exotic],
            |row| row.get(0),
        )?;
        obj.set_id(EntityId::new(id));
        Ok(())
    }

    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        conn.execute(
            "UPDATE language SET name = ?2, description = ?3, script = ?4, exotic = ?5 \
             WHERE id = ?1",
            params![id, obj.name, obj.description, obj.script, obj.exotic],
        )?;
        Ok(())
    }
}

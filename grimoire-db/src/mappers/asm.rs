use std::str::FromStr;

use rusqlite::{params, Connection, Row};

use grimoire_domain::{Ability, AbilityScoreModifier, Entity, EntityId};

use crate::error::{DbError, DbResult};
use crate::mapper::{conversion_err, Mapper};

/// Mapper for the `asm` (ability score modifier) table. Abilities are
/// stored in their three-letter shorthand.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsmMapper;

impl AsmMapper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Mapper for AsmMapper {
    type Entity = AbilityScoreModifier;

    fn table(&self) -> &'static str {
        "asm"
    }

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity> {
        let raw: String = row.get("ability")?;
        let ability = Ability::from_str(&raw).map_err(conversion_err)?;
        let mut asm = AbilityScoreModifier::new(ability, row.get("value")?);
        asm.set_id(EntityId::new(row.get("id")?));
        Ok(asm)
    }

    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        if obj.has_id() {
            return Err(DbError::IllegalOperation(
                "ability score modifier is already persisted".into(),
            ));
        }
        let id = conn.query_row(
            "INSERT INTO asm (ability, value) VALUES (?1, ?2) RETURNING id",
            params![obj.ability.shorthand(), obj.value],
            |row| row.get(0),
        )?;
        obj.set_id(EntityId::new(id));
        Ok(())
    }

    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        conn.execute(
            "UPDATE asm SET ability = ?2, value = ?3 WHERE id = ?1",
            params![id, obj.ability.shorthand(), obj.value],
        )?;
        Ok(())
    }
}

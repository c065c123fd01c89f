//! The supply bridge: "entity X supplies modifier set Y".
//!
//! A modifier source is the pair (kind, ref-id), resolved to a
//! surrogate id in `modifier_source` on first use. One bridge table
//! per modifier kind records which modifiers a source supplies.
//! Replacement is wholesale: clear every bridge row for the source,
//! reinsert from the supplier's current collections, no diffing.

use rusqlite::{params, Connection, OptionalExtension};

use grimoire_domain::{
    AbilityScoreModifier, Entity, EntityId, EntityKind, Feat, Language, ModifierSupplier,
    Proficiency,
};

use crate::error::{DbError, DbResult};

const fn supply_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Asm => "supply_asm",
        EntityKind::Feat => "supply_feat",
        EntityKind::Language => "supply_language",
        EntityKind::Proficiency => "supply_proficiency",
    }
}

/// Mapper for `modifier_source` and the four `supply_*` bridge
/// tables. Stateless; shared freely between entity mappers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SupplyMapper;

impl SupplyMapper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolves (kind, ref-id) to its surrogate source id, creating
    /// the row if absent. The no-op update on conflict makes the
    /// statement return the existing-or-new id in one round trip.
    pub fn resolve_source_id(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<i64> {
        let id = conn.query_row(
            "INSERT INTO modifier_source (kind, ref_id) VALUES (?1, ?2) \
             ON CONFLICT (kind, ref_id) DO UPDATE SET kind = excluded.kind \
             RETURNING id",
            params![kind.as_str(), ref_id],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Replaces every supplied modifier for the source with the
    /// supplier's current collections. Full replace, not a diff.
    pub fn replace_all_for_source(
        &self,
        kind: EntityKind,
        ref_id: i64,
        supplier: &dyn ModifierSupplier,
        conn: &Connection,
    ) -> DbResult<()> {
        let source_id = self.resolve_source_id(kind, ref_id, conn)?;
        self.delete_supplies(source_id, conn)?;

        self.insert_supplies(
            source_id,
            EntityKind::Asm,
            supplier.ability_score_modifiers(),
            conn,
        )?;
        self.insert_supplies(source_id, EntityKind::Feat, supplier.feats(), conn)?;
        self.insert_supplies(source_id, EntityKind::Language, supplier.languages(), conn)?;
        self.insert_supplies(
            source_id,
            EntityKind::Proficiency,
            supplier.proficiencies(),
            conn,
        )?;
        Ok(())
    }

    /// Removes every bridge row for the source and then the source
    /// row itself. Returns `Ok(false)` rather than an error when the
    /// source was never created; nothing is touched in that case.
    pub fn delete_all_for_source(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<bool> {
        let Some(source_id) = self.lookup_source_id(kind, ref_id, conn)? else {
            return Ok(false);
        };
        self.delete_supplies(source_id, conn)?;
        conn.execute(
            "DELETE FROM modifier_source WHERE id = ?1",
            params![source_id],
        )?;
        Ok(true)
    }

    pub fn find_asm_ids(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<Vec<EntityId<AbilityScoreModifier>>> {
        self.find_supplied_ids(kind, ref_id, EntityKind::Asm, conn)
    }

    pub fn find_feat_ids(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<Vec<EntityId<Feat>>> {
        self.find_supplied_ids(kind, ref_id, EntityKind::Feat, conn)
    }

    pub fn find_language_ids(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<Vec<EntityId<Language>>> {
        self.find_supplied_ids(kind, ref_id, EntityKind::Language, conn)
    }

    pub fn find_proficiency_ids(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<Vec<EntityId<Proficiency>>> {
        self.find_supplied_ids(kind, ref_id, EntityKind::Proficiency, conn)
    }

    fn lookup_source_id(
        &self,
        kind: EntityKind,
        ref_id: i64,
        conn: &Connection,
    ) -> DbResult<Option<i64>> {
        let id = conn
            .query_row(
                "SELECT id FROM modifier_source WHERE kind = ?1 AND ref_id = ?2",
                params![kind.as_str(), ref_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn find_supplied_ids<E: Entity>(
        &self,
        kind: EntityKind,
        ref_id: i64,
        supply_kind: EntityKind,
        conn: &Connection,
    ) -> DbResult<Vec<EntityId<E>>> {
        let source_id = self.resolve_source_id(kind, ref_id, conn)?;
        let sql = format!(
            "SELECT supply_id FROM {} WHERE source_id = ?1",
            supply_table(supply_kind)
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params![source_id], |row| row.get::<_, i64>(0))?
            .map(|raw| raw.map(EntityId::new))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    fn insert_supplies<E: Entity>(
        &self,
        source_id: i64,
        supply_kind: EntityKind,
        supplies: &[E],
        conn: &Connection,
    ) -> DbResult<()> {
        if supplies.is_empty() {
            return Ok(());
        }
        let sql = format!(
            "INSERT INTO {} (source_id, supply_id) VALUES (?1, ?2)",
            supply_table(supply_kind)
        );
        let mut stmt = conn.prepare(&sql)?;
        for entity in supplies {
            let supply_id = entity.id().map(EntityId::value).ok_or_else(|| {
                DbError::IllegalOperation(format!(
                    "cannot bridge an unsaved `{supply_kind}` modifier"
                ))
            })?;
            stmt.execute(params![source_id, supply_id])?;
        }
        Ok(())
    }

    fn delete_supplies(&self, source_id: i64, conn: &Connection) -> DbResult<()> {
        for kind in EntityKind::ALL {
            let sql = format!("DELETE FROM {} WHERE source_id = ?1", supply_table(kind));
            conn.execute(&sql, params![source_id])?;
        }
        Ok(())
    }
}

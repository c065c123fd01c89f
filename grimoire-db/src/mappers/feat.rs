use rusqlite::{params, Connection, Row};

use grimoire_domain::{Entity, EntityId, EntityKind, Feat};

use crate::error::{DbError, DbResult};
use crate::mapper::Mapper;
use crate::mappers::{AsmMapper, ProficiencyMapper};
use crate::supply::SupplyMapper;

/// Mapper for the `feat` table. A feat is an aggregate root: saving
/// one also persists any unsaved modifiers it supplies and rewrites
/// its rows in the supply bridge, so a feat read back always carries
/// its full modifier set.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatMapper {
    supply: SupplyMapper,
    asm: AsmMapper,
    proficiency: ProficiencyMapper,
}

impl FeatMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write-through for the aggregate: any supplied modifier without
    /// an identifier is inserted first, so the bridge only ever
    /// references persisted rows.
    fn persist_supplies(&self, feat: &mut Feat, conn: &Connection) -> DbResult<()> {
        for asm in &mut feat.ability_score_modifiers {
            if !asm.has_id() {
                self.asm.insert(asm, conn)?;
            }
        }
        for proficiency in &mut feat.proficiencies {
            if !proficiency.has_id() {
                self.proficiency.insert(proficiency, conn)?;
            }
        }
        Ok(())
    }

    fn load_supplies(&self, feat: &mut Feat, conn: &Connection) -> DbResult<()> {
        let feat_id = self.entity_id(feat)?;

        for id in self.supply.find_asm_ids(EntityKind::Feat, feat_id, conn)? {
            let asm = self.asm.find_by_id(id.value(), conn)?.ok_or_else(|| {
                DbError::IllegalOperation(format!("feat {feat_id} supplies missing asm {id}"))
            })?;
            feat.ability_score_modifiers.push(asm);
        }
        for id in self
            .supply
            .find_proficiency_ids(EntityKind::Feat, feat_id, conn)?
        {
            let proficiency = self.proficiency.find_by_id(id.value(), conn)?.ok_or_else(|| {
                DbError::IllegalOperation(format!(
                    "feat {feat_id} supplies missing proficiency {id}"
                ))
            })?;
            feat.proficiencies.push(proficiency);
        }
        Ok(())
    }
}

impl Mapper for FeatMapper {
    type Entity = Feat;

    fn table(&self) -> &'static str {
        "feat"
    }

    // Base columns only; `find_by_id`/`find_all` hydrate the supplied
    // modifier collections afterwards.
    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity> {
        let name: String = row.get("name")?;
        let description: String = row.get("description")?;
        let mut feat = Feat::new(name, description).map_err(crate::mapper::conversion_err)?;
        feat.set_id(EntityId::new(row.get("id")?));
        Ok(feat)
    }

    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        if obj.has_id() {
            return Err(DbError::IllegalOperation("feat is already persisted".into()));
        }
        let id = conn.query_row(
            "INSERT INTO feat (name, description) VALUES (?1, ?2) RETURNING id",
            params![obj.name, obj.description],
            |row| row.get(0),
        )?;
        obj.set_id(EntityId::new(id));
        self.persist_supplies(obj, conn)?;
        self.supply
            .replace_all_for_source(EntityKind::Feat, id, &*obj, conn)
    }

    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        conn.execute(
            "UPDATE feat SET name = ?2, description = ?3 WHERE id = ?1",
            params![id, obj.name, obj.description],
        )?;
        self.persist_supplies(obj, conn)?;
        self.supply
            .replace_all_for_source(EntityKind::Feat, id, &*obj, conn)
    }

    fn find_by_id(&self, id: i64, conn: &Connection) -> DbResult<Option<Self::Entity>> {
        let mut stmt = conn.prepare("SELECT * FROM feat WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut feat = self.map_row(row)?;
        self.load_supplies(&mut feat, conn)?;
        Ok(Some(feat))
    }

    fn find_all(&self, conn: &Connection) -> DbResult<Vec<Self::Entity>> {
        let mut stmt = conn.prepare("SELECT * FROM feat")?;
        let mut feats = stmt
            .query_map([], |row| self.map_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for feat in &mut feats {
            self.load_supplies(feat, conn)?;
        }
        Ok(feats)
    }

    /// Removes the bridge rows and source first; a feat that was
    /// never persisted as a source cannot be deleted.
    fn delete(&self, obj: &Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        if !self
            .supply
            .delete_all_for_source(EntityKind::Feat, id, conn)?
        {
            return Err(DbError::IllegalOperation(format!(
                "feat {id} has no modifier source to delete"
            )));
        }
        let affected = conn.execute("DELETE FROM feat WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(DbError::IllegalOperation(format!(
                "no feat row with id {id} to delete"
            )));
        }
        Ok(())
    }
}

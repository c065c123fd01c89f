//! The proficiency facade.
//!
//! A proficiency row is split across the `proficiency` base table,
//! which carries the identifier and a `kind` discriminator, and
//! exactly one subtype table keyed by the same identifier. The facade
//! owns the base row and routes the subtype row to one of three inner
//! mappers; callers never touch the inner mappers directly.

use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use grimoire_domain::{
    ArmourClass, Entity, EntityId, Proficiency, ProficiencyKind, ProficiencyType, Skill, ToolKind,
};

use crate::error::{DbError, DbResult};
use crate::mapper::{conversion_err, Mapper};
use crate::object::DomainObject;

/// Polymorphic mapper over the proficiency class hierarchy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProficiencyMapper {
    armour: ArmourProficiencyMapper,
    skill: SkillProficiencyMapper,
    tool: ToolProficiencyMapper,
}

impl ProficiencyMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn subtype(&self, ty: ProficiencyType) -> &dyn Mapper<Entity = Proficiency> {
        match ty {
            ProficiencyType::Armour => &self.armour,
            ProficiencyType::Skill => &self.skill,
            ProficiencyType::Tool => &self.tool,
        }
    }

    /// Reads the base-row discriminator, then delegates to the
    /// subtype mapper it names.
    pub fn find_by_id(&self, id: i64, conn: &Connection) -> DbResult<Option<Proficiency>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT kind FROM proficiency WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let ty = ProficiencyType::from_str(&raw).map_err(conversion_err)?;
        let subtype = self.subtype(ty).find_by_id(id, conn)?.ok_or_else(|| {
            DbError::IllegalOperation(format!("proficiency {id} has no `{ty}` subtype row"))
        })?;
        Ok(Some(subtype))
    }

    pub fn find_all(&self, conn: &Connection) -> DbResult<Vec<Proficiency>> {
        let mut stmt = conn.prepare("SELECT id, kind FROM proficiency")?;
        let base = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut all = Vec::with_capacity(base.len());
        for (id, raw) in base {
            let ty = ProficiencyType::from_str(&raw).map_err(conversion_err)?;
            let subtype = self.subtype(ty).find_by_id(id, conn)?.ok_or_else(|| {
                DbError::IllegalOperation(format!("proficiency {id} has no `{ty}` subtype row"))
            })?;
            all.push(subtype);
        }
        Ok(all)
    }

    /// All proficiencies of one subtype, straight off its table.
    pub fn find_all_by_type(
        &self,
        ty: ProficiencyType,
        conn: &Connection,
    ) -> DbResult<Vec<Proficiency>> {
        self.subtype(ty).find_all(conn)
    }

    /// Inserts the base row, assigns the generated identifier, then
    /// inserts the subtype row under the same identifier.
    pub fn insert(&self, obj: &mut Proficiency, conn: &Connection) -> DbResult<()> {
        if obj.has_id() {
            return Err(DbError::IllegalOperation(
                "proficiency is already persisted".into(),
            ));
        }
        let ty = obj.proficiency_type();
        let id = conn.query_row(
            "INSERT INTO proficiency (kind) VALUES (?1) RETURNING id",
            params![ty.as_str()],
            |row| row.get(0),
        )?;
        obj.set_id(EntityId::new(id));
        self.subtype(ty).insert(obj, conn)
    }

    pub fn update(&self, obj: &mut Proficiency, conn: &Connection) -> DbResult<()> {
        self.subtype(obj.proficiency_type()).update(obj, conn)
    }

    /// Deletes the base row; the subtype row follows by cascade.
    pub fn delete(&self, obj: &Proficiency, conn: &Connection) -> DbResult<()> {
        let id = obj
            .id()
            .map(EntityId::value)
            .ok_or_else(|| DbError::IllegalOperation("proficiency has no id".into()))?;
        let affected = conn.execute("DELETE FROM proficiency WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(DbError::IllegalOperation(format!(
                "no proficiency row with id {id} to delete"
            )));
        }
        Ok(())
    }
}

// The facade is not a `Mapper` itself (it has no single table and
// cannot map a row without a connection), so the erased surface is
// implemented by hand.
impl crate::mapper::ErasedMapper for ProficiencyMapper {
    fn insert_object(&self, obj: &mut DomainObject, conn: &Connection) -> DbResult<()> {
        match obj {
            DomainObject::Proficiency(proficiency) => self.insert(proficiency, conn),
            other => Err(wrong_variant(other)),
        }
    }

    fn update_object(&self, obj: &mut DomainObject, conn: &Connection) -> DbResult<()> {
        match obj {
            DomainObject::Proficiency(proficiency) => self.update(proficiency, conn),
            other => Err(wrong_variant(other)),
        }
    }

    fn delete_object(&self, obj: &DomainObject, conn: &Connection) -> DbResult<()> {
        match obj {
            DomainObject::Proficiency(proficiency) => self.delete(proficiency, conn),
            other => Err(wrong_variant(other)),
        }
    }
}

fn wrong_variant(obj: &DomainObject) -> DbError {
    DbError::IllegalOperation(format!(
        "proficiency mapper received a `{}` object",
        obj.kind()
    ))
}

// ── Subtype mappers ──────────────────────────────────────────────────

/// Inserts the subtype row for an already-identified proficiency, or
/// reports the caller's sequencing mistake.
fn subtype_id(obj: &Proficiency, table: &str) -> DbResult<i64> {
    obj.id().map(EntityId::value).ok_or_else(|| {
        DbError::IllegalOperation(format!(
            "`{table}` row requires the base proficiency to be inserted first"
        ))
    })
}

fn wrong_subtype(obj: &Proficiency, table: &str) -> DbError {
    DbError::IllegalOperation(format!(
        "`{table}` mapper received a `{}` proficiency",
        obj.proficiency_type()
    ))
}

#[derive(Debug, Default, Clone, Copy)]
struct ArmourProficiencyMapper;

impl Mapper for ArmourProficiencyMapper {
    type Entity = Proficiency;

    fn table(&self) -> &'static str {
        "armour_proficiency"
    }

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity> {
        let raw: String = row.get("kind")?;
        let class = ArmourClass::from_str(&raw).map_err(conversion_err)?;
        let mut proficiency = Proficiency::armour(class);
        proficiency.set_id(EntityId::new(row.get("id")?));
        Ok(proficiency)
    }

    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = subtype_id(obj, self.table())?;
        let ProficiencyKind::Armour(class) = obj.kind else {
            return Err(wrong_subtype(obj, self.table()));
        };
        conn.execute(
            "INSERT INTO armour_proficiency (id, kind) VALUES (?1, ?2)",
            params![id, class.as_str()],
        )?;
        Ok(())
    }

    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        let ProficiencyKind::Armour(class) = obj.kind else {
            return Err(wrong_subtype(obj, self.table()));
        };
        conn.execute(
            "UPDATE armour_proficiency SET kind = ?2 WHERE id = ?1",
            params![id, class.as_str()],
        )?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SkillProficiencyMapper;

impl Mapper for SkillProficiencyMapper {
    type Entity = Proficiency;

    fn table(&self) -> &'static str {
        "skill_proficiency"
    }

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity> {
        let raw: String = row.get("kind")?;
        let skill = Skill::from_str(&raw).map_err(conversion_err)?;
        let mut proficiency = Proficiency::skill(skill);
        proficiency.set_id(EntityId::new(row.get("id")?));
        Ok(proficiency)
    }

    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = subtype_id(obj, self.table())?;
        let ProficiencyKind::Skill(skill) = obj.kind else {
            return Err(wrong_subtype(obj, self.table()));
        };
        conn.execute(
            "INSERT INTO skill_proficiency (id, kind) VALUES (?1, ?2)",
            params![id, skill.as_str()],
        )?;
        Ok(())
    }

    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        let ProficiencyKind::Skill(skill) = obj.kind else {
            return Err(wrong_subtype(obj, self.table()));
        };
        conn.execute(
            "UPDATE skill_proficiency SET kind = ?2 WHERE id = ?1",
            params![id, skill.as_str()],
        )?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ToolProficiencyMapper;

impl Mapper for ToolProficiencyMapper {
    type Entity = Proficiency;

    fn table(&self) -> &'static str {
        "tool_proficiency"
    }

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Entity> {
        let raw: String = row.get("kind")?;
        let tool = ToolKind::from_str(&raw).map_err(conversion_err)?;
        let mut proficiency = Proficiency::tool(
            row.get::<_, String>("name")?,
            row.get::<_, String>("description")?,
            tool,
        );
        proficiency.set_id(EntityId::new(row.get("id")?));
        Ok(proficiency)
    }

    fn insert(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = subtype_id(obj, self.table())?;
        let ProficiencyKind::Tool {
            ref name,
            ref description,
            tool,
        } = obj.kind
        else {
            return Err(wrong_subtype(obj, self.table()));
        };
        conn.execute(
            "INSERT INTO tool_proficiency (id, kind, name, description) \
             VALUES (?1, ?2, ?3, ?4)",
            params![id, tool.as_str(), name, description],
        )?;
        Ok(())
    }

    fn update(&self, obj: &mut Self::Entity, conn: &Connection) -> DbResult<()> {
        let id = self.entity_id(obj)?;
        let ProficiencyKind::Tool {
            ref name,
            ref description,
            tool,
        } = obj.kind
        else {
            return Err(wrong_subtype(obj, self.table()));
        };
        conn.execute(
            "UPDATE tool_proficiency SET kind = ?2, name = ?3, description = ?4 WHERE id = ?1",
            params![id, tool.as_str(), name, description],
        )?;
        Ok(())
    }
}

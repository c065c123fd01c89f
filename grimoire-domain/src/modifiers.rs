//! The four persistable character-modifier entities.
//!
//! Each entity carries an optional typed identifier that is assigned
//! exactly once, at first successful insert. Data fields are public;
//! the identifier is not, so the single-assignment rule cannot be
//! bypassed.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::ids::EntityId;
use crate::kinds::{Ability, ArmourClass, ProficiencyType, Skill, ToolKind};
use crate::supplier::ModifierSupplier;
use crate::Error;

macro_rules! impl_entity {
    ($ty:ty) => {
        impl Entity for $ty {
            fn id(&self) -> Option<EntityId<Self>> {
                self.id
            }

            fn set_id(&mut self, id: EntityId<Self>) -> bool {
                if self.id.is_some() {
                    return false;
                }
                self.id = Some(id);
                true
            }
        }
    };
}

/// A flat bonus (or penalty) to one ability score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScoreModifier {
    id: Option<EntityId<AbilityScoreModifier>>,
    pub ability: Ability,
    pub value: i32,
}

impl AbilityScoreModifier {
    #[must_use]
    pub fn new(ability: Ability, value: i32) -> Self {
        Self {
            id: None,
            ability,
            value,
        }
    }
}

impl_entity!(AbilityScoreModifier);

/// A feat a character possesses. A feat is an aggregate: it may
/// supply ability-score modifiers and proficiencies of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feat {
    id: Option<EntityId<Feat>>,
    pub name: String,
    pub description: String,
    pub ability_score_modifiers: Vec<AbilityScoreModifier>,
    pub proficiencies: Vec<Proficiency>,
}

impl Feat {
    /// Creates a feat with no supplied modifiers. The description
    /// must be non-blank.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> crate::Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::Blank("feat description"));
        }
        Ok(Self {
            id: None,
            name: name.into(),
            description,
            ability_score_modifiers: Vec::new(),
            proficiencies: Vec::new(),
        })
    }
}

impl_entity!(Feat);

impl ModifierSupplier for Feat {
    fn ability_score_modifiers(&self) -> &[AbilityScoreModifier] {
        &self.ability_score_modifiers
    }

    fn proficiencies(&self) -> &[Proficiency] {
        &self.proficiencies
    }
}

/// A language a character knows. `description` characterises its
/// typical speakers, `script` its written form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    id: Option<EntityId<Language>>,
    pub name: String,
    pub description: String,
    pub script: String,
    pub exotic: bool,
}

impl Language {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        script: impl Into<String>,
        exotic: bool,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            script: script.into(),
            exotic,
        }
    }
}

impl_entity!(Language);

/// A proficiency: one base identity plus exactly one subtype, matched
/// exhaustively. The subtype selects which `*_proficiency` table the
/// detail row lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proficiency {
    id: Option<EntityId<Proficiency>>,
    pub kind: ProficiencyKind,
}

/// The proficiency subtypes and their payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProficiencyKind {
    Armour(ArmourClass),
    Skill(Skill),
    Tool {
        name: String,
        description: String,
        tool: ToolKind,
    },
}

impl Proficiency {
    #[must_use]
    pub fn armour(class: ArmourClass) -> Self {
        Self {
            id: None,
            kind: ProficiencyKind::Armour(class),
        }
    }

    #[must_use]
    pub fn skill(skill: Skill) -> Self {
        Self {
            id: None,
            kind: ProficiencyKind::Skill(skill),
        }
    }

    #[must_use]
    pub fn tool(name: impl Into<String>, description: impl Into<String>, tool: ToolKind) -> Self {
        Self {
            id: None,
            kind: ProficiencyKind::Tool {
                name: name.into(),
                description: description.into(),
                tool,
            },
        }
    }

    /// The discriminator stored on the base `proficiency` row.
    #[must_use]
    pub fn proficiency_type(&self) -> ProficiencyType {
        match self.kind {
            ProficiencyKind::Armour(_) => ProficiencyType::Armour,
            ProficiencyKind::Skill(_) => ProficiencyType::Skill,
            ProficiencyKind::Tool { .. } => ProficiencyType::Tool,
        }
    }
}

impl_entity!(Proficiency);

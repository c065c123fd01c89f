//! Closed enumerations shared by the domain model and the relational
//! schema. Each enum round-trips through the string form stored in
//! its database column; parsing is lenient about case and surrounding
//! whitespace, strict about unknown values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

fn normalized(kind: &'static str, value: &str) -> crate::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Blank(kind));
    }
    Ok(trimmed.to_lowercase().replace(' ', "_"))
}

/// The six ability scores. Stored in the database by shorthand
/// ("STR", "DEX", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Three-letter shorthand used as the column value.
    #[must_use]
    pub const fn shorthand(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }
}

impl FromStr for Ability {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match normalized("ability", s)?.as_str() {
            "str" | "strength" => Ok(Ability::Strength),
            "dex" | "dexterity" => Ok(Ability::Dexterity),
            "con" | "constitution" => Ok(Ability::Constitution),
            "int" | "intelligence" => Ok(Ability::Intelligence),
            "wis" | "wisdom" => Ok(Ability::Wisdom),
            "cha" | "charisma" => Ok(Ability::Charisma),
            _ => Err(Error::UnknownVariant {
                kind: "ability",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shorthand())
    }
}

/// Armour categories a character can be proficient with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmourClass {
    Light,
    Medium,
    Heavy,
    Shield,
}

impl ArmourClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ArmourClass::Light => "light",
            ArmourClass::Medium => "medium",
            ArmourClass::Heavy => "heavy",
            ArmourClass::Shield => "shield",
        }
    }
}

impl FromStr for ArmourClass {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match normalized("armour class", s)?.as_str() {
            "light" => Ok(ArmourClass::Light),
            "medium" => Ok(ArmourClass::Medium),
            "heavy" => Ok(ArmourClass::Heavy),
            "shield" => Ok(ArmourClass::Shield),
            _ => Err(Error::UnknownVariant {
                kind: "armour class",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ArmourClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eighteen standard skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Skill::Acrobatics => "acrobatics",
            Skill::AnimalHandling => "animal_handling",
            Skill::Arcana => "arcana",
            Skill::Athletics => "athletics",
            Skill::Deception => "deception",
            Skill::History => "history",
            Skill::Insight => "insight",
            Skill::Intimidation => "intimidation",
            Skill::Investigation => "investigation",
            Skill::Medicine => "medicine",
            Skill::Nature => "nature",
            Skill::Perception => "perception",
            Skill::Performance => "performance",
            Skill::Persuasion => "persuasion",
            Skill::Religion => "religion",
            Skill::SleightOfHand => "sleight_of_hand",
            Skill::Stealth => "stealth",
            Skill::Survival => "survival",
        }
    }

    const ALL: [Skill; 18] = [
        Skill::Acrobatics,
        Skill::AnimalHandling,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Deception,
        Skill::History,
        Skill::Insight,
        Skill::Intimidation,
        Skill::Investigation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Perception,
        Skill::Performance,
        Skill::Persuasion,
        Skill::Religion,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Survival,
    ];
}

impl FromStr for Skill {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let needle = normalized("skill", s)?;
        Skill::ALL
            .iter()
            .find(|skill| skill.as_str() == needle)
            .copied()
            .ok_or_else(|| Error::UnknownVariant {
                kind: "skill",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad categories of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    ArtisanTools,
    GamingSet,
    MusicalInstrument,
    Miscellaneous,
}

impl ToolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ToolKind::ArtisanTools => "artisan_tools",
            ToolKind::GamingSet => "gaming_set",
            ToolKind::MusicalInstrument => "musical_instrument",
            ToolKind::Miscellaneous => "miscellaneous",
        }
    }
}

impl FromStr for ToolKind {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match normalized("tool kind", s)?.as_str() {
            "artisan_tools" => Ok(ToolKind::ArtisanTools),
            "gaming_set" => Ok(ToolKind::GamingSet),
            "musical_instrument" => Ok(ToolKind::MusicalInstrument),
            "miscellaneous" => Ok(ToolKind::Miscellaneous),
            _ => Err(Error::UnknownVariant {
                kind: "tool kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminator selecting which proficiency subtype table a base row
/// refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyType {
    Armour,
    Skill,
    Tool,
}

impl ProficiencyType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProficiencyType::Armour => "armour",
            ProficiencyType::Skill => "skill",
            ProficiencyType::Tool => "tool",
        }
    }
}

impl FromStr for ProficiencyType {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match normalized("proficiency type", s)?.as_str() {
            "armour" => Ok(ProficiencyType::Armour),
            "skill" => Ok(ProficiencyType::Skill),
            "tool" => Ok(ProficiencyType::Tool),
            _ => Err(Error::UnknownVariant {
                kind: "proficiency type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProficiencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persistable entity kinds. Doubles as the modifier-source kind
/// recorded in the `modifier_source` table, so `as_str` matches the
/// entity's own table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Asm,
    Feat,
    Language,
    Proficiency,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Asm,
        EntityKind::Feat,
        EntityKind::Language,
        EntityKind::Proficiency,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Asm => "asm",
            EntityKind::Feat => "feat",
            EntityKind::Language => "language",
            EntityKind::Proficiency => "proficiency",
        }
    }

    /// Whether entities of this kind implement the given capability.
    #[must_use]
    pub const fn satisfies(self, capability: Capability) -> bool {
        match capability {
            Capability::ModifierSupplier => matches!(self, EntityKind::Feat),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract capabilities an entity kind can satisfy, used by the
/// mapper registry's fallback resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Supplies collections of modifiers to a character
    /// (see [`crate::ModifierSupplier`]).
    ModifierSupplier,
}

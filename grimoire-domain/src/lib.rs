//! Domain model for the Grimoire tabletop character service.
//!
//! This crate defines the persistable domain types shared by the
//! service and persistence layers:
//! - Typed, single-assignment entity identifiers
//! - The four character-modifier entities (ability-score modifier,
//!   feat, language, proficiency) and their supporting enums
//! - The [`ModifierSupplier`] capability: any entity that supplies a
//!   collection of modifiers to a character
//!
//! Business rules (point-buy scoring, leveling, choice resolution)
//! live in the service layer, not here.

mod entity;
mod ids;
mod kinds;
mod modifiers;
mod supplier;

pub use entity::Entity;
pub use ids::EntityId;
pub use kinds::{
    Ability, ArmourClass, Capability, EntityKind, ProficiencyType, Skill, ToolKind,
};
pub use modifiers::{AbilityScoreModifier, Feat, Language, Proficiency, ProficiencyKind};
pub use supplier::ModifierSupplier;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing or parsing domain values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("{0} must not be blank")]
    Blank(&'static str),
}

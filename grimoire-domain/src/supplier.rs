use crate::modifiers::{AbilityScoreModifier, Feat, Language, Proficiency};

/// Capability contract for entities that supply modifiers to a
/// character (feats, and later class/race templates). Implementors
/// override only the accessors relevant to them; the rest default to
/// an empty collection.
pub trait ModifierSupplier {
    fn ability_score_modifiers(&self) -> &[AbilityScoreModifier] {
        &[]
    }

    fn feats(&self) -> &[Feat] {
        &[]
    }

    fn languages(&self) -> &[Language] {
        &[]
    }

    fn proficiencies(&self) -> &[Proficiency] {
        &[]
    }
}

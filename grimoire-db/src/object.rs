//! Runtime-dispatched domain objects.
//!
//! The unit of work tracks heterogeneous entities; [`DomainObject`]
//! is the exhaustive sum over the persistable kinds, and [`Tracked`]
//! the shared handle the ledger holds. Set membership in the ledger
//! is object identity (`Rc::ptr_eq`), not value equality, so two
//! equal-but-distinct entities are tracked independently.

use std::cell::RefCell;
use std::rc::Rc;

use grimoire_domain::{
    AbilityScoreModifier, Entity, EntityKind, Feat, Language, Proficiency,
};

/// A persistable entity of any kind.
#[derive(Debug, Clone)]
pub enum DomainObject {
    Asm(AbilityScoreModifier),
    Feat(Feat),
    Language(Language),
    Proficiency(Proficiency),
}

impl DomainObject {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            DomainObject::Asm(_) => EntityKind::Asm,
            DomainObject::Feat(_) => EntityKind::Feat,
            DomainObject::Language(_) => EntityKind::Language,
            DomainObject::Proficiency(_) => EntityKind::Proficiency,
        }
    }
}

impl From<AbilityScoreModifier> for DomainObject {
    fn from(value: AbilityScoreModifier) -> Self {
        DomainObject::Asm(value)
    }
}

impl From<Feat> for DomainObject {
    fn from(value: Feat) -> Self {
        DomainObject::Feat(value)
    }
}

impl From<Language> for DomainObject {
    fn from(value: Language) -> Self {
        DomainObject::Language(value)
    }
}

impl From<Proficiency> for DomainObject {
    fn from(value: Proficiency) -> Self {
        DomainObject::Proficiency(value)
    }
}

/// Shared handle to a tracked object. The caller keeps a clone so the
/// identifier assigned during commit is visible afterwards.
pub type Tracked = Rc<RefCell<DomainObject>>;

/// Wraps an entity for unit-of-work registration.
pub fn track(obj: impl Into<DomainObject>) -> Tracked {
    Rc::new(RefCell::new(obj.into()))
}

/// An entity type that is one variant of [`DomainObject`]. Lets typed
/// mappers be driven through the erased dispatch surface.
pub trait ObjectVariant: Entity {
    const KIND: EntityKind;

    fn from_object(obj: &DomainObject) -> Option<&Self>;
    fn from_object_mut(obj: &mut DomainObject) -> Option<&mut Self>;
}

macro_rules! impl_object_variant {
    ($ty:ty, $variant:ident, $kind:expr) => {
        impl ObjectVariant for $ty {
            const KIND: EntityKind = $kind;

            fn from_object(obj: &DomainObject) -> Option<&Self> {
                match obj {
                    DomainObject::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_object_mut(obj: &mut DomainObject) -> Option<&mut Self> {
                match obj {
                    DomainObject::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_object_variant!(AbilityScoreModifier, Asm, EntityKind::Asm);
impl_object_variant!(Feat, Feat, EntityKind::Feat);
impl_object_variant!(Language, Language, EntityKind::Language);
impl_object_variant!(Proficiency, Proficiency, EntityKind::Proficiency);

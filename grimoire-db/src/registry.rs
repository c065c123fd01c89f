//! Mapper resolution.
//!
//! The registry resolves the mapper for a runtime entity kind: exact
//! registration first, then the first registered capability the kind
//! satisfies. A miss is a wiring mistake; callers surface it as
//! [`crate::DbError::MapperMissing`] rather than recovering.

use std::collections::HashMap;
use std::sync::Arc;

use grimoire_domain::{Capability, EntityKind};

use crate::mapper::ErasedMapper;
use crate::mappers::{AsmMapper, FeatMapper, LanguageMapper, ProficiencyMapper};

#[derive(Default)]
pub struct MapperRegistry {
    exact: HashMap<EntityKind, Arc<dyn ErasedMapper>>,
    fallbacks: Vec<(Capability, Arc<dyn ErasedMapper>)>,
}

impl MapperRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The production registry: every persistable kind wired to its
    /// mapper.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(EntityKind::Asm, AsmMapper::new());
        registry.register(EntityKind::Feat, FeatMapper::new());
        registry.register(EntityKind::Language, LanguageMapper::new());
        registry.register(EntityKind::Proficiency, ProficiencyMapper::new());
        registry
    }

    pub fn register(&mut self, kind: EntityKind, mapper: impl ErasedMapper + 'static) {
        self.exact.insert(kind, Arc::new(mapper));
    }

    /// Registers a mapper for every kind satisfying `capability`,
    /// consulted only when no exact registration matches.
    pub fn register_fallback(&mut self, capability: Capability, mapper: impl ErasedMapper + 'static) {
        self.fallbacks.push((capability, Arc::new(mapper)));
    }

    /// Resolves the mapper for `kind`: exact match, then capability
    /// fallback in registration order.
    #[must_use]
    pub fn resolve(&self, kind: EntityKind) -> Option<&dyn ErasedMapper> {
        if let Some(mapper) = self.exact.get(&kind) {
            return Some(mapper.as_ref());
        }
        self.fallbacks
            .iter()
            .find(|(capability, _)| kind.satisfies(*capability))
            .map(|(_, mapper)| mapper.as_ref())
    }
}

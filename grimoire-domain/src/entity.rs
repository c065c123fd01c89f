use crate::ids::EntityId;

/// A domain object eligible for persistence.
///
/// An entity starts life without an identifier (transient), receives
/// one exactly once at its first successful insert, and keeps that
/// identifier for the rest of its in-memory lifetime, even after the
/// corresponding row has been deleted.
pub trait Entity: Sized {
    /// The entity's identifier, if it has been persisted.
    fn id(&self) -> Option<EntityId<Self>>;

    /// Assigns the identifier. Single assignment: returns `false` and
    /// leaves the existing value untouched if one is already set.
    fn set_id(&mut self, id: EntityId<Self>) -> bool;

    /// Whether the entity has been persisted.
    fn has_id(&self) -> bool {
        self.id().is_some()
    }
}

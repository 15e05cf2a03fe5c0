//! Entity trait: things that keep their identity while their state changes.

/// Entity marker + minimal interface.
///
/// Products and carts are entities: two values with the same id are the same
/// thing, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Identity comparison, independent of any other field.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

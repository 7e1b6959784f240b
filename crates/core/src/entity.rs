//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Human-readable entity name used in error messages ("donor", "recipient", ...).
    const NAME: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

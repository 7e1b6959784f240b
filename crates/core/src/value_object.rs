//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; two blood groups with the same label
//! are the same blood group.

/// Marker trait for value objects.
///
/// The trait requires:
/// - **Clone**: value objects are copied freely, never shared-mutable
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: shows up in logs and test failures
///
/// ```ignore
/// let a: BloodGroup = "O+".parse()?;
/// let b: BloodGroup = "o+".parse()?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

//! `bloodbank-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod blood_group;
pub mod entity;
pub mod error;
pub mod gender;
pub mod id;
pub mod validate;
pub mod value_object;

pub use blood_group::BloodGroup;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use gender::Gender;
pub use id::{BloodRequestId, DonationId, DonorId, RecipientId};
pub use value_object::ValueObject;

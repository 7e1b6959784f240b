//! Recipient domain module: people who need blood and the requests filed
//! on their behalf. Pure domain logic (no IO, no HTTP, no storage).

pub mod recipient;
pub mod request;
pub mod status;

pub use recipient::{Recipient, RecipientDetails, MAX_RECIPIENT_AGE, MIN_RECIPIENT_AGE};
pub use request::{BloodRequest, NewBloodRequest, MAX_REQUEST_ML, MIN_REQUEST_ML};
pub use status::RequestStatus;

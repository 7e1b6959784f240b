//! Donor registry domain module.
//!
//! Donors and the donations they give, with the field rules each record
//! must satisfy. Pure domain logic (no IO, no HTTP, no storage).

pub mod donation;
pub mod donor;

pub use donation::{Donation, DonationDetails, MAX_DONATION_ML, MIN_DONATION_ML};
pub use donor::{Donor, DonorDetails, MAX_DONOR_AGE, MIN_DONOR_AGE};

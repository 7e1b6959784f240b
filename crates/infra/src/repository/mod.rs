//! Row-level access to each table.
//!
//! Every function takes the `&mut SqliteConnection` of the caller's
//! [`UnitOfWork`](crate::UnitOfWork), so a command's reads and writes share
//! one transaction. Listings are newest first (`rowid DESC`).

use std::str::FromStr;

use bloodbank_core::DomainError;

use crate::error::{ServiceError, ServiceResult};

pub mod donations;
pub mod donors;
pub mod recipients;
pub mod requests;

/// Parse a stored enum label (blood group, gender, status).
pub(crate) fn label<T>(entity: &'static str, value: &str) -> ServiceResult<T>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(|e: DomainError| ServiceError::Decode {
        entity,
        message: e.to_string(),
    })
}

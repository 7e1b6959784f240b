//! Error type returned by the persistence layer and the service facade.
//!
//! ## Error Mapping
//!
//! | sqlx error | SQLite constraint | ServiceError |
//! |------------|-------------------|--------------|
//! | Database (check violation) | `CHECK` | `Domain(Validation)` |
//! | Database (foreign key violation) | `FOREIGN KEY` | `Domain(Conflict)` |
//! | Database (unique violation) | `UNIQUE` / `PRIMARY KEY` | `Domain(Conflict)` |
//! | anything else | - | `Database` |
//!
//! Repositories that insert rows carrying a reference remap foreign key
//! violations to a validation error on the referencing field instead
//! (see [`ServiceError::dangling_reference`]).

use bloodbank_core::DomainError;
use sqlx::error::ErrorKind;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt {entity} row: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Map a failed insert whose only foreign key is `field`.
    pub fn dangling_reference(field: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), ErrorKind::ForeignKeyViolation) {
                return DomainError::validation(field, "references a record that does not exist")
                    .into();
            }
        }
        err.into()
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let message = db_err.message().to_string();
            match db_err.kind() {
                ErrorKind::CheckViolation => {
                    return DomainError::validation("record", message).into();
                }
                ErrorKind::ForeignKeyViolation => {
                    return DomainError::conflict(format!(
                        "record is still referenced by other records ({message})"
                    ))
                    .into();
                }
                ErrorKind::UniqueViolation => {
                    return DomainError::conflict(message).into();
                }
                _ => {}
            }
        }
        ServiceError::Database(err)
    }
}

//! Command/query facade over the store.
//!
//! Each public method is one unit of work: it opens a transaction, runs its
//! reads and writes through the repositories, and commits. Any error
//! returned before the commit rolls everything back.

mod donations;
mod donors;
mod inventory;
mod recipients;
mod reports;
mod requests;

pub use reports::{Counts, Dashboard, Stats};

use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use bloodbank_core::{DomainError, DonorId, Entity, RecipientId};
use bloodbank_donors::Donor;
use bloodbank_recipients::Recipient;

use crate::db::{self, DatabaseConfig};
use crate::error::ServiceResult;
use crate::repository;
use crate::unit_of_work::UnitOfWork;

#[derive(Debug, Clone)]
pub struct BloodBankService {
    pool: SqlitePool,
}

impl BloodBankService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema exists.
    #[instrument(skip(config))]
    pub async fn open(config: &DatabaseConfig) -> ServiceResult<Self> {
        let pool = db::connect(config).await?;
        db::migrate(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> ServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> ServiceResult<UnitOfWork> {
        UnitOfWork::begin(&self.pool).await
    }

    async fn begin_write(&self) -> ServiceResult<UnitOfWork> {
        UnitOfWork::begin_write(&self.pool).await
    }
}

async fn require_donor(conn: &mut SqliteConnection, id: DonorId) -> ServiceResult<Donor> {
    repository::donors::fetch(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found(Donor::NAME, id).into())
}

async fn require_recipient(conn: &mut SqliteConnection, id: RecipientId) -> ServiceResult<Recipient> {
    repository::recipients::fetch(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found(Recipient::NAME, id).into())
}

fn unknown_reference(field: &str, entity: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::validation(field, format!("{entity} {id} does not exist"))
}

//! One database transaction per service command.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::error::ServiceResult;

/// Every repository call of a command goes through the same transaction.
///
/// Dropping a `UnitOfWork` without committing rolls the transaction back,
/// so an early `?` return leaves the store untouched.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Deferred transaction for commands that only read.
    pub async fn begin(pool: &SqlitePool) -> ServiceResult<Self> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// Transaction holding the database write lock from its first statement.
    ///
    /// A deferred transaction that reads before it writes cannot upgrade its
    /// lock while another connection is writing, and SQLite fails it with
    /// `SQLITE_BUSY` instead of waiting. Taking the lock in `BEGIN` makes
    /// concurrent writers queue on the busy timeout.
    pub async fn begin_write(pool: &SqlitePool) -> ServiceResult<Self> {
        Ok(Self {
            tx: pool.begin_with("BEGIN IMMEDIATE").await?,
        })
    }

    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> ServiceResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

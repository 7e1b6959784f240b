//! Persistent inventory ledger.
//!
//! Entries are validated by [`LedgerEntry::apply`] against the current row
//! and then written as a single relative `UPDATE`/upsert, so concurrent
//! postings serialize in SQLite instead of overwriting each other. The
//! `CHECK (total_units >= 0)` constraint backs the guard.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};
use tracing::{debug, info};

use bloodbank_core::{BloodGroup, DomainError};
use bloodbank_inventory::{BloodInventory, InventorySnapshot, LedgerEntry};

use crate::error::{ServiceError, ServiceResult};
use crate::repository::label;

#[derive(Debug)]
struct InventoryRow {
    blood_group: String,
    total_units: i64,
    last_updated: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for InventoryRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryRow {
            blood_group: row.try_get("blood_group")?,
            total_units: row.try_get("total_units")?,
            last_updated: row.try_get("last_updated")?,
        })
    }
}

impl TryFrom<InventoryRow> for BloodInventory {
    type Error = ServiceError;

    fn try_from(row: InventoryRow) -> ServiceResult<Self> {
        Ok(BloodInventory {
            blood_group: label("inventory", &row.blood_group)?,
            total_units: row.total_units,
            last_updated: row.last_updated,
        })
    }
}

fn decode(row: &SqliteRow) -> ServiceResult<BloodInventory> {
    InventoryRow::from_row(row)?.try_into()
}

pub async fn fetch(
    conn: &mut SqliteConnection,
    blood_group: BloodGroup,
) -> ServiceResult<Option<BloodInventory>> {
    let row = sqlx::query(
        "SELECT blood_group, total_units, last_updated FROM blood_inventory WHERE blood_group = ?1",
    )
    .bind(blood_group.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(decode).transpose()
}

/// Every persisted row, ordered by blood group label.
pub async fn rows(conn: &mut SqliteConnection) -> ServiceResult<Vec<BloodInventory>> {
    let rows = sqlx::query(
        "SELECT blood_group, total_units, last_updated FROM blood_inventory ORDER BY blood_group",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(decode).collect()
}

pub async fn snapshot(conn: &mut SqliteConnection) -> ServiceResult<InventorySnapshot> {
    let rows = rows(conn).await?;
    Ok(InventorySnapshot::from_rows(&rows))
}

/// Units on hand for one group; 0 when the group has no row.
pub async fn units(conn: &mut SqliteConnection, blood_group: BloodGroup) -> ServiceResult<i64> {
    Ok(fetch(conn, blood_group)
        .await?
        .map(|row| row.total_units)
        .unwrap_or(0))
}

/// Apply one entry and return the resulting row.
///
/// Rejected entries leave the stored total untouched.
pub async fn post(
    conn: &mut SqliteConnection,
    entry: LedgerEntry,
    now: DateTime<Utc>,
) -> ServiceResult<BloodInventory> {
    let blood_group = entry.blood_group();
    let delta = entry.delta_units();

    let current = fetch(conn, blood_group).await?;
    entry.apply(current.as_ref(), now)?;

    let row = if delta >= 0 {
        sqlx::query(
            r#"
            INSERT INTO blood_inventory (blood_group, total_units, last_updated)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (blood_group) DO UPDATE
            SET total_units = blood_inventory.total_units + excluded.total_units,
                last_updated = excluded.last_updated
            RETURNING blood_group, total_units, last_updated
            "#,
        )
        .bind(blood_group.as_str())
        .bind(delta)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?
    } else {
        sqlx::query(
            r#"
            UPDATE blood_inventory
            SET total_units = total_units + ?2,
                last_updated = ?3
            WHERE blood_group = ?1 AND total_units + ?2 >= 0
            RETURNING blood_group, total_units, last_updated
            "#,
        )
        .bind(blood_group.as_str())
        .bind(delta)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| {
            debug!(%blood_group, delta, "guarded ledger update matched no row");
            DomainError::validation(
                "delta_units",
                format!("adjusting {blood_group} by {delta} would leave negative stock"),
            )
        })?
    };

    let stored = decode(&row)?;
    info!(
        %blood_group,
        delta,
        total_units = stored.total_units,
        "inventory ledger posted"
    );
    Ok(stored)
}

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};
use uuid::Uuid;

use bloodbank_core::{BloodRequestId, RecipientId};
use bloodbank_recipients::{BloodRequest, RequestStatus};

use super::label;
use crate::error::{ServiceError, ServiceResult};
use crate::query::{exact_filter, Page, PageRequest, RequestListing};

#[derive(Debug)]
struct BloodRequestRow {
    id: Uuid,
    recipient_id: Uuid,
    blood_group: String,
    quantity_needed_ml: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for BloodRequestRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(BloodRequestRow {
            id: row.try_get("id")?,
            recipient_id: row.try_get("recipient_id")?,
            blood_group: row.try_get("blood_group")?,
            quantity_needed_ml: row.try_get("quantity_needed_ml")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<BloodRequestRow> for BloodRequest {
    type Error = ServiceError;

    fn try_from(row: BloodRequestRow) -> ServiceResult<Self> {
        Ok(BloodRequest {
            id: BloodRequestId::from_uuid(row.id),
            recipient_id: RecipientId::from_uuid(row.recipient_id),
            blood_group: label("blood request", &row.blood_group)?,
            quantity_needed_ml: row.quantity_needed_ml,
            status: label("blood request", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode(row: &SqliteRow) -> ServiceResult<BloodRequest> {
    BloodRequestRow::from_row(row)?.try_into()
}

pub async fn insert(conn: &mut SqliteConnection, request: &BloodRequest) -> ServiceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO blood_requests (
            id, recipient_id, blood_group, quantity_needed_ml, status, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(Uuid::from(request.id))
    .bind(Uuid::from(request.recipient_id))
    .bind(request.blood_group.as_str())
    .bind(request.quantity_needed_ml)
    .bind(request.status.as_str())
    .bind(request.created_at)
    .bind(request.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| ServiceError::dangling_reference("recipient_id", e))?;
    Ok(())
}

pub async fn fetch(
    conn: &mut SqliteConnection,
    id: BloodRequestId,
) -> ServiceResult<Option<BloodRequest>> {
    let row = sqlx::query(
        r#"
        SELECT id, recipient_id, blood_group, quantity_needed_ml, status, created_at, updated_at
        FROM blood_requests
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(id))
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(decode).transpose()
}

pub async fn update_status(
    conn: &mut SqliteConnection,
    id: BloodRequestId,
    status: RequestStatus,
    now: DateTime<Utc>,
) -> ServiceResult<bool> {
    let result = sqlx::query("UPDATE blood_requests SET status = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(Uuid::from(id))
        .bind(status.as_str())
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: BloodRequestId) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM blood_requests WHERE id = ?1")
        .bind(Uuid::from(id))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> ServiceResult<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM blood_requests")
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

pub async fn count_for_recipient(
    conn: &mut SqliteConnection,
    recipient_id: RecipientId,
) -> ServiceResult<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM blood_requests WHERE recipient_id = ?1")
        .bind(Uuid::from(recipient_id))
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

/// Newest first, optionally restricted to one exact status label.
///
/// A label that is not a known status simply matches nothing.
pub async fn list(
    conn: &mut SqliteConnection,
    status: Option<&str>,
    page: PageRequest,
) -> ServiceResult<Page<RequestListing>> {
    let status = exact_filter(status);

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM blood_requests WHERE ?1 IS NULL OR status = ?1",
    )
    .bind(status.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    let rows = sqlx::query(
        r#"
        SELECT q.id, q.recipient_id, q.blood_group, q.quantity_needed_ml, q.status,
               q.created_at, q.updated_at,
               r.name AS recipient_name
        FROM blood_requests q
        JOIN recipients r ON r.id = q.recipient_id
        WHERE ?1 IS NULL OR q.status = ?1
        ORDER BY q.rowid DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(status.as_deref())
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    let items = rows
        .iter()
        .map(|row| -> ServiceResult<RequestListing> {
            Ok(RequestListing {
                request: decode(row)?,
                recipient_name: row.try_get("recipient_name")?,
            })
        })
        .collect::<ServiceResult<Vec<_>>>()?;
    Ok(Page::new(items, page, total))
}

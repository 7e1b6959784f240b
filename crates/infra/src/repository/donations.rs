use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};
use uuid::Uuid;

use bloodbank_core::{DonationId, DonorId};
use bloodbank_donors::Donation;

use super::label;
use crate::error::{ServiceError, ServiceResult};
use crate::query::{like_pattern, DonationListing, Page, PageRequest};

#[derive(Debug)]
struct DonationRow {
    id: Uuid,
    donor_id: Uuid,
    donation_date: NaiveDate,
    blood_volume_ml: i32,
    hospital: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for DonationRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(DonationRow {
            id: row.try_get("id")?,
            donor_id: row.try_get("donor_id")?,
            donation_date: row.try_get("donation_date")?,
            blood_volume_ml: row.try_get("blood_volume_ml")?,
            hospital: row.try_get("hospital")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<DonationRow> for Donation {
    fn from(row: DonationRow) -> Self {
        Donation {
            id: DonationId::from_uuid(row.id),
            donor_id: DonorId::from_uuid(row.donor_id),
            donation_date: row.donation_date,
            blood_volume_ml: row.blood_volume_ml,
            hospital: row.hospital,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn decode(row: &SqliteRow) -> ServiceResult<Donation> {
    Ok(DonationRow::from_row(row)?.into())
}

fn decode_listing(row: &SqliteRow) -> ServiceResult<DonationListing> {
    let donor_blood_group: String = row.try_get("donor_blood_group")?;
    Ok(DonationListing {
        donation: decode(row)?,
        donor_name: row.try_get("donor_name")?,
        donor_blood_group: label("donor", &donor_blood_group)?,
    })
}

pub async fn insert(conn: &mut SqliteConnection, donation: &Donation) -> ServiceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO donations (
            id, donor_id, donation_date, blood_volume_ml, hospital, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(Uuid::from(donation.id))
    .bind(Uuid::from(donation.donor_id))
    .bind(donation.donation_date)
    .bind(donation.blood_volume_ml)
    .bind(&donation.hospital)
    .bind(donation.created_at)
    .bind(donation.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| ServiceError::dangling_reference("donor_id", e))?;
    Ok(())
}

pub async fn fetch(
    conn: &mut SqliteConnection,
    id: DonationId,
) -> ServiceResult<Option<Donation>> {
    let row = sqlx::query(
        r#"
        SELECT id, donor_id, donation_date, blood_volume_ml, hospital, created_at, updated_at
        FROM donations
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(id))
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(decode).transpose()
}

pub async fn update(conn: &mut SqliteConnection, donation: &Donation) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE donations
        SET donor_id = ?2, donation_date = ?3, blood_volume_ml = ?4, hospital = ?5,
            updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(donation.id))
    .bind(Uuid::from(donation.donor_id))
    .bind(donation.donation_date)
    .bind(donation.blood_volume_ml)
    .bind(&donation.hospital)
    .bind(donation.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| ServiceError::dangling_reference("donor_id", e))?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: DonationId) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM donations WHERE id = ?1")
        .bind(Uuid::from(id))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> ServiceResult<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM donations")
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

pub async fn count_for_donor(conn: &mut SqliteConnection, donor_id: DonorId) -> ServiceResult<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE donor_id = ?1")
        .bind(Uuid::from(donor_id))
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

/// The `limit` most recently recorded donations, newest first.
pub async fn recent(conn: &mut SqliteConnection, limit: i64) -> ServiceResult<Vec<DonationListing>> {
    let rows = sqlx::query(
        r#"
        SELECT d.id, d.donor_id, d.donation_date, d.blood_volume_ml, d.hospital,
               d.created_at, d.updated_at,
               o.name AS donor_name, o.blood_group AS donor_blood_group
        FROM donations d
        JOIN donors o ON o.id = d.donor_id
        ORDER BY d.rowid DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(decode_listing).collect()
}

/// Newest first, optionally filtered by a case-insensitive substring of the
/// donor's name or blood group.
pub async fn list(
    conn: &mut SqliteConnection,
    search: Option<&str>,
    page: PageRequest,
) -> ServiceResult<Page<DonationListing>> {
    let pattern = like_pattern(search);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM donations d
        JOIN donors o ON o.id = d.donor_id
        WHERE ?1 IS NULL
           OR o.name LIKE ?1 ESCAPE '\'
           OR o.blood_group LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(pattern.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    let rows = sqlx::query(
        r#"
        SELECT d.id, d.donor_id, d.donation_date, d.blood_volume_ml, d.hospital,
               d.created_at, d.updated_at,
               o.name AS donor_name, o.blood_group AS donor_blood_group
        FROM donations d
        JOIN donors o ON o.id = d.donor_id
        WHERE ?1 IS NULL
           OR o.name LIKE ?1 ESCAPE '\'
           OR o.blood_group LIKE ?1 ESCAPE '\'
        ORDER BY d.rowid DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(pattern.as_deref())
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    let items = rows
        .iter()
        .map(decode_listing)
        .collect::<ServiceResult<Vec<_>>>()?;
    Ok(Page::new(items, page, total))
}

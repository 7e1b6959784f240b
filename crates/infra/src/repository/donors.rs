use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};
use uuid::Uuid;

use bloodbank_core::DonorId;
use bloodbank_donors::Donor;

use super::label;
use crate::error::{ServiceError, ServiceResult};
use crate::query::{like_pattern, Page, PageRequest};

#[derive(Debug)]
struct DonorRow {
    id: Uuid,
    name: String,
    age: i32,
    gender: String,
    blood_group: String,
    phone: String,
    email: String,
    address: String,
    last_donation_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for DonorRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(DonorRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
            blood_group: row.try_get("blood_group")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
            last_donation_date: row.try_get("last_donation_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<DonorRow> for Donor {
    type Error = ServiceError;

    fn try_from(row: DonorRow) -> ServiceResult<Self> {
        Ok(Donor {
            id: DonorId::from_uuid(row.id),
            name: row.name,
            age: row.age,
            gender: label("donor", &row.gender)?,
            blood_group: label("donor", &row.blood_group)?,
            phone: row.phone,
            email: row.email,
            address: row.address,
            last_donation_date: row.last_donation_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode(row: &SqliteRow) -> ServiceResult<Donor> {
    DonorRow::from_row(row)?.try_into()
}

pub async fn insert(conn: &mut SqliteConnection, donor: &Donor) -> ServiceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO donors (
            id, name, age, gender, blood_group, phone, email, address,
            last_donation_date, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(Uuid::from(donor.id))
    .bind(&donor.name)
    .bind(donor.age)
    .bind(donor.gender.as_str())
    .bind(donor.blood_group.as_str())
    .bind(&donor.phone)
    .bind(&donor.email)
    .bind(&donor.address)
    .bind(donor.last_donation_date)
    .bind(donor.created_at)
    .bind(donor.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch(conn: &mut SqliteConnection, id: DonorId) -> ServiceResult<Option<Donor>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, age, gender, blood_group, phone, email, address,
               last_donation_date, created_at, updated_at
        FROM donors
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(id))
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(decode).transpose()
}

/// Overwrite every column of an existing donor. Returns false if it is gone.
pub async fn update(conn: &mut SqliteConnection, donor: &Donor) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE donors
        SET name = ?2, age = ?3, gender = ?4, blood_group = ?5, phone = ?6,
            email = ?7, address = ?8, last_donation_date = ?9, updated_at = ?10
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(donor.id))
    .bind(&donor.name)
    .bind(donor.age)
    .bind(donor.gender.as_str())
    .bind(donor.blood_group.as_str())
    .bind(&donor.phone)
    .bind(&donor.email)
    .bind(&donor.address)
    .bind(donor.last_donation_date)
    .bind(donor.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: DonorId) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM donors WHERE id = ?1")
        .bind(Uuid::from(id))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> ServiceResult<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM donors")
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

/// Newest first, optionally filtered by a case-insensitive substring of
/// name, blood group or email.
pub async fn list(
    conn: &mut SqliteConnection,
    search: Option<&str>,
    page: PageRequest,
) -> ServiceResult<Page<Donor>> {
    let pattern = like_pattern(search);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM donors
        WHERE ?1 IS NULL
           OR name LIKE ?1 ESCAPE '\'
           OR blood_group LIKE ?1 ESCAPE '\'
           OR email LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(pattern.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    let rows = sqlx::query(
        r#"
        SELECT id, name, age, gender, blood_group, phone, email, address,
               last_donation_date, created_at, updated_at
        FROM donors
        WHERE ?1 IS NULL
           OR name LIKE ?1 ESCAPE '\'
           OR blood_group LIKE ?1 ESCAPE '\'
           OR email LIKE ?1 ESCAPE '\'
        ORDER BY rowid DESC
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(pattern.as_deref())
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    let items = rows.iter().map(decode).collect::<ServiceResult<Vec<_>>>()?;
    Ok(Page::new(items, page, total))
}

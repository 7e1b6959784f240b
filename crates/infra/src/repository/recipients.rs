use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};
use uuid::Uuid;

use bloodbank_core::RecipientId;
use bloodbank_recipients::Recipient;

use super::label;
use crate::error::{ServiceError, ServiceResult};
use crate::query::{like_pattern, Page, PageRequest};

#[derive(Debug)]
struct RecipientRow {
    id: Uuid,
    name: String,
    age: i32,
    gender: String,
    blood_group: String,
    phone: String,
    email: String,
    address: String,
    request_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for RecipientRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(RecipientRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
            blood_group: row.try_get("blood_group")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
            request_status: row.try_get("request_status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<RecipientRow> for Recipient {
    type Error = ServiceError;

    fn try_from(row: RecipientRow) -> ServiceResult<Self> {
        Ok(Recipient {
            id: RecipientId::from_uuid(row.id),
            name: row.name,
            age: row.age,
            gender: label("recipient", &row.gender)?,
            blood_group: label("recipient", &row.blood_group)?,
            phone: row.phone,
            email: row.email,
            address: row.address,
            request_status: label("recipient", &row.request_status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode(row: &SqliteRow) -> ServiceResult<Recipient> {
    RecipientRow::from_row(row)?.try_into()
}

pub async fn insert(conn: &mut SqliteConnection, recipient: &Recipient) -> ServiceResult<()> {
    sqlx::query(
        r#"
        INSERT INTO recipients (
            id, name, age, gender, blood_group, phone, email, address,
            request_status, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(Uuid::from(recipient.id))
    .bind(&recipient.name)
    .bind(recipient.age)
    .bind(recipient.gender.as_str())
    .bind(recipient.blood_group.as_str())
    .bind(&recipient.phone)
    .bind(&recipient.email)
    .bind(&recipient.address)
    .bind(recipient.request_status.as_str())
    .bind(recipient.created_at)
    .bind(recipient.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch(
    conn: &mut SqliteConnection,
    id: RecipientId,
) -> ServiceResult<Option<Recipient>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, age, gender, blood_group, phone, email, address,
               request_status, created_at, updated_at
        FROM recipients
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(id))
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(decode).transpose()
}

pub async fn update(conn: &mut SqliteConnection, recipient: &Recipient) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE recipients
        SET name = ?2, age = ?3, gender = ?4, blood_group = ?5, phone = ?6,
            email = ?7, address = ?8, request_status = ?9, updated_at = ?10
        WHERE id = ?1
        "#,
    )
    .bind(Uuid::from(recipient.id))
    .bind(&recipient.name)
    .bind(recipient.age)
    .bind(recipient.gender.as_str())
    .bind(recipient.blood_group.as_str())
    .bind(&recipient.phone)
    .bind(&recipient.email)
    .bind(&recipient.address)
    .bind(recipient.request_status.as_str())
    .bind(recipient.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, id: RecipientId) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM recipients WHERE id = ?1")
        .bind(Uuid::from(id))
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> ServiceResult<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM recipients")
        .fetch_one(&mut *conn)
        .await?;
    Ok(total)
}

/// Newest first, optionally filtered by a case-insensitive substring of
/// name, blood group or request status.
pub async fn list(
    conn: &mut SqliteConnection,
    search: Option<&str>,
    page: PageRequest,
) -> ServiceResult<Page<Recipient>> {
    let pattern = like_pattern(search);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM recipients
        WHERE ?1 IS NULL
           OR name LIKE ?1 ESCAPE '\'
           OR blood_group LIKE ?1 ESCAPE '\'
           OR request_status LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(pattern.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    let rows = sqlx::query(
        r#"
        SELECT id, name, age, gender, blood_group, phone, email, address,
               request_status, created_at, updated_at
        FROM recipients
        WHERE ?1 IS NULL
           OR name LIKE ?1 ESCAPE '\'
           OR blood_group LIKE ?1 ESCAPE '\'
           OR request_status LIKE ?1 ESCAPE '\'
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

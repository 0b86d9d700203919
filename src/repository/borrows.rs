//! Borrow ledger repository

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetailRow, BorrowRecord},
};

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.book_id, r.borrow_date, r.due_date, r.return_date, r.is_returned,
           b.title, b.author, b.genre, b.total_copies, b.available_copies
    FROM borrow_records r
    JOIN books b ON b.id = r.book_id
"#;

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: SqlitePool,
}

impl BorrowsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// A user's records: active first, then most recent borrow first
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<BorrowDetailRow>> {
        let rows = sqlx::query_as::<_, BorrowDetailRow>(&format!(
            "{} WHERE r.user_id = ? ORDER BY r.is_returned, r.borrow_date DESC, r.id DESC",
            DETAIL_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every record in the ledger, in insertion order
    pub async fn list_all(&self) -> AppResult<Vec<BorrowDetailRow>> {
        let rows = sqlx::query_as::<_, BorrowDetailRow>(&format!("{} ORDER BY r.id", DETAIL_SELECT))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Count active borrows of a book
    pub async fn count_active_for_book(&self, book_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = ? AND is_returned = 0",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

/// Append a new active record
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    book_id: i64,
    borrow_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
) -> AppResult<BorrowRecord> {
    let record = sqlx::query_as::<_, BorrowRecord>(
        r#"
        INSERT INTO borrow_records (user_id, book_id, borrow_date, due_date, return_date, is_returned)
        VALUES (?, ?, ?, ?, NULL, 0)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(book_id)
    .bind(borrow_date)
    .bind(due_date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(record)
}

/// Mark an active record as returned. Returns `None` if it was already
/// returned (or does not exist).
pub async fn mark_returned(
    conn: &mut SqliteConnection,
    id: i64,
    return_date: DateTime<Utc>,
) -> AppResult<Option<BorrowRecord>> {
    let record = sqlx::query_as::<_, BorrowRecord>(
        r#"
        UPDATE borrow_records
        SET return_date = ?, is_returned = 1
        WHERE id = ? AND is_returned = 0
        RETURNING *
        "#,
    )
    .bind(return_date)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(record)
}

pub async fn count_active_for_user(conn: &mut SqliteConnection, user_id: i64) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM borrow_records WHERE user_id = ? AND is_returned = 0",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

pub async fn count_active_for_user_book(
    conn: &mut SqliteConnection,
    user_id: i64,
    book_id: i64,
) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM borrow_records WHERE user_id = ? AND book_id = ? AND is_returned = 0",
    )
    .bind(user_id)
    .bind(book_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

//! Books repository (catalog store)

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook, UpdateBook},
};

const BOOK_COLUMNS: &str = "id, title, author, genre, total_copies, available_copies";

#[derive(Clone)]
pub struct BooksRepository {
    pool: SqlitePool,
}

impl BooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All books in insertion order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = ?",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a book; copy counts must already be validated
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, genre, total_copies, available_copies)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.total_copies)
        .bind(book.available_copies())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Replace a book's fields, unless it has more active borrows than the new
    /// total. Returns `None` when the book is missing or the guard refused.
    pub async fn update(&self, id: i64, book: &UpdateBook) -> AppResult<Option<Book>> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = ?, author = ?, genre = ?, total_copies = ?, available_copies = ?
            WHERE id = ?
              AND (SELECT COUNT(*) FROM borrow_records
                   WHERE book_id = books.id AND is_returned = 0) <= ?
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(id)
        .bind(book.total_copies)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Delete a book that has no active borrows. Returns whether a row was deleted.
    pub async fn delete_if_idle(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM borrow_records
                              WHERE book_id = ? AND is_returned = 0)
            "#,
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Take one copy off the shelf. Returns `false` when the book is missing or
/// has no copy left.
pub async fn take_copy(conn: &mut SqliteConnection, book_id: i64) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE books SET available_copies = available_copies - 1 WHERE id = ? AND available_copies > 0",
    )
    .bind(book_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Put one copy back, never beyond `total_copies`. Returns `false` when the
/// count was already at the total (or the book is gone).
pub async fn put_back_copy(conn: &mut SqliteConnection, book_id: i64) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE books SET available_copies = available_copies + 1 WHERE id = ? AND available_copies < total_copies",
    )
    .bind(book_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn find(conn: &mut SqliteConnection, book_id: i64) -> AppResult<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(&format!(
        "SELECT {} FROM books WHERE id = ?",
        BOOK_COLUMNS
    ))
    .bind(book_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(book)
}

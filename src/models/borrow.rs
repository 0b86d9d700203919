//! Borrow record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::book::Book;

/// Borrow record from the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

impl BorrowRecord {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_returned && now > self.due_date
    }
}

/// Borrow record with its book, for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetail {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub book: Book,
    pub is_overdue: bool,
}

/// Flat join row (`borrow_records` x `books`)
#[derive(Debug, Clone, FromRow)]
pub struct BorrowDetailRow {
    id: i64,
    user_id: i64,
    book_id: i64,
    borrow_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    is_returned: bool,
    title: String,
    author: String,
    genre: String,
    total_copies: i32,
    available_copies: i32,
}

impl BorrowDetailRow {
    pub fn into_detail(self, now: DateTime<Utc>) -> BorrowDetail {
        let record = BorrowRecord {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            borrow_date: self.borrow_date,
            due_date: self.due_date,
            return_date: self.return_date,
            is_returned: self.is_returned,
        };
        let book = Book {
            id: self.book_id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
        };
        BorrowDetail {
            is_overdue: record.is_overdue(now),
            record,
            book,
        }
    }
}

/// Borrow on behalf of another user (admin only)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BorrowParams {
    /// Borrower, defaults to the caller
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn overdue_only_when_active_and_past_due() {
        let now = Utc::now();
        let mut record = BorrowRecord {
            id: 1,
            user_id: 1,
            book_id: 1,
            borrow_date: now - Duration::days(20),
            due_date: now - Duration::days(6),
            return_date: None,
            is_returned: false,
        };
        assert!(record.is_overdue(now));

        record.is_returned = true;
        record.return_date = Some(now);
        assert!(!record.is_overdue(now));

        record.is_returned = false;
        record.return_date = None;
        record.due_date = now + Duration::days(1);
        assert!(!record.is_overdue(now));
    }
}

//! Availability engine: borrowing and returning books

use chrono::{Duration, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{BorrowDetail, BorrowRecord, Identity},
    repository::{books, borrows, users, Repository},
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    policy: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, policy: LoansConfig) -> Self {
        Self { repository, policy }
    }

    /// Borrow a book for `user_id`.
    ///
    /// The copy count and the ledger are updated in one transaction. The
    /// conditional decrement runs first, so of several concurrent borrows of
    /// the last copy exactly one gets past it.
    pub async fn borrow(&self, identity: &Identity, user_id: i64, book_id: i64) -> AppResult<BorrowRecord> {
        identity.require_self_or_admin(user_id)?;

        let now = Utc::now();
        let due_date = now + Duration::days(self.policy.duration_days);

        let mut tx = self.repository.begin().await?;

        if !books::take_copy(&mut tx, book_id).await? {
            return Err(match books::find(&mut tx, book_id).await? {
                Some(book) => AppError::Unavailable(format!(
                    "No copies of '{}' are available for borrowing",
                    book.title
                )),
                None => AppError::NotFound(format!("Book with id {} not found", book_id)),
            });
        }

        let user = users::find(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))?;
        if !user.is_active {
            return Err(AppError::Unauthorized(format!(
                "User '{}' is inactive and cannot borrow",
                user.username
            )));
        }

        if self.policy.one_active_loan_per_book
            && borrows::count_active_for_user_book(&mut tx, user_id, book_id).await? > 0
        {
            return Err(AppError::BusinessRule(
                "User already has a copy of this book borrowed".to_string(),
            ));
        }

        if let Some(max) = self.policy.max_active_loans {
            let current = borrows::count_active_for_user(&mut tx, user_id).await?;
            if current >= i64::from(max) {
                return Err(AppError::BusinessRule(format!(
                    "Maximum active borrows reached ({}/{})",
                    current, max
                )));
            }
        }

        let record = borrows::insert(&mut tx, user_id, book_id, now, due_date).await?;
        tx.commit().await?;

        tracing::info!(
            borrow_id = record.id,
            user_id,
            book_id,
            due_date = %record.due_date,
            "Book borrowed"
        );
        Ok(record)
    }

    /// Return a borrowed book and put the copy back on the shelf
    pub async fn return_book(&self, identity: &Identity, borrow_id: i64) -> AppResult<BorrowRecord> {
        identity.require_active()?;

        let record = self.repository.borrows.get_by_id(borrow_id).await?;
        identity.require_self_or_admin(record.user_id)?;
        if record.is_returned {
            return Err(AppError::AlreadyReturned(format!(
                "Borrow record {} was already returned",
                borrow_id
            )));
        }

        let mut tx = self.repository.begin().await?;

        let returned = borrows::mark_returned(&mut tx, borrow_id, Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::AlreadyReturned(format!("Borrow record {} was already returned", borrow_id))
            })?;

        if !books::put_back_copy(&mut tx, returned.book_id).await? {
            tracing::warn!(
                borrow_id,
                book_id = returned.book_id,
                "Available copies already at total; count left unchanged"
            );
        }

        tx.commit().await?;

        tracing::info!(borrow_id, book_id = returned.book_id, user_id = returned.user_id, "Book returned");
        Ok(returned)
    }

    /// The caller's borrowing history, active borrows first
    pub async fn list_my_borrows(&self, identity: &Identity) -> AppResult<Vec<BorrowDetail>> {
        identity.require_active()?;
        let now = Utc::now();
        let rows = self.repository.borrows.list_for_user(identity.user_id).await?;
        Ok(rows.into_iter().map(|row| row.into_detail(now)).collect())
    }

    /// Every borrow record (admin only)
    pub async fn list_all_borrows(&self, identity: &Identity) -> AppResult<Vec<BorrowDetail>> {
        identity.require_admin()?;
        let now = Utc::now();
        let rows = self.repository.borrows.list_all().await?;
        Ok(rows.into_iter().map(|row| row.into_detail(now)).collect())
    }
}

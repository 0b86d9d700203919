//! Catalog management service (admin mutations)

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{check_copy_counts, NewBook, UpdateBook},
        Book, Identity,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every book, unfiltered (admin only)
    pub async fn list_books(&self, identity: &Identity) -> AppResult<Vec<Book>> {
        identity.require_admin()?;
        self.repository.books.list().await
    }

    /// Create a new book
    pub async fn create_book(&self, identity: &Identity, book: NewBook) -> AppResult<Book> {
        identity.require_admin()?;
        book.validate()?;
        check_copy_counts(book.total_copies, book.available_copies())?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "Book created");
        Ok(created)
    }

    /// Replace a book's fields and copy counts.
    ///
    /// Besides the availability invariant, the new total may not drop below
    /// the number of copies currently on loan.
    pub async fn update_book(&self, identity: &Identity, id: i64, book: UpdateBook) -> AppResult<Book> {
        identity.require_admin()?;
        book.validate()?;
        check_copy_counts(book.total_copies, book.available_copies)?;

        if let Some(updated) = self.repository.books.update(id, &book).await? {
            tracing::info!(book_id = id, "Book updated");
            return Ok(updated);
        }

        // Nothing updated: either missing, or refused by the active-borrow guard
        self.repository.books.get_by_id(id).await?;
        let active = self.repository.borrows.count_active_for_book(id).await?;
        Err(AppError::InvalidState(format!(
            "total_copies ({}) cannot be lower than the {} copies currently borrowed",
            book.total_copies, active
        )))
    }

    /// Delete a book that nobody currently has borrowed
    pub async fn delete_book(&self, identity: &Identity, id: i64) -> AppResult<()> {
        identity.require_admin()?;

        if self.repository.books.delete_if_idle(id).await? {
            tracing::info!(book_id = id, "Book deleted");
            return Ok(());
        }

        self.repository.books.get_by_id(id).await?;
        Err(AppError::Conflict(
            "Cannot delete book with active borrows".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::LoansConfig,
        services::test_support::{book, setup, user},
    };

    fn new_book(total: i32, available: Option<i32>) -> NewBook {
        NewBook {
            title: "Pride and Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            genre: "Romance".to_string(),
            total_copies: total,
            available_copies: available,
        }
    }

    fn update(total: i32, available: i32) -> UpdateBook {
        UpdateBook {
            title: "Pride and Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            genre: "Classic".to_string(),
            total_copies: total,
            available_copies: available,
        }
    }

    #[tokio::test]
    async fn non_admin_cannot_create() {
        let (services, repository) = setup(LoansConfig::default()).await;
        let reader = user(&repository, "reader", false).await;

        let err = services.catalog.create_book(&reader, new_book(2, None)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(repository.books.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_validates_copy_counts() {
        let (services, repository) = setup(LoansConfig::default()).await;
        let admin = user(&repository, "admin", true).await;

        let created = services.catalog.create_book(&admin, new_book(2, None)).await.unwrap();
        assert_eq!(created.available_copies, 2);

        let err = services.catalog.create_book(&admin, new_book(0, Some(0))).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        let err = services.catalog.create_book(&admin, new_book(1, Some(2))).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let mut untitled = new_book(1, None);
        untitled.title = String::new();
        let err = services.catalog.create_book(&admin, untitled).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(repository.books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_checks_invariant() {
        let (services, repository) = setup(LoansConfig::default()).await;
        let admin = user(&repository, "admin", true).await;
        let existing = book(&repository, "Pride and Prejudice", "Jane Austen", 2).await;

        let updated = services.catalog.update_book(&admin, existing.id, update(5, 4)).await.unwrap();
        assert_eq!(updated.genre, "Classic");
        assert_eq!(updated.total_copies, 5);
        assert_eq!(updated.available_copies, 4);

        let err = services.catalog.update_book(&admin, existing.id, update(2, 3)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let err = services.catalog.update_book(&admin, 999, update(2, 2)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_cannot_drop_total_below_active_borrows() {
        let (services, repository) = setup(LoansConfig::default()).await;
        let admin = user(&repository, "admin", true).await;
        let a = user(&repository, "alice", false).await;
        let b = user(&repository, "bob", false).await;
        let existing = book(&repository, "Pride and Prejudice", "Jane Austen", 2).await;

        services.loans.borrow(&a, a.user_id, existing.id).await.unwrap();
        services.loans.borrow(&b, b.user_id, existing.id).await.unwrap();

        let err = services.catalog.update_book(&admin, existing.id, update(1, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        let unchanged = repository.books.get_by_id(existing.id).await.unwrap();
        assert_eq!(unchanged.total_copies, 2);
    }

    #[tokio::test]
    async fn delete_blocked_by_active_borrows() {
        let (services, repository) = setup(LoansConfig::default()).await;
        let admin = user(&repository, "admin", true).await;
        let a = user(&repository, "alice", false).await;
        let existing = book(&repository, "Pride and Prejudice", "Jane Austen", 1).await;

        let record = services.loans.borrow(&a, a.user_id, existing.id).await.unwrap();
        let err = services.catalog.delete_book(&admin, existing.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        services.loans.return_book(&a, record.id).await.unwrap();
        services.catalog.delete_book(&admin, existing.id).await.unwrap();

        let err = services.catalog.delete_book(&admin, existing.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(services.loans.list_my_borrows(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_mutations_require_admin() {
        let (services, repository) = setup(LoansConfig::default()).await;
        let reader = user(&repository, "reader", false).await;
        let existing = book(&repository, "Emma", "Jane Austen", 1).await;

        assert!(matches!(
            services.catalog.update_book(&reader, existing.id, update(1, 1)).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            services.catalog.delete_book(&reader, existing.id).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            services.catalog.list_books(&reader).await,
            Err(AppError::Unauthorized(_))
        ));
        assert_eq!(repository.books.count().await.unwrap(), 1);
    }
}

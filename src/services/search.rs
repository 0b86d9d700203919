//! Catalog search

use crate::{error::AppResult, models::Book, repository::Repository};

#[derive(Clone)]
pub struct SearchService {
    repository: Repository,
}

impl SearchService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books whose title, author or genre contains `query`, ignoring case.
    ///
    /// A blank query returns the whole catalog. Results keep insertion order
    /// and are recomputed from the current catalog on every call.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        let books = self.repository.books.list().await?;
        Ok(books.into_iter().filter(|book| book.matches(&needle)).collect())
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }
}

//! Book (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book record with its copy counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    /// Substring match over title, author and genre.
    ///
    /// `needle` must already be lowercased; an empty needle matches every book.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [&self.title, &self.author, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Checks the availability invariant `0 <= available <= total` with `total >= 1`.
pub fn check_copy_counts(total_copies: i32, available_copies: i32) -> AppResult<()> {
    if total_copies < 1 {
        return Err(AppError::InvalidState(format!(
            "total_copies must be at least 1 (got {})",
            total_copies
        )));
    }
    if available_copies < 0 {
        return Err(AppError::InvalidState(format!(
            "available_copies cannot be negative (got {})",
            available_copies
        )));
    }
    if available_copies > total_copies {
        return Err(AppError::InvalidState(format!(
            "available_copies ({}) cannot exceed total_copies ({})",
            available_copies, total_copies
        )));
    }
    Ok(())
}

/// Create book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genre: String,
    pub total_copies: i32,
    /// Defaults to `total_copies` when omitted
    pub available_copies: Option<i32>,
}

impl NewBook {
    pub fn available_copies(&self) -> i32 {
        self.available_copies.unwrap_or(self.total_copies)
    }
}

/// Update book request (full replace)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genre: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Catalog search parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Matched against title, author and genre
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hobbit() -> Book {
        Book {
            id: 1,
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            genre: "Fantasy".to_string(),
            total_copies: 2,
            available_copies: 2,
        }
    }

    #[test]
    fn matches_any_field_case_insensitively() {
        let book = hobbit();
        assert!(book.matches("tolkien"));
        assert!(book.matches("hobbit"));
        assert!(book.matches("fanta"));
        assert!(!book.matches("orwell"));
    }

    #[test]
    fn empty_needle_matches() {
        assert!(hobbit().matches(""));
    }

    #[test]
    fn copy_count_invariant() {
        assert!(check_copy_counts(1, 0).is_ok());
        assert!(check_copy_counts(3, 3).is_ok());
        assert!(matches!(check_copy_counts(0, 0), Err(AppError::InvalidState(_))));
        assert!(matches!(check_copy_counts(2, 3), Err(AppError::InvalidState(_))));
        assert!(matches!(check_copy_counts(2, -1), Err(AppError::InvalidState(_))));
    }

    #[test]
    fn available_defaults_to_total() {
        let book = NewBook {
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            genre: "Science Fiction".to_string(),
            total_copies: 4,
            available_copies: None,
        };
        assert_eq!(book.available_copies(), 4);
    }
}

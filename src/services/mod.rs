//! Business logic services

pub mod catalog;
pub mod loans;
pub mod search;
pub mod seed;
pub mod users;

use crate::{config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub search: search::SearchService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            search: search::SearchService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), loans_config),
            users: users::UsersService::new(repository),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::{
        config::{DatabaseConfig, LoansConfig},
        models::{book::NewBook, Book, Identity, NewUser},
        repository::Repository,
    };

    use super::Services;

    pub async fn setup(loans: LoansConfig) -> (Services, Repository) {
        let repository = Repository::connect(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory database");
        (Services::new(repository.clone(), loans), repository)
    }

    pub async fn user(repository: &Repository, username: &str, is_admin: bool) -> Identity {
        let new_user = NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
        };
        let user = repository
            .users
            .create(&new_user, is_admin, Utc::now())
            .await
            .expect("create user");
        Identity::from(&user)
    }

    pub async fn book(repository: &Repository, title: &str, author: &str, copies: i32) -> Book {
        let new_book = NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: "Fiction".to_string(),
            total_copies: copies,
            available_copies: None,
        };
        repository.books.create(&new_book).await.expect("create book")
    }
}

//! Starter data for an empty database

use chrono::Utc;

use crate::{
    config::SeedConfig,
    error::AppResult,
    models::{NewBook, NewUser},
    repository::Repository,
};

const STARTER_BOOKS: &[(&str, &str, &str, i32)] = &[
    ("To Kill a Mockingbird", "Harper Lee", "Fiction", 3),
    ("1984", "George Orwell", "Science Fiction", 2),
    ("The Great Gatsby", "F. Scott Fitzgerald", "Fiction", 1),
    ("Pride and Prejudice", "Jane Austen", "Romance", 2),
    ("The Hobbit", "J.R.R. Tolkien", "Fantasy", 2),
];

/// Insert the starter catalog and an admin account when the catalog is empty
pub async fn seed_starter_data(repository: &Repository, config: &SeedConfig) -> AppResult<()> {
    if !config.enabled || repository.books.count().await? > 0 {
        return Ok(());
    }

    for (title, author, genre, copies) in STARTER_BOOKS {
        let book = NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            total_copies: *copies,
            available_copies: None,
        };
        repository.books.create(&book).await?;
    }
    tracing::info!("Seeded {} starter books", STARTER_BOOKS.len());

    if repository.users.count().await? == 0 {
        let admin = NewUser {
            username: config.admin_username.clone(),
            email: config.admin_email.clone(),
        };
        let created = repository.users.create(&admin, true, Utc::now()).await?;
        tracing::info!(user_id = created.id, username = %created.username, "Seeded admin user");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LoansConfig, services::test_support::setup};

    fn enabled() -> SeedConfig {
        SeedConfig {
            enabled: true,
            ..SeedConfig::default()
        }
    }

    #[tokio::test]
    async fn seeds_once() {
        let (services, repository) = setup(LoansConfig::default()).await;

        seed_starter_data(&repository, &enabled()).await.unwrap();
        seed_starter_data(&repository, &enabled()).await.unwrap();

        assert_eq!(repository.books.count().await.unwrap(), 5);
        let users = repository.users.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_admin);

        let found = services.search.search("tolkien").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "The Hobbit");
    }

    #[tokio::test]
    async fn disabled_seed_is_a_no_op() {
        let (_services, repository) = setup(LoansConfig::default()).await;
        seed_starter_data(&repository, &SeedConfig::default()).await.unwrap();
        assert_eq!(repository.books.count().await.unwrap(), 0);
    }
}

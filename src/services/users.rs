//! User registration and administration

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Identity, NewUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new (active, non-admin) user
    pub async fn register(&self, user: NewUser) -> AppResult<User> {
        user.validate()?;
        let created = self.repository.users.create(&user, false, Utc::now()).await?;
        tracing::info!(user_id = created.id, username = %created.username, "User registered");
        Ok(created)
    }

    /// Resolve the identity of an authenticated user id
    pub async fn get_identity(&self, user_id: i64) -> AppResult<Identity> {
        self.repository
            .users
            .find_by_id(user_id)
            .await?
            .map(|user| Identity::from(&user))
            .ok_or_else(|| AppError::Authentication("Unknown user".to_string()))
    }

    pub async fn me(&self, identity: &Identity) -> AppResult<User> {
        self.repository.users.get_by_id(identity.user_id).await
    }

    pub async fn list_users(&self, identity: &Identity) -> AppResult<Vec<User>> {
        identity.require_admin()?;
        self.repository.users.list().await
    }

    pub async fn get_user(&self, identity: &Identity, id: i64) -> AppResult<User> {
        identity.require_admin()?;
        self.repository.users.get_by_id(id).await
    }

    /// Flip another user's admin flag
    pub async fn toggle_admin(&self, identity: &Identity, id: i64) -> AppResult<User> {
        identity.require_admin()?;
        if id == identity.user_id {
            return Err(AppError::Conflict(
                "Administrators cannot change their own admin status".to_string(),
            ));
        }
        let user = self.repository.users.toggle_admin(id).await?;
        tracing::info!(user_id = id, is_admin = user.is_admin, by = identity.user_id, "Admin status changed");
        Ok(user)
    }

    /// Activate or deactivate another user's account
    pub async fn set_active(&self, identity: &Identity, id: i64, is_active: bool) -> AppResult<User> {
        identity.require_admin()?;
        if id == identity.user_id && !is_active {
            return Err(AppError::Conflict(
                "Administrators cannot deactivate their own account".to_string(),
            ));
        }
        let user = self.repository.users.set_active(id, is_active).await?;
        tracing::info!(user_id = id, is_active, by = identity.user_id, "Account status changed");
        Ok(user)
    }
}

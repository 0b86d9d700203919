//! User model, caller identity and bearer token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    /// Login name, unique
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    pub username: String,
    /// Email address, unique
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Activate or deactivate a user account (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetActive {
    pub is_active: bool,
}

/// Authenticated caller, passed explicitly into every core operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub is_admin: bool,
    pub is_active: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_admin: user.is_admin,
            is_active: user.is_active,
        }
    }
}

impl Identity {
    pub fn require_active(&self) -> AppResult<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Account is inactive".to_string()))
        }
    }

    /// Require administrator privileges on an active account
    pub fn require_admin(&self) -> AppResult<()> {
        self.require_active()?;
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Administrator privileges required".to_string()))
        }
    }

    /// Require the caller to act on their own behalf, unless they are an admin
    pub fn require_self_or_admin(&self, user_id: i64) -> AppResult<()> {
        self.require_active()?;
        if self.user_id == user_id || self.is_admin {
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "Cannot act on behalf of another user".to_string(),
            ))
        }
    }
}

/// Bearer token claims issued by the external authentication service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, ttl_hours: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + ttl_hours * 3600,
            iat: now,
        }
    }

    /// Sign the claims (HS256). Issuing tokens belongs to the auth service;
    /// this exists for tooling and tests sharing the secret.
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify and decode a token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

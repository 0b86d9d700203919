//! API handlers for the lending REST endpoints

pub mod admin;
pub mod auth;
pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{user::UserClaims, Identity},
    AppState,
};

/// Extractor resolving the caller's identity from a bearer token
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        // Flags are read from the store so admin/active changes apply immediately
        let identity = state.services.users.get_identity(claims.user_id).await?;

        Ok(AuthenticatedUser(identity))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/books", get(books::search_books))
        .route("/books/:id", get(books::get_book))
        // Borrowing
        .route("/borrow", get(borrows::list_my_borrows))
        .route("/borrow/:book_id", post(borrows::borrow_book))
        .route("/return/:borrow_id", post(borrows::return_book))
        // Administration
        .route("/admin/books", get(admin::list_books).post(admin::create_book))
        .route("/admin/books/:id", put(admin::update_book).delete(admin::delete_book))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", get(admin::get_user))
        .route("/admin/users/:id/admin", put(admin::toggle_admin))
        .route("/admin/users/:id/active", put(admin::set_active))
        .route("/admin/borrows", get(admin::list_borrows))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, books, borrows, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Lending API",
        version = "1.0.0",
        description = "Catalog, borrowing and administration REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::me,
        // Books
        books::search_books,
        books::get_book,
        // Borrowing
        borrows::list_my_borrows,
        borrows::borrow_book,
        borrows::return_book,
        // Admin
        admin::list_books,
        admin::create_book,
        admin::update_book,
        admin::delete_book,
        admin::list_users,
        admin::get_user,
        admin::toggle_admin,
        admin::set_active,
        admin::list_borrows,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::NewBook,
            crate::models::book::UpdateBook,
            crate::models::user::User,
            crate::models::user::NewUser,
            crate::models::user::SetActive,
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowDetail,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and current user"),
        (name = "books", description = "Catalog search"),
        (name = "borrow", description = "Borrowing and returns"),
        (name = "admin", description = "Catalog, user and borrow administration")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

//! Borrow and return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{borrow::BorrowParams, BorrowDetail, BorrowRecord},
    AppState,
};

use super::AuthenticatedUser;

/// The caller's borrowing history
#[utoipa::path(
    get,
    path = "/borrow",
    tag = "borrow",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active borrows first, then newest first", body = Vec<BorrowDetail>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_borrows(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetail>>> {
    let borrows = state.services.loans.list_my_borrows(&identity).await?;
    Ok(Json(borrows))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow/{book_id}",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i64, Path, description = "Book ID"),
        BorrowParams
    ),
    responses(
        (status = 201, description = "Book borrowed", body = BorrowRecord),
        (status = 403, description = "Not allowed to borrow for this user"),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "No copy available or lending policy refused")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(book_id): Path<i64>,
    Query(params): Query<BorrowParams>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let user_id = params.user_id.unwrap_or(identity.user_id);
    let record = state.services.loans.borrow(&identity, user_id, book_id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return/{borrow_id}",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("borrow_id" = i64, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecord),
        (status = 403, description = "Not the borrower"),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(borrow_id): Path<i64>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.loans.return_book(&identity, borrow_id).await?;
    Ok(Json(record))
}

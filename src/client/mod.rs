//! Typed HTTP client for the lending API

mod debounce;

pub use debounce::{Debouncer, SearchBox, DEFAULT_SEARCH_DELAY};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    error::ErrorResponse,
    models::{
        book::UpdateBook, user::SetActive, Book, BorrowDetail, BorrowRecord, NewBook, NewUser,
        User,
    },
};

/// Errors surfaced by [`LibraryClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body; `kind` is its error name
    /// (`NotFound`, `Unavailable`, `AlreadyReturned`, ...)
    #[error("{kind} ({status}): {message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
    },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Client for the `/api/v1` endpoints
#[derive(Clone)]
pub struct LibraryClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl LibraryClient {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api/v1`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every subsequent request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    // Auth

    pub async fn register(&self, user: &NewUser) -> ClientResult<User> {
        self.send(self.request(Method::POST, "/auth/register").json(user)).await
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.send(self.request(Method::GET, "/auth/me")).await
    }

    // Books

    pub async fn search_books(&self, query: &str) -> ClientResult<Vec<Book>> {
        self.send(self.request(Method::GET, "/books").query(&[("query", query)]))
            .await
    }

    pub async fn get_book(&self, id: i64) -> ClientResult<Book> {
        self.send(self.request(Method::GET, &format!("/books/{}", id))).await
    }

    // Borrowing

    pub async fn my_borrows(&self) -> ClientResult<Vec<BorrowDetail>> {
        self.send(self.request(Method::GET, "/borrow")).await
    }

    pub async fn borrow_book(&self, book_id: i64) -> ClientResult<BorrowRecord> {
        self.send(self.request(Method::POST, &format!("/borrow/{}", book_id)))
            .await
    }

    /// Borrow on behalf of another user (admin only)
    pub async fn borrow_book_for(&self, book_id: i64, user_id: i64) -> ClientResult<BorrowRecord> {
        self.send(
            self.request(Method::POST, &format!("/borrow/{}", book_id))
                .query(&[("user_id", user_id)]),
        )
        .await
    }

    pub async fn return_book(&self, borrow_id: i64) -> ClientResult<BorrowRecord> {
        self.send(self.request(Method::POST, &format!("/return/{}", borrow_id)))
            .await
    }

    // Administration

    pub async fn admin_list_books(&self) -> ClientResult<Vec<Book>> {
        self.send(self.request(Method::GET, "/admin/books")).await
    }

    pub async fn admin_create_book(&self, book: &NewBook) -> ClientResult<Book> {
        self.send(self.request(Method::POST, "/admin/books").json(book)).await
    }

    pub async fn admin_update_book(&self, id: i64, book: &UpdateBook) -> ClientResult<Book> {
        self.send(self.request(Method::PUT, &format!("/admin/books/{}", id)).json(book))
            .await
    }

    pub async fn admin_delete_book(&self, id: i64) -> ClientResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/admin/books/{}", id))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn admin_list_users(&self) -> ClientResult<Vec<User>> {
        self.send(self.request(Method::GET, "/admin/users")).await
    }

    pub async fn admin_get_user(&self, id: i64) -> ClientResult<User> {
        self.send(self.request(Method::GET, &format!("/admin/users/{}", id)))
            .await
    }

    pub async fn admin_toggle_admin(&self, id: i64) -> ClientResult<User> {
        self.send(self.request(Method::PUT, &format!("/admin/users/{}/admin", id)))
            .await
    }

    pub async fn admin_set_active(&self, id: i64, is_active: bool) -> ClientResult<User> {
        self.send(
            self.request(Method::PUT, &format!("/admin/users/{}/active", id))
                .json(&SetActive { is_active }),
        )
        .await
    }

    pub async fn admin_list_borrows(&self) -> ClientResult<Vec<BorrowDetail>> {
        self.send(self.request(Method::GET, "/admin/borrows")).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into [`ClientError::Api`]
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let (kind, message) = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => (body.error, body.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("Unknown").to_string(),
            text,
        ),
    };

    tracing::debug!(%status, %kind, "API request failed");
    Err(ClientError::Api {
        status,
        kind,
        message,
    })
}

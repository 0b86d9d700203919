//! Data models for the lending server

pub mod book;
pub mod borrow;
pub mod user;

pub use book::{Book, BookQuery, NewBook, UpdateBook};
pub use borrow::{BorrowDetail, BorrowRecord};
pub use user::{Identity, NewUser, User};

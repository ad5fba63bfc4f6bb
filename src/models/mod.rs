//! Data models for Biblioteca

pub mod author;
pub mod book;
pub mod pagination;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use pagination::{Page, PageQuery};
pub use user::{Role, SessionClaims, User, UserInfo};

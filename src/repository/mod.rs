//! Repository layer for store operations
//!
//! Services only see the store traits below. `Repository` implements them on
//! Postgres; `memory::MemoryRepository` keeps everything in process.

pub mod authors;
pub mod books;
pub mod memory;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{Book, CreateBook, UpdateBook},
        user::{NewUser, User},
    },
};

pub use memory::MemoryRepository;

/// Credential store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn users_list(&self) -> AppResult<Vec<User>>;

    async fn users_get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with `AppError::DuplicateEmail` when the email is taken
    async fn users_create(&self, user: NewUser) -> AppResult<User>;

    /// Overwrite a stored user; `None` when it no longer exists
    async fn users_save(&self, user: User) -> AppResult<Option<User>>;

    /// `false` when nothing was deleted
    async fn users_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Author side of the catalog store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn authors_list(&self) -> AppResult<Vec<Author>>;

    /// Window in insertion order plus the total record count
    async fn authors_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<Author>, i64)>;

    /// Case-insensitive substring match on the name
    async fn authors_search(&self, name: &str) -> AppResult<Vec<Author>>;

    async fn authors_get_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;

    async fn authors_create(&self, data: CreateAuthor) -> AppResult<Author>;

    async fn authors_update(&self, id: Uuid, data: UpdateAuthor) -> AppResult<Option<Author>>;

    async fn authors_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Book side of the catalog store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn books_list(&self) -> AppResult<Vec<Book>>;

    /// Window in insertion order plus the total record count
    async fn books_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)>;

    /// Case-insensitive substring match on the title
    async fn books_search(&self, title: &str) -> AppResult<Vec<Book>>;

    async fn books_get_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    async fn books_create(&self, data: CreateBook) -> AppResult<Book>;

    async fn books_update(&self, id: Uuid, data: UpdateBook) -> AppResult<Option<Book>>;

    async fn books_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Connectivity probe used by the readiness endpoint
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

/// Everything a backend must provide
pub trait Store: UserStore + AuthorStore + BookStore + StoreHealth {}

impl<T> Store for T where T: UserStore + AuthorStore + BookStore + StoreHealth {}

/// Postgres-backed repository holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// `ILIKE` pattern matching `query` anywhere, with wildcards escaped
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Map a unique-constraint violation to `DuplicateEmail`
pub(crate) fn map_unique_violation(err: sqlx::Error, email: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::DuplicateEmail(format!("El email {} ya está registrado", email))
        }
        _ => AppError::Database(err),
    }
}

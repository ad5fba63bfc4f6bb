//! In-process store
//!
//! Keeps records in insertion order, which is the "store-native" order the
//! paginated listings expose. Selected with a `memory://` database URL and
//! used by the test suite.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BookStore, StoreHealth, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{Book, CreateBook, UpdateBook},
        user::{NewUser, User},
    },
};

#[derive(Default)]
pub struct MemoryRepository {
    users: RwLock<IndexMap<Uuid, User>>,
    authors: RwLock<IndexMap<Uuid, Author>>,
    books: RwLock<IndexMap<Uuid, Book>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(records: &IndexMap<Uuid, T>, offset: i64, limit: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(0);
    records.values().skip(offset).take(limit).cloned().collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn duplicate_email(email: &str) -> AppError {
    AppError::DuplicateEmail(format!("El email {} ya está registrado", email))
}

#[async_trait]
impl UserStore for MemoryRepository {
    async fn users_list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn users_get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn users_create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(duplicate_email(&user.email));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            crea_date: Some(now),
            modif_date: Some(now),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn users_save(&self, mut user: User) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(None);
        }
        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(duplicate_email(&user.email));
        }

        user.modif_date = Some(Utc::now());
        users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn users_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.users.write().await.shift_remove(&id).is_some())
    }
}

#[async_trait]
impl AuthorStore for MemoryRepository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Ok(self.authors.read().await.values().cloned().collect())
    }

    async fn authors_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<Author>, i64)> {
        let authors = self.authors.read().await;
        Ok((window(&authors, offset, limit), authors.len() as i64))
    }

    async fn authors_search(&self, name: &str) -> AppResult<Vec<Author>> {
        Ok(self
            .authors
            .read()
            .await
            .values()
            .filter(|a| contains_ignore_case(&a.name, name))
            .cloned()
            .collect())
    }

    async fn authors_get_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.read().await.get(&id).cloned())
    }

    async fn authors_create(&self, data: CreateAuthor) -> AppResult<Author> {
        let now = Utc::now();
        let author = Author {
            id: Uuid::new_v4(),
            name: data.name,
            age: data.age,
            books: data.books,
            crea_date: Some(now),
            modif_date: Some(now),
        };
        self.authors.write().await.insert(author.id, author.clone());
        Ok(author)
    }

    async fn authors_update(&self, id: Uuid, data: UpdateAuthor) -> AppResult<Option<Author>> {
        let mut authors = self.authors.write().await;
        let Some(author) = authors.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            author.name = name;
        }
        if let Some(age) = data.age {
            author.age = age;
        }
        if let Some(books) = data.books {
            author.books = books;
        }
        author.modif_date = Some(Utc::now());
        Ok(Some(author.clone()))
    }

    async fn authors_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.authors.write().await.shift_remove(&id).is_some())
    }
}

#[async_trait]
impl BookStore for MemoryRepository {
    async fn books_list(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn books_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)> {
        let books = self.books.read().await;
        Ok((window(&books, offset, limit), books.len() as i64))
    }

    async fn books_search(&self, title: &str) -> AppResult<Vec<Book>> {
        Ok(self
            .books
            .read()
            .await
            .values()
            .filter(|b| contains_ignore_case(&b.title, title))
            .cloned()
            .collect())
    }

    async fn books_get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn books_create(&self, data: CreateBook) -> AppResult<Book> {
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: data.title,
            author: data.author,
            genre: data.genre,
            synopsis: data.synopsis,
            crea_date: Some(now),
            modif_date: Some(now),
        };
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn books_update(&self, id: Uuid, data: UpdateBook) -> AppResult<Option<Book>> {
        let mut books = self.books.write().await;
        let Some(book) = books.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = data.title {
            book.title = title;
        }
        if let Some(author) = data.author {
            book.author = author;
        }
        if let Some(genre) = data.genre {
            book.genre = genre;
        }
        if let Some(synopsis) = data.synopsis {
            book.synopsis = synopsis;
        }
        book.modif_date = Some(Utc::now());
        Ok(Some(book.clone()))
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.books.write().await.shift_remove(&id).is_some())
    }
}

#[async_trait]
impl StoreHealth for MemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

//! Catalog management service (authors and books)

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        author::{clean_titles, Author, CreateAuthor, UpdateAuthor},
        book::{Book, CreateBook, UpdateBook},
        pagination::{page_offset, total_pages, Page, PageQuery},
    },
    repository::{AuthorStore, BookStore},
};

#[derive(Clone)]
pub struct CatalogService {
    authors: Arc<dyn AuthorStore>,
    books: Arc<dyn BookStore>,
    config: CatalogConfig,
}

fn author_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Autor {} no encontrado", id))
}

fn book_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Libro {} no encontrado", id))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Validated page number and (capped) page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    fn offset(&self) -> i64 {
        page_offset(self.page, self.page_size)
    }

    fn into_page<T>(self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            total,
            total_pages: total_pages(total, self.page_size),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl CatalogService {
    pub fn new(
        authors: Arc<dyn AuthorStore>,
        books: Arc<dyn BookStore>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            authors,
            books,
            config,
        }
    }

    fn page_request(&self, query: &PageQuery) -> AppResult<PageRequest> {
        let page = query.pagina.unwrap_or(1);
        let page_size = query.limite.unwrap_or(self.config.default_page_size);

        if page < 1 {
            return Err(AppError::Validation(
                "El número de página debe ser mayor que cero".to_string(),
            ));
        }
        if page_size < 1 {
            return Err(AppError::Validation(
                "El límite debe ser mayor que cero".to_string(),
            ));
        }

        Ok(PageRequest {
            page,
            page_size: page_size.min(self.config.max_page_size.max(1)),
        })
    }

    // Authors

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.authors.authors_list().await
    }

    pub async fn authors_page(&self, query: &PageQuery) -> AppResult<Page<Author>> {
        let request = self.page_request(query)?;
        let (items, total) = self
            .authors
            .authors_page(request.offset(), request.page_size)
            .await?;
        Ok(request.into_page(items, total))
    }

    /// Empty query or no match yields an empty list
    pub async fn search_authors(&self, name: Option<&str>) -> AppResult<Vec<Author>> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.authors.authors_search(name).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_author(&self, id: Uuid) -> AppResult<Author> {
        self.authors
            .authors_get_by_id(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    pub async fn create_author(&self, mut data: CreateAuthor) -> AppResult<Author> {
        data.name = data.name.trim().to_string();
        data.validate()?;
        data.books = clean_titles(data.books);

        let author = self.authors.authors_create(data).await?;
        tracing::info!(author_id = %author.id, "Author created");
        Ok(author)
    }

    pub async fn update_author(&self, id: Uuid, mut data: UpdateAuthor) -> AppResult<Author> {
        data.name = data.name.map(|n| n.trim().to_string());
        data.validate()?;
        data.books = data.books.map(clean_titles);

        self.authors
            .authors_update(id, data)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    pub async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        if !self.authors.authors_delete(id).await? {
            return Err(author_not_found(id));
        }
        tracing::info!(author_id = %id, "Author deleted");
        Ok(())
    }

    // Books

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books.books_list().await
    }

    pub async fn books_page(&self, query: &PageQuery) -> AppResult<Page<Book>> {
        let request = self.page_request(query)?;
        let (items, total) = self
            .books
            .books_page(request.offset(), request.page_size)
            .await?;
        Ok(request.into_page(items, total))
    }

    /// Empty query or no match yields an empty list
    pub async fn search_books(&self, title: Option<&str>) -> AppResult<Vec<Book>> {
        match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => self.books.books_search(title).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.books
            .books_get_by_id(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    pub async fn create_book(&self, mut data: CreateBook) -> AppResult<Book> {
        data.title = data.title.trim().to_string();
        data.author = data.author.trim().to_string();
        data.genre = data.genre.trim().to_string();
        data.synopsis = data.synopsis.trim().to_string();
        data.validate()?;
        let book = self.books.books_create(data).await?;
        tracing::info!(book_id = %book.id, "Book created");
        Ok(book)
    }

    pub async fn update_book(&self, id: Uuid, mut data: UpdateBook) -> AppResult<Book> {
        data.title = trimmed(data.title);
        data.author = trimmed(data.author);
        data.genre = trimmed(data.genre);
        data.synopsis = trimmed(data.synopsis);
        data.validate()?;
        self.books
            .books_update(id, data)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        if !self.books.books_delete(id).await? {
            return Err(book_not_found(id));
        }
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}

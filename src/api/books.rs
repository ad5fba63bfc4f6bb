//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    authz::Operation,
    error::AppResult,
    models::{
        book::{Book, BookSearch, CreateBook, UpdateBook},
        pagination::PageQuery,
    },
    AppState,
};

use super::{parse_id, AppJson, AuthenticatedUser};

/// One page of books
#[derive(Serialize, ToSchema)]
pub struct BookPage {
    pub libros: Vec<Book>,
    /// Total pages for the requested page size
    pub numero_paginas: i64,
    /// Total number of books
    pub total: i64,
}

/// Search matches, wrapped under the same key the listings use
#[derive(Serialize, ToSchema)]
pub struct BookSearchResult {
    pub libros: Vec<Book>,
}

/// List all books
#[utoipa::path(
    get,
    path = "/libros",
    tag = "libros",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// List books page by page
#[utoipa::path(
    get,
    path = "/libros/paginado",
    tag = "libros",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of books; empty past the last page", body = BookPage),
        (status = 400, description = "Invalid page or limit")
    )
)]
pub async fn list_books_paginated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.catalog.books_page(&query).await?;

    Ok(Json(BookPage {
        libros: page.items,
        numero_paginas: page.total_pages,
        total: page.total,
    }))
}

/// Search books by title
#[utoipa::path(
    get,
    path = "/libros/buscar",
    tag = "libros",
    params(BookSearch),
    responses(
        (status = 200, description = "Matching books, possibly none", body = BookSearchResult),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(search): Query<BookSearch>,
) -> AppResult<Json<BookSearchResult>> {
    let books = state
        .services
        .catalog
        .search_books(search.titulo.as_deref())
        .await?;
    Ok(Json(BookSearchResult { libros: books }))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/libros/{id}",
    tag = "libros",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let id = parse_id(&id, "Libro")?;
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a book (editor or admin)
#[utoipa::path(
    post,
    path = "/libros",
    tag = "libros",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Editor or admin role required")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require(Operation::CreateCatalog)?;

    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book (editor or admin)
#[utoipa::path(
    put,
    path = "/libros/{id}",
    tag = "libros",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Editor or admin role required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    AppJson(data): AppJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require(Operation::EditCatalog)?;
    let id = parse_id(&id, "Libro")?;

    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}

/// Delete a book (admin)
#[utoipa::path(
    delete,
    path = "/libros/{id}",
    tag = "libros",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require(Operation::DeleteCatalog)?;
    let id = parse_id(&id, "Libro")?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

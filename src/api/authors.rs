//! Author endpoints

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
        author::{Author, AuthorSearch, CreateAuthor, UpdateAuthor},
        pagination::PageQuery,
    },
    AppState,
};

use super::{parse_id, AppJson, AuthenticatedUser};

/// One page of authors
#[derive(Serialize, ToSchema)]
pub struct AuthorPage {
    pub autores: Vec<Author>,
    /// Total pages for the requested page size
    pub numero_paginas: i64,
    /// Total number of authors
    pub total: i64,
}

/// Search matches, wrapped under the same key the listings use
#[derive(Serialize, ToSchema)]
pub struct AuthorSearchResult {
    pub autores: Vec<Author>,
}

/// List all authors
#[utoipa::path(
    get,
    path = "/autores",
    tag = "autores",
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// List authors page by page
#[utoipa::path(
    get,
    path = "/autores/paginado",
    tag = "autores",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors", body = AuthorPage),
        (status = 400, description = "Invalid page or limit")
    )
)]
pub async fn list_authors_paginated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AuthorPage>> {
    let page = state.services.catalog.authors_page(&query).await?;

    Ok(Json(AuthorPage {
        autores: page.items,
        numero_paginas: page.total_pages,
        total: page.total,
    }))
}

/// Search authors by name
#[utoipa::path(
    get,
    path = "/autores/buscar",
    tag = "autores",
    params(AuthorSearch),
    responses(
        (status = 200, description = "Matching authors, possibly none", body = AuthorSearchResult),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn search_authors(
    State(state): State<AppState>,
    Query(search): Query<AuthorSearch>,
) -> AppResult<Json<AuthorSearchResult>> {
    let authors = state
        .services
        .catalog
        .search_authors(search.nombre.as_deref())
        .await?;
    Ok(Json(AuthorSearchResult { autores: authors }))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/autores/{id}",
    tag = "autores",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Author>> {
    let id = parse_id(&id, "Autor")?;
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Create an author (editor or admin)
#[utoipa::path(
    post,
    path = "/autores",
    tag = "autores",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Editor or admin role required")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require(Operation::CreateCatalog)?;

    let author = state.services.catalog.create_author(data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author (editor or admin)
#[utoipa::path(
    put,
    path = "/autores/{id}",
    tag = "autores",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 403, description = "Editor or admin role required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    AppJson(data): AppJson<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    claims.require(Operation::EditCatalog)?;
    let id = parse_id(&id, "Autor")?;

    let author = state.services.catalog.update_author(id, data).await?;
    Ok(Json(author))
}

/// Delete an author (admin)
#[utoipa::path(
    delete,
    path = "/autores/{id}",
    tag = "autores",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require(Operation::DeleteCatalog)?;
    let id = parse_id(&id, "Autor")?;

    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! User registration, login and management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    authz::Operation,
    error::AppResult,
    models::user::{LoginRequest, LoginResponse, RegisterUser, UpdateUser, User},
    AppState,
};

use super::{parse_id, AppJson, AuthenticatedUser};

/// Register a new user (public)
#[utoipa::path(
    post,
    path = "/usuarios",
    tag = "usuarios",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing password, invalid field or duplicate email", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Log in and receive a session token
#[utoipa::path(
    post,
    path = "/usuarios/login",
    tag = "usuarios",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and public user data", body = LoginResponse),
        (status = 401, description = "Wrong password", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown email", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Current user, from the bearer token
#[utoipa::path(
    get,
    path = "/usuarios/me",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.auth.get_user(claims.sub).await?;
    Ok(Json(user))
}

/// List all users (admin)
#[utoipa::path(
    get,
    path = "/usuarios",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    claims.require(Operation::ManageUsers)?;

    let users = state.services.auth.list_users().await?;
    Ok(Json(users))
}

/// Get user details by ID (admin or self)
#[utoipa::path(
    get,
    path = "/usuarios/{id}",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id, "Usuario")?;
    claims.require_self_or(id, Operation::ManageUsers)?;

    let user = state.services.auth.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user; only admins may change roles or edit other accounts
#[utoipa::path(
    put,
    path = "/usuarios/{id}",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid role or field"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    AppJson(update): AppJson<UpdateUser>,
) -> AppResult<Json<User>> {
    let id = parse_id(&id, "Usuario")?;
    claims.require_self_or(id, Operation::ManageUsers)?;
    if update.role.as_deref().is_some_and(|r| !r.trim().is_empty()) {
        claims.require(Operation::ManageUsers)?;
    }

    let updated = state.services.auth.update_user(id, update).await?;
    Ok(Json(updated))
}

/// Delete a user (admin)
#[utoipa::path(
    delete,
    path = "/usuarios/{id}",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require(Operation::ManageUsers)?;
    let id = parse_id(&id, "Usuario")?;

    state.services.auth.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

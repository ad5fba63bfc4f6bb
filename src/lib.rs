//! Biblioteca library catalog server
//!
//! REST JSON API for a library catalog: user accounts with roles, authors
//! and books, with paginated listing and title/name search.

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod authz;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use config::CorsConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // Search routes are public and unbounded, so they sit behind the rate limit
    let search = Router::new()
        .route("/autores/buscar", get(api::authors::search_authors))
        .route("/libros/buscar", get(api::books::search_books))
        .route("/libros/buscar/nombre", get(api::books::search_books));
    let (search, limited) = api::rate_limit::with_rate_limit(search, &state.config.rate_limit);
    if limited {
        tracing::info!(
            "Search rate limit: 1 request every {}s, burst {}",
            state.config.rate_limit.per_second,
            state.config.rate_limit.burst_size
        );
    }

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Users
        .route(
            "/usuarios",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route("/usuarios/login", post(api::users::login))
        .route("/usuarios/me", get(api::users::me))
        .route(
            "/usuarios/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        // Authors
        .route(
            "/autores",
            get(api::authors::list_authors).post(api::authors::create_author),
        )
        .route("/autores/paginado", get(api::authors::list_authors_paginated))
        .route(
            "/autores/:id",
            get(api::authors::get_author)
                .put(api::authors::update_author)
                .delete(api::authors::delete_author),
        )
        // Books
        .route(
            "/libros",
            get(api::books::list_books).post(api::books::create_book),
        )
        .route("/libros/paginado", get(api::books::list_books_paginated))
        .route(
            "/libros/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .merge(search);

    let cors = cors_layer(&state.config.cors);

    routes
        .with_state(state)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

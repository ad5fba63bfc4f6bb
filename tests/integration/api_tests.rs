//! API integration tests
//!
//! Drive the full router in-process against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use biblioteca_server::{
    config::AppConfig, create_router, repository::MemoryRepository, services::Services, AppState,
};

const ADMIN_EMAIL: &str = "admin@biblioteca.test";
const ADMIN_PASSWORD: &str = "admin-secreto";

async fn test_app() -> Router {
    let config = AppConfig::default();
    let services = Services::new(
        Arc::new(MemoryRepository::new()),
        config.auth.clone(),
        config.catalog.clone(),
    );
    services
        .auth
        .ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("bootstrap admin");

    create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/usuarios/login",
        None,
        Some(json!({ "email": email, "contraseña": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["jwToken"].as_str().expect("token").to_string()
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/usuarios",
        None,
        Some(json!({ "nombre": name, "email": email, "contraseña": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

/// Register a user and promote it to `role` with the admin account
async fn user_with_role(app: &Router, name: &str, email: &str, role: &str) -> String {
    let user = register(app, name, email, "clave-segura").await;
    let admin = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let id = user["_id"].as_str().expect("id");

    let (status, body) = send(
        app,
        "PUT",
        &format!("/usuarios/{}", id),
        Some(&admin),
        Some(json!({ "rol": role })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "role change failed: {}", body);

    login(app, email, "clave-segura").await
}

fn sample_book(title: &str) -> Value {
    json!({
        "titulo": title,
        "autor": "Miguel de Cervantes",
        "genero": "Novela",
        "synopsis": "Un hidalgo que enloquece leyendo libros de caballerías."
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = test_app().await;

    let user = register(&app, "Ana", "ana@x.io", "s3creta").await;
    assert_eq!(user["nombre"], "Ana");
    assert_eq!(user["email"], "ana@x.io");
    assert_eq!(user["rol"], "usuario comun");
    assert!(user.get("password_hash").is_none());
    assert!(user.get("contraseña").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/usuarios/login",
        None,
        Some(json!({ "email": "ana@x.io", "contraseña": "s3creta" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["jwToken"].is_string());
    assert_eq!(body["usuario"]["_id"], user["_id"]);
    assert_eq!(body["usuario"]["rol"], "usuario comun");
    assert!(body["usuario"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_errors() {
    let app = test_app().await;
    register(&app, "Ana", "ana@x.io", "s3creta").await;

    let (status, body) = send(
        &app,
        "POST",
        "/usuarios",
        None,
        Some(json!({ "nombre": "Otra Ana", "email": "ana@x.io", "contraseña": "otra" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "DuplicateEmailError");

    let (status, body) = send(
        &app,
        "POST",
        "/usuarios",
        None,
        Some(json!({ "nombre": "Sin Clave", "email": "sin@x.io" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    let (status, _) = send(
        &app,
        "POST",
        "/usuarios",
        None,
        Some(json!({ "nombre": "Mal Email", "email": "no-es-email", "contraseña": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_trims_email() {
    let app = test_app().await;

    let user = register(&app, "Ana", "  Ana@X.io ", "s3creta").await;
    assert_eq!(user["email"], "ana@x.io");

    login(&app, "ana@x.io", "s3creta").await;
}

#[tokio::test]
async fn test_login_failures() {
    let app = test_app().await;
    register(&app, "Ana", "ana@x.io", "s3creta").await;

    let (status, body) = send(
        &app,
        "POST",
        "/usuarios/login",
        None,
        Some(json!({ "email": "ana@x.io", "contraseña": "incorrecta" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "InvalidCredentialsError");

    let (status, _) = send(
        &app,
        "POST",
        "/usuarios/login",
        None,
        Some(json!({ "email": "nadie@x.io", "contraseña": "s3creta" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/usuarios")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_writes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, "POST", "/libros", None, Some(sample_book("El Quijote"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UnauthorizedError");

    let (status, _) = send(
        &app,
        "POST",
        "/libros",
        Some("not-a-token"),
        Some(sample_book("El Quijote")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_common_user_cannot_modify_catalog() {
    let app = test_app().await;
    register(&app, "Ana", "ana@x.io", "s3creta").await;
    let token = login(&app, "ana@x.io", "s3creta").await;

    let (status, _) = send(&app, "POST", "/libros", Some(&token), Some(sample_book("El Quijote"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/autores",
        Some(&token),
        Some(json!({ "nombre": "Cervantes", "edad": 69 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/libros", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_editor_creates_and_edits_but_cannot_delete() {
    let app = test_app().await;
    let editor = user_with_role(&app, "Eva", "eva@x.io", "editor").await;

    let (status, book) = send(&app, "POST", "/libros", Some(&editor), Some(sample_book("El Quijote"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["titulo"], "El Quijote");
    let id = book["_id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/libros/{}", id),
        Some(&editor),
        Some(json!({ "genero": "Clásico" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["genero"], "Clásico");
    assert_eq!(updated["titulo"], "El Quijote");

    let (status, _) = send(&app, "DELETE", &format!("/libros/{}", id), Some(&editor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &format!("/libros/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_common_user_cannot_edit_or_delete_catalog_records() {
    let app = test_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    register(&app, "Ana", "ana@x.io", "s3creta").await;
    let ana = login(&app, "ana@x.io", "s3creta").await;

    let (_, book) = send(&app, "POST", "/libros", Some(&admin), Some(sample_book("El Quijote"))).await;
    let book_uri = format!("/libros/{}", book["_id"].as_str().unwrap());
    let (_, author) = send(
        &app,
        "POST",
        "/autores",
        Some(&admin),
        Some(json!({ "nombre": "Cervantes", "edad": 69 })),
    )
    .await;
    let author_uri = format!("/autores/{}", author["_id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &book_uri, Some(&ana), Some(json!({ "genero": "Otro" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &book_uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "PUT", &author_uri, Some(&ana), Some(json!({ "edad": 70 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &author_uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nothing changed
    let (_, book) = send(&app, "GET", &book_uri, None, None).await;
    assert_eq!(book["genero"], "Novela");
    let (_, author) = send(&app, "GET", &author_uri, None, None).await;
    assert_eq!(author["edad"], 69);
}

#[tokio::test]
async fn test_editor_cannot_delete_author() {
    let app = test_app().await;
    let editor = user_with_role(&app, "Eva", "eva@x.io", "editor").await;

    let (status, author) = send(
        &app,
        "POST",
        "/autores",
        Some(&editor),
        Some(json!({ "nombre": "Cervantes", "edad": 69 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/autores/{}", author["_id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some(&editor), Some(json!({ "edad": 70 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["edad"], 70);

    let (status, _) = send(&app, "DELETE", &uri, Some(&editor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_deletes_book() {
    let app = test_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, book) = send(&app, "POST", "/libros", Some(&admin), Some(sample_book("El Quijote"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = book["_id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/libros/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/libros/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/libros/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_is_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/autores/no-es-un-id", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFoundError");
}

#[tokio::test]
async fn test_invalid_book_is_rejected() {
    let app = test_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = send(
        &app,
        "POST",
        "/libros",
        Some(&admin),
        Some(json!({ "titulo": "Ab", "autor": "X", "genero": "Y", "synopsis": "corta" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    let (status, _) = send(&app, "POST", "/libros", Some(&admin), Some(sample_book("     "))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, book) = send(&app, "POST", "/libros", Some(&admin), Some(sample_book("  Rayuela  "))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["titulo"], "Rayuela");
}

#[tokio::test]
async fn test_author_lifecycle() {
    let app = test_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, author) = send(
        &app,
        "POST",
        "/autores",
        Some(&admin),
        Some(json!({ "nombre": "Gabriel García Márquez", "edad": 87, "libros": ["Cien años de soledad"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(author["edad"], 87);
    assert_eq!(author["libros"], json!(["Cien años de soledad"]));
    let id = author["_id"].as_str().unwrap().to_string();

    let (status, found) = send(&app, "GET", "/autores/buscar?nombre=garc%C3%ADa", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["autores"].as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/autores/{}", id),
        Some(&admin),
        Some(json!({ "edad": 88 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["edad"], 88);
    assert_eq!(updated["nombre"], "Gabriel García Márquez");

    let (status, _) = send(&app, "DELETE", &format!("/autores/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/autores", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_books_pagination() {
    let app = test_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    for title in ["Libro Uno", "Libro Dos", "Libro Tres"] {
        let (status, _) = send(&app, "POST", "/libros", Some(&admin), Some(sample_book(title))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(&app, "GET", "/libros/paginado?pagina=2&limite=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["numero_paginas"], 2);
    let titles: Vec<&str> = page["libros"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["titulo"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Libro Tres"]);

    let (status, page) = send(&app, "GET", "/libros/paginado?pagina=5&limite=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["libros"], json!([]));
    assert_eq!(page["numero_paginas"], 2);

    let (status, page) = send(&app, "GET", "/libros/paginado", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["libros"].as_array().unwrap().len(), 3);
    assert_eq!(page["numero_paginas"], 1);

    let (status, body) = send(&app, "GET", "/libros/paginado?pagina=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn test_empty_catalog_has_no_pages() {
    let app = test_app().await;

    let (status, page) = send(&app, "GET", "/autores/paginado", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["autores"], json!([]));
    assert_eq!(page["numero_paginas"], 0);
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_book_search() {
    let app = test_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    send(&app, "POST", "/libros", Some(&admin), Some(sample_book("Don Quijote de la Mancha"))).await;
    send(&app, "POST", "/libros", Some(&admin), Some(sample_book("La Galatea"))).await;

    let (status, found) = send(&app, "GET", "/libros/buscar?titulo=QUIJOTE", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let found = found["libros"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["titulo"], "Don Quijote de la Mancha");

    let (status, found) = send(&app, "GET", "/libros/buscar/nombre?titulo=galatea", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["libros"].as_array().unwrap().len(), 1);

    let (status, found) = send(&app, "GET", "/libros/buscar?titulo=zzz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!({ "libros": [] }));

    let (status, found) = send(&app, "GET", "/libros/buscar", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!({ "libros": [] }));

    let (status, found) = send(&app, "GET", "/autores/buscar?nombre=nadie", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!({ "autores": [] }));
}

#[tokio::test]
async fn test_user_management_permissions() {
    let app = test_app().await;
    let ana = register(&app, "Ana", "ana@x.io", "s3creta").await;
    let ana_id = ana["_id"].as_str().unwrap().to_string();
    let ana_token = login(&app, "ana@x.io", "s3creta").await;
    let other = register(&app, "Luis", "luis@x.io", "clave").await;
    let other_id = other["_id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "GET", "/usuarios", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, me) = send(&app, "GET", "/usuarios/me", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ana@x.io");

    let (status, _) = send(&app, "GET", &format!("/usuarios/{}", ana_id), Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/usuarios/{}", other_id), Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/usuarios/{}", ana_id),
        Some(&ana_token),
        Some(json!({ "nombre": "Ana María" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nombre"], "Ana María");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/usuarios/{}", ana_id),
        Some(&ana_token),
        Some(json!({ "rol": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &format!("/usuarios/{}", other_id), Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, users) = send(&app, "GET", "/usuarios", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/usuarios/{}", other_id),
        Some(&admin),
        Some(json!({ "rol": "bibliotecario" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    let (status, _) = send(&app, "DELETE", &format!("/usuarios/{}", other_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/usuarios/{}", other_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

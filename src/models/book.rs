//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Full book model from the store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    /// Author name as free text
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "genero")]
    pub genre: String,
    pub synopsis: String,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, message = "El título debe tener al menos 3 caracteres"))]
    pub title: String,
    #[serde(rename = "autor")]
    #[validate(length(min = 1, message = "El autor es obligatorio"))]
    pub author: String,
    #[serde(rename = "genero")]
    #[validate(length(min = 1, message = "El género es obligatorio"))]
    pub genre: String,
    #[validate(length(min = 10, message = "La descripción debe tener al menos 10 caracteres"))]
    pub synopsis: String,
}

/// Update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[serde(rename = "titulo")]
    #[validate(length(min = 3, message = "El título debe tener al menos 3 caracteres"))]
    pub title: Option<String>,
    #[serde(rename = "autor")]
    #[validate(length(min = 1, message = "El autor es obligatorio"))]
    pub author: Option<String>,
    #[serde(rename = "genero")]
    #[validate(length(min = 1, message = "El género es obligatorio"))]
    pub genre: Option<String>,
    #[validate(length(min = 10, message = "La descripción debe tener al menos 10 caracteres"))]
    pub synopsis: Option<String>,
}

/// Search parameters for `/libros/buscar`
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookSearch {
    pub titulo: Option<String>,
}

//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Full author model from the store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "edad")]
    pub age: i32,
    /// Free-text titles, not references to book records
    #[serde(rename = "libros")]
    pub books: Vec<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub name: String,
    #[serde(rename = "edad")]
    #[validate(range(min = 0, max = 150, message = "La edad no es válida"))]
    pub age: i32,
    #[serde(rename = "libros", default)]
    pub books: Vec<String>,
}

/// Update author request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub name: Option<String>,
    #[serde(rename = "edad")]
    #[validate(range(min = 0, max = 150, message = "La edad no es válida"))]
    pub age: Option<i32>,
    #[serde(rename = "libros")]
    pub books: Option<Vec<String>>,
}

/// Search parameters for `/autores/buscar`
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AuthorSearch {
    pub nombre: Option<String>,
}

/// Trim titles and drop the empty ones left by a trailing comma
pub fn clean_titles(books: Vec<String>) -> Vec<String> {
    books
        .into_iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect()
}

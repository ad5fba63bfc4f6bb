//! Authors domain methods on Repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{like_pattern, AuthorStore, Repository};
use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, UpdateAuthor},
};

#[async_trait]
impl AuthorStore for Repository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY crea_date, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn authors_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<Author>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY crea_date, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn authors_search(&self, name: &str) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE name ILIKE $1 ORDER BY crea_date, id",
        )
        .bind(like_pattern(name))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn authors_get_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn authors_create(&self, data: CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, age, books, crea_date, modif_date)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.age)
        .bind(&data.books)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_update(&self, id: Uuid, data: UpdateAuthor) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET name = COALESCE($2, name),
                age = COALESCE($3, age),
                books = COALESCE($4, books),
                modif_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.age)
        .bind(&data.books)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Books domain methods on Repository

use async_trait::async_trait;
use uuid::Uuid;

use super::{like_pattern, BookStore, Repository};
use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
};

#[async_trait]
impl BookStore for Repository {
    async fn books_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY crea_date, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn books_page(&self, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books ORDER BY crea_date, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    async fn books_search(&self, title: &str) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE title ILIKE $1 ORDER BY crea_date, id",
        )
        .bind(like_pattern(title))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn books_get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn books_create(&self, data: CreateBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, genre, synopsis, crea_date, modif_date)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.genre)
        .bind(&data.synopsis)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn books_update(&self, id: Uuid, data: UpdateBook) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                genre = COALESCE($4, genre),
                synopsis = COALESCE($5, synopsis),
                modif_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.genre)
        .bind(&data.synopsis)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Genres repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::genre::{CreateGenre, Genre}};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>(
            "SELECT id, name, description FROM genres ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: &CreateGenre) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Ids from `ids` with no matching genre
    pub async fn missing(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM genres WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(super::missing_ids(ids, &found))
    }
}

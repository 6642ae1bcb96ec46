//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod genres;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub genres: genres::GenresRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Ids from `wanted` that are absent from `found`, in request order
pub(crate) fn missing_ids(wanted: &[i32], found: &[i32]) -> Vec<i32> {
    wanted
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

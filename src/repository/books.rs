//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookRecord},
};

/// Book columns plus the ascending id arrays of both relations
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.type, b.volume, b.year, b.description, b.owner_id,
           ARRAY(SELECT bg.genre_id FROM book_genres bg WHERE bg.book_id = b.id ORDER BY bg.genre_id) AS genres,
           ARRAY(SELECT ba.author_id FROM book_authors ba WHERE ba.book_id = b.id ORDER BY ba.author_id) AS authors
    FROM books b
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!("{} ORDER BY b.id", BOOK_SELECT);
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Books whose genre set contains `genre_id`
    pub async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let query = format!(
            r#"
            {}
            WHERE EXISTS (
                SELECT 1 FROM book_genres f WHERE f.book_id = b.id AND f.genre_id = $1
            )
            ORDER BY b.id
            "#,
            BOOK_SELECT
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("{} WHERE b.id = $1", BOOK_SELECT);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Insert a book and its relations in one transaction
    pub async fn create(&self, book: &BookRecord) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, type, volume, year, description, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.book_type)
        .bind(book.volume)
        .bind(book.year)
        .bind(&book.description)
        .bind(book.owner)
        .fetch_one(&mut *tx)
        .await?;

        Self::write_relations(&mut tx, id, book).await?;
        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Replace every field and both relation sets of an existing book
    pub async fn update(&self, id: i32, book: &BookRecord) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, type = $2, volume = $3, year = $4, description = $5, owner_id = $6
            WHERE id = $7
            "#,
        )
        .bind(&book.title)
        .bind(book.book_type)
        .bind(book.volume)
        .bind(book.year)
        .bind(&book.description)
        .bind(book.owner)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::write_relations(&mut tx, id, book).await?;
        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Delete a book; join rows go with it through ON DELETE CASCADE
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    async fn write_relations(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        book: &BookRecord,
    ) -> AppResult<()> {
        if !book.authors.is_empty() {
            sqlx::query(
                "INSERT INTO book_authors (book_id, author_id) SELECT $1, UNNEST($2::int4[])",
            )
            .bind(book_id)
            .bind(book.authors.as_slice())
            .execute(&mut **tx)
            .await?;
        }

        if !book.genres.is_empty() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int4[])",
            )
            .bind(book_id)
            .bind(book.genres.as_slice())
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

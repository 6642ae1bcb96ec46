//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        author::{Author, CreateAuthor},
        book::{Book, BookPayload, BookRecord},
        genre::{CreateGenre, Genre},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Books tagged with a genre; an unknown genre simply matches nothing
    pub async fn list_books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        self.repository.books.list_by_genre(genre_id).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book; `acting_user` owns it unless the payload names an owner
    pub async fn create_book(&self, payload: BookPayload, acting_user: i32) -> AppResult<Book> {
        payload.validate()?;
        let owner = payload.owner.unwrap_or(acting_user);
        let record = self.resolve(payload, owner).await?;

        let book = self.repository.books.create(&record).await?;
        tracing::info!(book_id = book.id, owner = book.owner, "Book created");
        Ok(book)
    }

    /// Replace a book; the current owner is kept unless the payload names one
    pub async fn update_book(&self, id: i32, payload: BookPayload) -> AppResult<Book> {
        let current = self.repository.books.get_by_id(id).await?;

        payload.validate()?;
        let owner = payload.owner.unwrap_or(current.owner);
        let record = self.resolve(payload, owner).await?;

        let book = self.repository.books.update(id, &record).await?;
        tracing::info!(book_id = book.id, "Book updated");
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn create_author(&self, data: CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(&data).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, data: CreateGenre) -> AppResult<Genre> {
        data.validate()?;
        let genre = self.repository.genres.create(&data).await?;
        tracing::info!(genre_id = genre.id, "Genre created");
        Ok(genre)
    }

    /// Check every referenced row exists and build the record to write
    async fn resolve(&self, payload: BookPayload, owner: i32) -> AppResult<BookRecord> {
        let (authors, genres) = payload.normalized_ids();
        let mut fields = FieldErrors::new();

        let missing = self.repository.authors.missing(&authors).await?;
        if !missing.is_empty() {
            fields.insert("authors".to_string(), missing_messages(&missing));
        }

        let missing = self.repository.genres.missing(&genres).await?;
        if !missing.is_empty() {
            fields.insert("genres".to_string(), missing_messages(&missing));
        }

        if !self.repository.users.exists(owner).await? {
            fields.insert("owner".to_string(), missing_messages(&[owner]));
        }

        if let Some(error) = AppError::from_fields(fields) {
            return Err(error);
        }

        let volume = payload
            .volume
            .ok_or_else(|| AppError::invalid_field("volume", "This field is required."))?;

        Ok(BookRecord {
            title: payload.title,
            book_type: payload.book_type,
            volume,
            year: payload.year,
            description: payload.description,
            genres,
            authors,
            owner,
        })
    }
}

fn missing_messages(ids: &[i32]) -> Vec<String> {
    ids.iter()
        .map(|id| format!("Invalid pk \"{}\" - object does not exist.", id))
        .collect()
}

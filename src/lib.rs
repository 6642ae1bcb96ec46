//! Bookshelf catalog server
//!
//! REST JSON API for a book catalog (books, authors, genres) with
//! session-based user accounts. Reading is open, catalog changes need a
//! staff account.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

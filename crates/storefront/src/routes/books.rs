//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bookstore_core::{BookId, CategoryId};

use crate::db::{BookFilter, BookRepository};
use crate::error::{AppError, Result};
use crate::models::{Book, Category};
use crate::state::AppState;

/// How many books the front page shows.
const FRONT_PAGE_SIZE: i64 = 12;

/// Front page payload.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub books: Vec<Book>,
    pub categories: Vec<Category>,
}

/// Book listing payload.
#[derive(Debug, Serialize)]
pub struct BookListPage {
    pub books: Vec<Book>,
    pub categories: Vec<Category>,
}

/// Query parameters for the book listing.
#[derive(Debug, Deserialize)]
pub struct BookListQuery {
    /// Category id filter.
    pub category: Option<i32>,
    /// Case-insensitive substring match on title, author, or ISBN.
    pub search: Option<String>,
}

/// Front page: newest books plus all categories.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePage>> {
    let repo = BookRepository::new(state.pool());
    let books = repo.front_page(FRONT_PAGE_SIZE).await?;
    let categories = repo.categories().await?;

    Ok(Json(HomePage { books, categories }))
}

/// Book listing with optional category and search filters.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BookListQuery>,
) -> Result<Json<BookListPage>> {
    let filter = BookFilter {
        category: query.category.map(CategoryId::new),
        search: query.search,
    };

    let repo = BookRepository::new(state.pool());
    let books = repo.list(&filter).await?;
    let categories = repo.categories().await?;

    Ok(Json(BookListPage { books, categories }))
}

/// Book detail; 404 for unknown ids.
#[instrument(skip_all, fields(book_id = id))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Book>> {
    let book = BookRepository::new(state.pool())
        .get(BookId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book {id}")))?;

    Ok(Json(book))
}

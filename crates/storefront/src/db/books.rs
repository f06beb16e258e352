//! Catalog repository for books and categories.
//!
//! Queries use sqlx's runtime-checked API; filtered listings are assembled
//! with `QueryBuilder`.

use sqlx::{PgPool, QueryBuilder};

use bookstore_core::{BookId, CategoryId};

use super::RepositoryError;
use crate::models::{Book, Category};

const BOOK_COLUMNS: &str = "id, title, author, isbn, category_id, price, stock, \
     description, publisher, publish_date, created_at, updated_at";

/// Optional filters for the book listing.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Restrict to a single category.
    pub category: Option<CategoryId>,
    /// Case-insensitive substring match on title, author, or ISBN.
    pub search: Option<String>,
}

/// Repository for catalog reads.
pub struct BookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a book by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(book)
    }

    /// Newest books for the front page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn front_page(&self, limit: i64) -> Result<Vec<Book>, RepositoryError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// List books, newest first, optionally filtered by category and search
    /// query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>, RepositoryError> {
        let mut qb = QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM books"));
        let mut sep = " WHERE ";

        if let Some(category) = filter.category {
            qb.push(sep).push("category_id = ").push_bind(category);
            sep = " AND ";
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            qb.push(sep)
                .push("(title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR author ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR isbn ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC");

        let books = qb.build_query_as::<Book>().fetch_all(self.pool).await?;
        Ok(books)
    }

    /// All categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}

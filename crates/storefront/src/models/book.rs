//! Catalog models: books and categories.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bookstore_core::{BookId, CategoryId};

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Books reference at most one category; a deleted category leaves this
    /// as `None`.
    pub category_id: Option<CategoryId>,
    pub price: Decimal,
    pub stock: i32,
    pub description: String,
    pub publisher: String,
    pub publish_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Whether at least one copy is available for purchase.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A book category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

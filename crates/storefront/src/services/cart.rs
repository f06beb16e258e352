//! Cart service: add-to-cart and cart materialization.
//!
//! The cart itself is a value object owned by the session (see
//! [`crate::models::cart`]); this module resolves it against the live
//! catalog. Cart state is passed in and returned, never held here.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use bookstore_core::BookId;

use crate::db::{BookRepository, RepositoryError};
use crate::models::{Book, Cart, CartError};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The referenced book does not exist.
    #[error("book not found")]
    NotFound,

    /// Business failure from the cart itself.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Add one copy of a book to the cart.
///
/// Returns the number of distinct line entries on success. The caller is
/// responsible for writing the mutated cart back into the session.
///
/// # Errors
///
/// Returns `CartServiceError::NotFound` for an unknown book id and
/// `CartServiceError::Cart(OutOfStock)` when availability is exhausted.
pub async fn add_item(
    pool: &PgPool,
    cart: &mut Cart,
    book_id: BookId,
) -> Result<usize, CartServiceError> {
    let book = BookRepository::new(pool)
        .get(book_id)
        .await?
        .ok_or(CartServiceError::NotFound)?;

    Ok(cart.add(&book)?)
}

/// One materialized cart line: the live book plus snapshot-priced subtotal.
#[derive(Debug, Serialize)]
pub struct CartLine {
    pub book: Book,
    pub quantity: u32,
    /// Snapshot price × quantity (not the book's live price).
    pub subtotal: Decimal,
}

/// The materialized cart.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Decimal,
}

/// Resolve each cart entry against the current catalog.
///
/// Entries whose book has vanished are silently dropped. Subtotals and the
/// running total use the price captured at add-time.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a lookup fails.
pub async fn view(pool: &PgPool, cart: &Cart) -> Result<CartView, RepositoryError> {
    let books = BookRepository::new(pool);

    let mut items = Vec::with_capacity(cart.len());
    let mut total = Decimal::ZERO;

    for (book_id, entry) in cart.entries_by_book_id() {
        let Some(book) = books.get(book_id).await? else {
            continue;
        };

        let subtotal = entry.subtotal();
        total += subtotal;
        items.push(CartLine {
            book,
            quantity: entry.quantity,
            subtotal,
        });
    }

    Ok(CartView { items, total })
}

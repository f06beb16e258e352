//! Order repository: the checkout transaction and order history reads.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bookstore_core::{BookId, CustomerId, OrderId, OrderNumber};

use super::RepositoryError;
use crate::models::{Cart, CartEntry, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, customer_id, order_number, status, total_amount, \
     shipping_address, created_at, updated_at";

/// Errors from placing an order. Business failures are separated from plain
/// database errors so callers can report them in the response payload.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// A cart entry's requested quantity exceeds the book's current stock.
    #[error("\"{title}\" is out of stock")]
    InsufficientStock {
        /// Title of the offending book.
        title: String,
    },

    /// A book in the cart no longer exists in the catalog.
    #[error("book {id} is no longer available")]
    BookNotFound {
        /// Id of the vanished book.
        id: BookId,
    },

    /// Database error; the transaction is rolled back.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A book row locked for the duration of the checkout transaction.
#[derive(Debug, sqlx::FromRow)]
struct LockedBook {
    title: String,
    stock: i32,
}

/// Repository for orders and order items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert a cart into a persisted order, atomically.
    ///
    /// Runs a single transaction that locks every cart book with
    /// `SELECT ... FOR UPDATE` (in ascending id order, so concurrent
    /// checkouts cannot deadlock), validates current stock against requested
    /// quantities, inserts the order and its items, and decrements stock.
    /// Any failure rolls the whole transaction back: no partial order, no
    /// partial stock decrement.
    ///
    /// The order total and item prices come from the cart snapshots, not the
    /// books' live prices.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::InsufficientStock` naming the first book
    /// whose stock is short, `PlaceOrderError::BookNotFound` if a cart entry
    /// references a deleted book, or `PlaceOrderError::Database` for
    /// everything else (including an order-number collision, which the
    /// UNIQUE constraint turns into a database error).
    pub async fn place(
        &self,
        customer_id: CustomerId,
        cart: &Cart,
        order_number: &OrderNumber,
        shipping_address: &str,
    ) -> Result<Order, PlaceOrderError> {
        let entries = cart.entries_by_book_id();

        let mut tx = self.pool.begin().await?;

        let mut locked = Vec::with_capacity(entries.len());
        for (book_id, _) in &entries {
            let book = sqlx::query_as::<_, LockedBook>(
                "SELECT title, stock FROM books WHERE id = $1 FOR UPDATE",
            )
            .bind(*book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(PlaceOrderError::BookNotFound { id: *book_id })?;

            locked.push(book);
        }

        verify_stock(&entries, &locked)?;

        let total: Decimal = cart.total();
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (customer_id, order_number, total_amount, shipping_address) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(customer_id)
        .bind(order_number)
        .bind(total)
        .bind(shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        for (book_id, entry) in &entries {
            let quantity = i32::try_from(entry.quantity).unwrap_or(i32::MAX);

            sqlx::query(
                "INSERT INTO order_items (order_id, book_id, quantity, price) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(*book_id)
            .bind(quantity)
            .bind(entry.price)
            .execute(&mut *tx)
            .await?;

            // Stock was validated above under the row lock; the CHECK
            // constraint on books.stock is the storage-level backstop.
            sqlx::query("UPDATE books SET stock = stock - $1, updated_at = now() WHERE id = $2")
                .bind(quantity)
                .bind(*book_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Orders for a customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE customer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Line items of one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, book_id, quantity, price \
             FROM order_items WHERE order_id = $1 ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Check every requested quantity against the locked stock counts.
///
/// All-or-nothing: the first shortfall aborts the whole checkout, naming the
/// offending book.
fn verify_stock(
    entries: &[(BookId, &CartEntry)],
    locked: &[LockedBook],
) -> Result<(), PlaceOrderError> {
    for ((_, entry), book) in entries.iter().zip(locked) {
        if i64::from(book.stock) < i64::from(entry.quantity) {
            return Err(PlaceOrderError::InsufficientStock {
                title: book.title.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(title: &str, quantity: u32) -> CartEntry {
        CartEntry {
            title: title.to_owned(),
            price: "10.00".parse().unwrap(),
            quantity,
        }
    }

    fn locked(title: &str, stock: i32) -> LockedBook {
        LockedBook {
            title: title.to_owned(),
            stock,
        }
    }

    #[test]
    fn test_verify_stock_passes_when_stock_covers_requests() {
        let a = entry("Book A", 2);
        let b = entry("Book B", 1);
        let entries = vec![(BookId::new(1), &a), (BookId::new(2), &b)];
        let rows = vec![locked("Book A", 2), locked("Book B", 5)];

        assert!(verify_stock(&entries, &rows).is_ok());
    }

    #[test]
    fn test_verify_stock_names_the_short_book() {
        // Book A is fine; Book B sold out concurrently.
        let a = entry("Book A", 1);
        let b = entry("Book B", 1);
        let entries = vec![(BookId::new(1), &a), (BookId::new(2), &b)];
        let rows = vec![locked("Book A", 1), locked("Book B", 0)];

        let err = verify_stock(&entries, &rows).unwrap_err();
        match err {
            PlaceOrderError::InsufficientStock { title } => assert_eq!(title, "Book B"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_stock_error_message_matches_payload_format() {
        let a = entry("Dune", 3);
        let entries = vec![(BookId::new(1), &a)];
        let rows = vec![locked("Dune", 2)];

        let err = verify_stock(&entries, &rows).unwrap_err();
        assert_eq!(err.to_string(), "\"Dune\" is out of stock");
    }
}

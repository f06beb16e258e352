//! Session-scoped shopping cart.
//!
//! The cart is a value object serialized into the session, not a persisted
//! entity. Each entry snapshots the book's title and price at add-time; the
//! snapshot price is what checkout charges, even if the live price changes
//! afterwards.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookstore_core::BookId;

use super::book::Book;

/// Errors from cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// The book has no available stock, or the cart already holds every
    /// remaining copy.
    #[error("Out of Stock")]
    OutOfStock,
}

/// One selected book: title/price snapshots plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub title: String,
    /// Unit price captured at add-time, stored as a string in the session.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity: u32,
}

impl CartEntry {
    /// Snapshot price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The shopper's selection, keyed by book id (as a string, matching the
/// session serialization format).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<String, CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of `book` to the cart.
    ///
    /// Inserts a new entry with quantity 1, or increments an existing entry.
    /// Returns the number of distinct line entries on success.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] if the book's current stock is zero
    /// or the entry already holds a quantity at or above the current stock.
    pub fn add(&mut self, book: &Book) -> Result<usize, CartError> {
        if !book.in_stock() {
            return Err(CartError::OutOfStock);
        }

        let key = book.id.to_string();
        if let Some(entry) = self.items.get_mut(&key) {
            // No quantity may exceed live stock at add-time.
            if entry.quantity >= book.stock.unsigned_abs() {
                return Err(CartError::OutOfStock);
            }
            entry.quantity += 1;
        } else {
            self.items.insert(
                key,
                CartEntry {
                    title: book.title.clone(),
                    price: book.price,
                    quantity: 1,
                },
            );
        }

        Ok(self.items.len())
    }

    /// Number of distinct line entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over `(book id key, entry)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CartEntry)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up the entry for a book, if present.
    #[must_use]
    pub fn get(&self, book_id: BookId) -> Option<&CartEntry> {
        self.items.get(&book_id.to_string())
    }

    /// Entries with their keys parsed back into [`BookId`]s, in ascending id
    /// order. Checkout locks book rows in this order.
    #[must_use]
    pub fn entries_by_book_id(&self) -> Vec<(BookId, &CartEntry)> {
        let mut entries: Vec<(BookId, &CartEntry)> = self
            .items
            .iter()
            .filter_map(|(k, v)| k.parse::<i32>().ok().map(|id| (BookId::new(id), v)))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Sum of snapshot price × quantity across all entries.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.values().map(CartEntry::subtotal).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn book(id: i32, title: &str, price: Decimal, stock: i32) -> Book {
        let now = Utc::now();
        Book {
            id: BookId::new(id),
            title: title.to_owned(),
            author: "Author".to_owned(),
            isbn: format!("978000000{id:04}"),
            category_id: None,
            price,
            stock,
            description: String::new(),
            publisher: String::new(),
            publish_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_out_of_stock_book_fails() {
        let mut cart = Cart::new();
        let sold_out = book(1, "Sold Out", d("12.50"), 0);

        assert_eq!(cart.add(&sold_out), Err(CartError::OutOfStock));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_inserts_then_increments() {
        let mut cart = Cart::new();
        let b = book(1, "Dune", d("19.99"), 5);

        assert_eq!(cart.add(&b), Ok(1));
        assert_eq!(cart.add(&b), Ok(1));

        let entry = cart.get(b.id).unwrap();
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.price, d("19.99"));
    }

    #[test]
    fn test_add_succeeds_exactly_stock_times() {
        let mut cart = Cart::new();
        let b = book(1, "Limited", d("8.00"), 3);

        for _ in 0..3 {
            assert!(cart.add(&b).is_ok());
        }
        assert_eq!(cart.add(&b), Err(CartError::OutOfStock));
        assert_eq!(cart.get(b.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_returns_distinct_entry_count() {
        let mut cart = Cart::new();
        let a = book(1, "A", d("10.00"), 2);
        let b = book(2, "B", d("5.00"), 2);

        assert_eq!(cart.add(&a), Ok(1));
        assert_eq!(cart.add(&b), Ok(2));
        assert_eq!(cart.add(&a), Ok(2));
    }

    #[test]
    fn test_price_snapshot_survives_live_price_change() {
        let mut cart = Cart::new();
        let mut b = book(1, "Dune", d("19.99"), 5);
        cart.add(&b).unwrap();

        // Live price changes after the book is in the cart.
        b.price = d("24.99");
        cart.add(&b).unwrap();

        let entry = cart.get(b.id).unwrap();
        assert_eq!(entry.price, d("19.99"));
        assert_eq!(entry.subtotal(), d("39.98"));
    }

    #[test]
    fn test_total_sums_snapshot_subtotals() {
        let mut cart = Cart::new();
        let a = book(1, "A", d("30.00"), 2);
        let b = book(2, "B", d("12.25"), 4);

        cart.add(&a).unwrap();
        cart.add(&a).unwrap();
        cart.add(&b).unwrap();

        assert_eq!(cart.total(), d("72.25"));
    }

    #[test]
    fn test_entries_by_book_id_sorted_numerically() {
        let mut cart = Cart::new();
        // String keys would sort "10" before "2"; checkout needs numeric order.
        cart.add(&book(10, "Ten", d("1.00"), 1)).unwrap();
        cart.add(&book(2, "Two", d("1.00"), 1)).unwrap();

        let ids: Vec<i32> = cart
            .entries_by_book_id()
            .iter()
            .map(|(id, _)| id.as_i32())
            .collect();
        assert_eq!(ids, vec![2, 10]);
    }

    #[test]
    fn test_two_copies_at_stock_two() {
        let mut cart = Cart::new();
        let b = book(1, "Scarce", d("30.00"), 2);

        assert_eq!(cart.add(&b), Ok(1));
        assert_eq!(cart.add(&b), Ok(1));
        assert_eq!(cart.add(&b), Err(CartError::OutOfStock));
        assert_eq!(cart.total(), d("60.00"));
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(&book(1, "A", d("10.00"), 1)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_session_serialization_uses_string_prices() {
        let mut cart = Cart::new();
        cart.add(&book(1, "Dune", d("19.99"), 5)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["1"]["price"], serde_json::json!("19.99"));

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}

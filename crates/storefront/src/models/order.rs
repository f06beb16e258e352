//! Order and order item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bookstore_core::{BookId, CustomerId, OrderId, OrderItemId, OrderNumber, OrderStatus};

/// A completed checkout. Immutable once created; the total is never
/// recomputed from its items.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_number: OrderNumber,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order, owned exclusively by it.
///
/// `price` is the cart-snapshot unit price, not the book's live price.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub book_id: BookId,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    /// Quantity × snapshot price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_subtotal() {
        let item = OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            book_id: BookId::new(1),
            quantity: 3,
            price: "30.00".parse().unwrap(),
        };
        assert_eq!(item.subtotal(), "90.00".parse::<Decimal>().unwrap());
    }
}

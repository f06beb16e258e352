//! Checkout service: convert a session cart into a durable order.
//!
//! The stock-sensitive part (validate, insert, decrement) runs inside a
//! single transaction in [`crate::db::orders`]; this module handles the
//! surrounding steps: empty check, customer resolution, order numbering,
//! and shipping-address fallback.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use bookstore_core::OrderNumber;

use crate::db::{CustomerRepository, OrderRepository, PlaceOrderError, RepositoryError};
use crate::models::{Cart, CurrentUser, Customer, Order, OrderItem};

/// Shipping address recorded when the customer hasn't stored one yet.
pub const ADDRESS_PLACEHOLDER: &str = "Address need to be confirmed";

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was invoked with no cart entries; no order is created.
    #[error("Empty Cart")]
    EmptyCart,

    /// Failure inside the order transaction (stock shortfall, vanished
    /// book, or a database error). Nothing was committed.
    #[error(transparent)]
    Place(#[from] PlaceOrderError),

    /// Failure resolving the customer profile.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Place an order from the cart's contents.
///
/// On success the caller must clear the session cart. On any error no order
/// exists and no stock was touched.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, and propagates
/// stock-validation and database failures from the order transaction.
pub async fn place_order(
    pool: &PgPool,
    user: &CurrentUser,
    cart: &Cart,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let customer = CustomerRepository::new(pool).get_or_create(user).await?;
    let order_number = OrderNumber::generate(Utc::now());
    let shipping_address = shipping_address(&customer);

    let order = OrderRepository::new(pool)
        .place(customer.id, cart, &order_number, &shipping_address)
        .await?;

    Ok(order)
}

/// An order with its line items, for the order history listing.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// The authenticated user's orders, newest first.
///
/// Creates the customer profile on demand if this is the user's first
/// interaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn order_history(
    pool: &PgPool,
    user: &CurrentUser,
) -> Result<Vec<OrderSummary>, RepositoryError> {
    let customer = CustomerRepository::new(pool).get_or_create(user).await?;
    let orders = OrderRepository::new(pool);

    let list = orders.list_by_customer(customer.id).await?;
    let mut summaries = Vec::with_capacity(list.len());
    for order in list {
        let items = orders.items(order.id).await?;
        summaries.push(OrderSummary { order, items });
    }

    Ok(summaries)
}

/// The customer's stored address, or the placeholder if they have none.
fn shipping_address(customer: &Customer) -> String {
    if customer.address.trim().is_empty() {
        ADDRESS_PLACEHOLDER.to_owned()
    } else {
        customer.address.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::{CustomerId, UserId};

    fn customer(address: &str) -> Customer {
        Customer {
            id: CustomerId::new(1),
            user_id: UserId::new(1),
            phone: String::new(),
            address: address.to_owned(),
            email: String::new(),
            is_premium: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_shipping_address_uses_stored_address() {
        let c = customer("12 Elm Street");
        assert_eq!(shipping_address(&c), "12 Elm Street");
    }

    #[test]
    fn test_shipping_address_falls_back_to_placeholder() {
        assert_eq!(shipping_address(&customer("")), ADDRESS_PLACEHOLDER);
        assert_eq!(shipping_address(&customer("   ")), ADDRESS_PLACEHOLDER);
    }

    #[test]
    fn test_error_messages_match_response_payloads() {
        assert_eq!(CheckoutError::EmptyCart.to_string(), "Empty Cart");
        let shortfall = CheckoutError::Place(PlaceOrderError::InsufficientStock {
            title: "Dune".to_owned(),
        });
        assert_eq!(shortfall.to_string(), "\"Dune\" is out of stock");
    }
}

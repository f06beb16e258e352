//! Domain models for the storefront.

pub mod book;
pub mod cart;
pub mod customer;
pub mod order;
pub mod session;
pub mod user;

pub use book::{Book, Category};
pub use cart::{Cart, CartEntry, CartError};
pub use customer::Customer;
pub use order::{Order, OrderItem};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;

//! Business services for the storefront.

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::{CartServiceError, CartView};
pub use checkout::CheckoutError;

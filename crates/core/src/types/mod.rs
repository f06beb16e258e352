//! Core types for the bookstore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order_number;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use order_number::OrderNumber;
pub use status::OrderStatus;

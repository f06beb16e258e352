//! Bookstore Core - Shared types library.
//!
//! This crate provides common types used across the bookstore components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, order status, and order numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

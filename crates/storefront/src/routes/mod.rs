//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Front page (newest books + categories)
//! GET  /health              - Health check
//!
//! # Catalog
//! GET  /books               - Book listing (?category=, ?search=)
//! GET  /books/{id}          - Book detail (404 for unknown ids)
//!
//! # Cart (requires auth; 302 to login otherwise)
//! GET  /cart                - Materialized cart with snapshot totals
//! POST /cart/add/{book_id}  - Add one copy; JSON {success, cart_count}
//!
//! # Orders (requires auth)
//! POST /orders/create       - Checkout; JSON {success, order_id}
//! GET  /orders              - Order history, newest first
//!
//! # Auth
//! POST /auth/register       - Create account and log in
//! POST /auth/login          - Log in
//! POST /auth/logout         - Log out, drop the session
//! ```
//!
//! Cart and checkout business failures are reported in the JSON body with
//! HTTP 200 (`{"success": false, "error": ...}`); callers inspect the
//! payload, not the transport status.

pub mod auth;
pub mod books;
pub mod cart;
pub mod orders;

use axum::{
    Json,
    Router,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Business-failure payload: transport-level 200, `success: false` inside.
pub(crate) fn failure(error: impl Into<String>) -> Json<Value> {
    Json(json!({ "success": false, "error": error.into() }))
}

/// Create the catalog routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index))
        .route("/{id}", get(books::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{book_id}", post(cart::add))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/create", post(orders::create))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Assemble all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::home))
        .nest("/books", book_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
}

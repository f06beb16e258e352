//! Cart route handlers.
//!
//! The cart lives in the session as a value object; handlers load it, hand
//! it to the cart service, and write the mutated value back.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use bookstore_core::BookId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Cart, session_keys};
use crate::routes::failure;
use crate::services::cart::{self, CartServiceError, CartView};
use crate::state::AppState;

/// Load the cart from the session, defaulting to empty.
async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await
        .map_err(AppError::Session)?
        .unwrap_or_default())
}

/// Add one copy of a book to the cart.
///
/// Returns `{"success": true, "cart_count": n}` where `n` is the number of
/// distinct line entries. Out-of-stock is a business failure reported with
/// HTTP 200; an unknown book id is a 404.
#[instrument(skip_all, fields(book_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
    Path(book_id): Path<i32>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    match cart::add_item(state.pool(), &mut cart, BookId::new(book_id)).await {
        Ok(count) => {
            session
                .insert(session_keys::CART, &cart)
                .await
                .map_err(AppError::Session)?;

            Ok(Json(json!({ "success": true, "cart_count": count })).into_response())
        }
        Err(CartServiceError::NotFound) => Err(AppError::NotFound(format!("book {book_id}"))),
        Err(CartServiceError::Cart(e)) => Ok(failure(e.to_string()).into_response()),
        Err(CartServiceError::Repository(e)) => {
            tracing::error!(error = %e, "add-to-cart failed unexpectedly");
            Ok(failure(e.to_string()).into_response())
        }
    }
}

/// Materialized cart view: live books, snapshot-priced subtotals, total.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    let view = cart::view(state.pool(), &cart).await?;

    Ok(Json(view))
}

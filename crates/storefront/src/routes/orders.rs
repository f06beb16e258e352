//! Order route handlers: checkout and order history.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::PlaceOrderError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Cart, session_keys};
use crate::routes::failure;
use crate::services::checkout::{self, CheckoutError, OrderSummary};
use crate::state::AppState;

/// Checkout: convert the session cart into an order.
///
/// All failures are reported in the JSON body with HTTP 200
/// (`{"success": false, "error": ...}`); on success the session cart is
/// cleared and the new order id returned.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let cart: Cart = session
        .get(session_keys::CART)
        .await
        .map_err(AppError::Session)?
        .unwrap_or_default();

    match checkout::place_order(state.pool(), &user, &cart).await {
        Ok(order) => {
            // The order is committed; reset the cart.
            session
                .insert(session_keys::CART, Cart::new())
                .await
                .map_err(AppError::Session)?;

            tracing::info!(order_id = %order.id, order_number = %order.order_number, "order placed");
            Ok(Json(json!({ "success": true, "order_id": order.id })).into_response())
        }
        Err(err) => {
            // Stock shortfalls and empty carts are expected business
            // outcomes; anything else gets captured before being reported
            // in the same payload shape.
            if matches!(
                err,
                CheckoutError::Place(PlaceOrderError::Database(_)) | CheckoutError::Repository(_)
            ) {
                sentry::capture_error(&err);
                tracing::error!(error = %err, "checkout failed unexpectedly");
            }

            Ok(failure(err.to_string()).into_response())
        }
    }
}

/// The authenticated user's orders, newest first, with line items.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderSummary>>> {
    let summaries = checkout::order_history(state.pool(), &user).await?;
    Ok(Json(summaries))
}

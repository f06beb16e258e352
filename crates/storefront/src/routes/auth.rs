//! Auth route handlers.
//!
//! Minimal credential glue: register/login put a `CurrentUser` in the
//! session; everything protected hangs off that.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Login/registration form data.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Create an account and log the new user in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .register(&credentials.email, &credentials.password)
        .await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(AppError::Session)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(json!({ "success": true })))
}

/// Log in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.pool())
        .login(&credentials.email, &credentials.password)
        .await?;

    // Rotate the session id on privilege change.
    session.cycle_id().await.map_err(AppError::Session)?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(AppError::Session)?;

    Ok(Json(json!({ "success": true })))
}

/// Log out: drop the identity and the session (cart included).
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session)
        .await
        .map_err(AppError::Session)?;
    session.flush().await.map_err(AppError::Session)?;

    Ok(Json(json!({ "success": true })))
}

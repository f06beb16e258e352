//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// Unauthenticated requests to protected endpoints get a 302 redirect to the
/// login page, matching the behavior shoppers see in a browser.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`]: redirect to the login page.
///
/// Built by hand rather than with `axum::response::Redirect`, which always
/// emits 303 See Other; unauthenticated access gets the conventional 302.
pub struct RedirectToLogin;

/// Login page unauthenticated requests are redirected to.
pub const LOGIN_PATH: &str = "/auth/login";

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        (
            StatusCode::FOUND,
            [(header::LOCATION, HeaderValue::from_static(LOGIN_PATH))],
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is inserted into extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(RedirectToLogin)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(RedirectToLogin)?;

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(session_keys::CURRENT_USER).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_302_to_login() {
        let response = RedirectToLogin.into_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );
    }
}

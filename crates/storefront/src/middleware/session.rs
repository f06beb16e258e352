//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions, with the
//! session cookie signed by the configured secret.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StoreConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bookstore_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The cookie is signed with a key derived from the configured session
/// secret; config validation guarantees the secret is long enough for key
/// derivation. The sessions table must be created via migration before use.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StoreConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let store = PostgresStore::new(pool.clone());

    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[tokio::test]
    async fn test_layer_builds_from_minimum_length_secret() {
        // 32 bytes is the validated minimum; key derivation must accept it.
        let config = StoreConfig {
            database_url: SecretString::from("postgres://localhost/bookstore"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            session_secret: SecretString::from("kX9f2mQ7vR4tY8wZ1nB5cD6gH3jL0pSa"),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPool::connect_lazy("postgres://localhost/bookstore").unwrap();

        let _layer = create_session_layer(&pool, &config);
    }
}

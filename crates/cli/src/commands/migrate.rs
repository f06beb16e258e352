//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bookstore-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKSTORE_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/storefront/migrations/` and are embedded
//! into the binary at compile time.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the environment variable is missing, the database
/// is unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BOOKSTORE_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("BOOKSTORE_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

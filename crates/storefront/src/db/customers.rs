//! Customer repository.

use sqlx::PgPool;

use bookstore_core::UserId;

use super::RepositoryError;
use crate::models::{Customer, CurrentUser};

const CUSTOMER_COLUMNS: &str = "id, user_id, phone, address, email, is_premium, created_at";

/// Repository for customer profiles.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the customer profile for a user, creating an empty one if absent.
    ///
    /// Idempotent; safe to call on every checkout and order-list view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user: &CurrentUser) -> Result<Customer, RepositoryError> {
        // ON CONFLICT keeps this race-free when two requests from the same
        // user arrive before the profile exists.
        sqlx::query(
            "INSERT INTO customers (user_id, email) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .execute(self.pool)
        .await?;

        self.get_by_user(user.id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get the customer profile for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }
}

//! Customer profile model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bookstore_core::{CustomerId, UserId};

/// Customer profile, one-to-one with an authenticated user.
///
/// Created lazily the first time the user checks out or views their orders.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

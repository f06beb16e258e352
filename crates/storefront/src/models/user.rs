//! Authenticated user model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bookstore_core::{Email, UserId};

/// A site account. Customer data lives on [`super::Customer`]; this is just
/// the credential identity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

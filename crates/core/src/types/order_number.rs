//! Order number generation.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A human-readable order number, e.g. `ORD20240115143022A3F9`.
///
/// Format: literal `ORD` prefix, a 14-digit second-granularity UTC timestamp,
/// and a random 4-character uppercase hex suffix. The suffix exists so that
/// concurrent checkouts within the same second do not collide; the database
/// additionally enforces a UNIQUE constraint as a backstop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Literal prefix of every order number.
    pub const PREFIX: &'static str = "ORD";

    /// Generate an order number for the given timestamp.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix: u16 = rand::random();
        Self(format!(
            "{}{}{suffix:04X}",
            Self::PREFIX,
            now.format("%Y%m%d%H%M%S")
        ))
    }

    /// Wrap a stored order number without validation.
    ///
    /// Intended for values read back from the database.
    #[must_use]
    pub fn from_stored(s: String) -> Self {
        Self(s)
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_stored(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 22).unwrap();
        let number = OrderNumber::generate(ts);
        let s = number.as_str();

        assert_eq!(s.len(), 21);
        assert!(s.starts_with("ORD20240115143022"));
        let suffix = &s[17..];
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_same_second_numbers_differ() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 22).unwrap();
        let numbers: std::collections::HashSet<String> = (0..100)
            .map(|_| OrderNumber::generate(ts).as_str().to_owned())
            .collect();
        // Random suffixes make an all-equal run vanishingly unlikely.
        assert!(numbers.len() > 1);
    }
}

//! Storage-backed nonce store for webhook replay protection.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlErr};
use uuid::Uuid;

use gstbooks_core::webhook::{NonceError, NonceStore};

use crate::entities::webhook_nonces;

/// Nonce repository.
///
/// Consumption is a single INSERT against the unique constraint on
/// `nonce`; two callbacks racing on the same nonce are serialized by the
/// database, never by an in-process check.
#[derive(Debug, Clone)]
pub struct NonceRepository {
    db: DatabaseConnection,
}

impl NonceRepository {
    /// Creates a new nonce repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl NonceStore for NonceRepository {
    async fn consume(&self, nonce: &str) -> Result<(), NonceError> {
        let row = webhook_nonces::ActiveModel {
            id: Set(Uuid::new_v4()),
            nonce: Set(nonce.to_string()),
            seen_at: Set(Utc::now().into()),
        };

        match row.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(NonceError::Replayed),
                _ => Err(NonceError::Backend(err.to_string())),
            },
        }
    }
}

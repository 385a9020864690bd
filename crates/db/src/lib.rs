//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the core persistence seams
//!
//! Every public repository operation runs inside one database transaction;
//! no operation spans multiple transactions. Uniqueness guarantees
//! (invoice numbers, webhook nonces) are storage-level constraints, never
//! check-then-insert sequences.

pub mod entities;
pub mod repositories;

pub use repositories::{
    AccountRepository, CurrencyRepository, FxRealizationRepository, InvoiceRepository,
    JournalRepository, NonceRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

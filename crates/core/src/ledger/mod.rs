//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal line inputs and validation (debits must equal credits)
//! - Account and balance types
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{AccountBalance, TrialBalanceRow};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{AccountType, CreateJournalInput, JournalLineInput, JournalTotals};

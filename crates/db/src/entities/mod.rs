//! `SeaORM` entity definitions.

pub mod accounts;
pub mod currencies;
pub mod einvoice_audit_events;
pub mod exchange_rates;
pub mod fx_realizations;
pub mod invoice_lines;
pub mod invoices;
pub mod journal_entries;
pub mod ledger_lines;
pub mod signed_documents;
pub mod webhook_nonces;

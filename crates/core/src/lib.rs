//! Core business logic for GSTBooks.
//!
//! This crate contains the domain engines of the system:
//! - Double-entry ledger validation and balance types
//! - Currency and exchange-rate resolution
//! - E-invoice lifecycle state machine and service
//! - Tax-authority gateway client (signing, retry, simulator fallback)
//! - Webhook ingress guard (replay protection, authenticity)
//! - FX realization arithmetic
//! - Interfaces for external collaborators (object store, work queue)
//!
//! Persistence seams are traits implemented by the `gstbooks-db` crate;
//! nothing in here talks to a database directly.

pub mod currency;
pub mod einvoice;
pub mod fx;
pub mod gateway;
pub mod ledger;
pub mod queue;
pub mod storage;
pub mod webhook;

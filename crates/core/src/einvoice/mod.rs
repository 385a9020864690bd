//! E-invoice lifecycle management.
//!
//! An invoice starts as a draft, receives an IRN from the tax authority (or
//! the local simulator) on submission, and is then driven to a terminal
//! state by authority callbacks. Every status or IRN mutation appends
//! exactly one audit event in the same unit of work.

pub mod audit;
pub mod error;
pub mod payload;
pub mod service;
pub mod status;
pub mod store;
pub mod types;

pub use audit::{AuditEvent, AuditEventKind, AuditWriteOutcome};
pub use error::EInvoiceError;
pub use payload::{EInvoicePayload, PayloadLine};
pub use service::{EInvoiceService, SubmissionOutcome, SubmissionRecord};
pub use status::EInvoiceStatus;
pub use store::EInvoiceStore;
pub use types::{
    CreateInvoiceInput, InvoiceLineInput, InvoiceLineRecord, InvoiceRecord, InvoiceWithLines,
    SignedDocumentRecord, StatusSnapshot,
};

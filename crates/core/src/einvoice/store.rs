//! Persistence seam for the e-invoice lifecycle.
//!
//! Implemented by the db crate. Every method is one unit of work: the
//! methods that mutate status or IRN MUST append their audit event inside
//! the same transaction and MUST validate the lifecycle transition (via
//! [`EInvoiceStatus::ensure_transition_to`]) against the currently stored
//! status, so concurrent callers cannot race past the state machine.

use uuid::Uuid;

use super::audit::{AuditEvent, AuditEventKind};
use super::error::EInvoiceError;
use super::status::EInvoiceStatus;
use super::types::{
    CreateInvoiceInput, InvoiceRecord, InvoiceWithLines, SignedDocumentRecord, StatusSnapshot,
};

/// Invoice and tax-document store.
pub trait EInvoiceStore: Send + Sync {
    /// Creates an invoice with its lines in one transaction.
    ///
    /// Invoice-number uniqueness is a storage constraint surfaced as
    /// `EInvoiceError::DuplicateInvoiceNumber`.
    fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> impl std::future::Future<Output = Result<InvoiceRecord, EInvoiceError>> + Send;

    /// Loads an invoice with its lines.
    fn load_invoice(
        &self,
        invoice_id: Uuid,
    ) -> impl std::future::Future<Output = Result<InvoiceWithLines, EInvoiceError>> + Send;

    /// Records a successful submission: sets the IRN and status and appends
    /// one `IRN_ASSIGNED` audit event, all in one transaction. The stored
    /// status must allow the transition.
    fn mark_submitted(
        &self,
        invoice_id: Uuid,
        irn: &str,
        status: EInvoiceStatus,
        details: &str,
    ) -> impl std::future::Future<Output = Result<InvoiceRecord, EInvoiceError>> + Send;

    /// Applies an authority status update located **by IRN**, appending one
    /// `GSTN_STATUS_UPDATE` audit event in the same transaction.
    fn update_status_by_irn(
        &self,
        irn: &str,
        status: EInvoiceStatus,
        details: &str,
    ) -> impl std::future::Future<Output = Result<InvoiceRecord, EInvoiceError>> + Send;

    /// Records a signed document plus one `SIGNED_DOC_UPLOADED` audit event
    /// in one transaction. No status change.
    fn attach_signed_document(
        &self,
        invoice_id: Uuid,
        filename: &str,
        locator: &str,
    ) -> impl std::future::Future<Output = Result<SignedDocumentRecord, EInvoiceError>> + Send;

    /// Marks the invoice LUT-applicable with a reference, appending one
    /// `LUT_APPLIED` audit event in the same transaction.
    fn apply_lut(
        &self,
        invoice_id: Uuid,
        lut_ref: &str,
    ) -> impl std::future::Future<Output = Result<InvoiceRecord, EInvoiceError>> + Send;

    /// Pure read: current status plus the most recent audit events,
    /// newest first.
    fn status_snapshot(
        &self,
        invoice_id: Uuid,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<StatusSnapshot, EInvoiceError>> + Send;

    /// Appends a standalone audit event (worker recording path).
    fn record_audit(
        &self,
        invoice_id: Uuid,
        event: AuditEventKind,
        details: &str,
    ) -> impl std::future::Future<Output = Result<AuditEvent, EInvoiceError>> + Send;
}

//! E-invoice lifecycle service.
//!
//! Drives an invoice through its state machine over the [`EInvoiceStore`]
//! seam: build the outbound payload, submit it through the gateway client,
//! apply authority callbacks, and attach signed documents. Store
//! implementations keep every status/IRN mutation and its audit event in
//! one transaction; this service sequences them.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::gateway::{AuthorityResponse, GatewayClient};
use crate::queue::{JobHandle, WorkQueue};
use crate::storage::{ObjectStore, PresignedUpload, signed_document_key};
use crate::webhook::VerifiedWebhook;

use super::audit::{AuditEventKind, AuditWriteOutcome};
use super::error::EInvoiceError;
use super::payload::EInvoicePayload;
use super::status::EInvoiceStatus;
use super::store::EInvoiceStore;
use super::types::{
    CreateInvoiceInput, InvoiceRecord, SignedDocumentRecord, StatusSnapshot,
};

/// Number of audit events a status snapshot carries by default.
const DEFAULT_SNAPSHOT_EVENTS: u64 = 5;

/// Task name used for queued gateway submissions.
pub const SUBMIT_TASK: &str = "einvoice_submit";

/// Result of a synchronous submission.
#[derive(Debug)]
pub struct SubmissionOutcome {
    /// The invoice after the IRN was recorded.
    pub invoice: InvoiceRecord,
    /// Response-signature verification flag from the gateway client.
    pub signature_verified: Option<bool>,
}

/// Composite result of the worker recording path.
///
/// The primary mutation and the audit write are reported separately so
/// callers can distinguish full success from success-with-audit-gap.
#[derive(Debug)]
pub struct SubmissionRecord {
    /// The invoice after recording, when the authority assigned an IRN.
    pub invoice: Option<InvoiceRecord>,
    /// Outcome of the `SUBMITTED_TO_GSP` audit write.
    pub audit: AuditWriteOutcome,
}

/// E-invoice lifecycle service.
pub struct EInvoiceService<S: EInvoiceStore> {
    store: Arc<S>,
    gateway: GatewayClient,
}

impl<S: EInvoiceStore> EInvoiceService<S> {
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, gateway: GatewayClient) -> Self {
        Self { store, gateway }
    }

    /// Creates an invoice in `Draft` state.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::DuplicateInvoiceNumber` when the number is
    /// taken.
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        self.store.create_invoice(input).await
    }

    /// Builds the outbound payload for an invoice.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::InvoiceNotFound` for unknown invoices.
    pub async fn build_payload(&self, invoice_id: Uuid) -> Result<EInvoicePayload, EInvoiceError> {
        let invoice = self.store.load_invoice(invoice_id).await?;
        Ok(EInvoicePayload::from_invoice(&invoice))
    }

    /// Submits a draft invoice to the authority and records the IRN.
    ///
    /// A gateway failure leaves the invoice untouched in `Draft`; there is
    /// no partial IRN.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::InvalidTransition` for non-draft invoices,
    /// `EInvoiceError::Gateway` after transport retries are exhausted, and
    /// `EInvoiceError::IrnNotAssigned` when the authority answered without
    /// an IRN.
    pub async fn submit(
        &self,
        invoice_id: Uuid,
        use_sandbox: bool,
    ) -> Result<SubmissionOutcome, EInvoiceError> {
        let invoice = self.store.load_invoice(invoice_id).await?;
        invoice
            .invoice
            .einvoice_status
            .ensure_transition_to(EInvoiceStatus::IrnAssigned)?;

        let payload = EInvoicePayload::from_invoice(&invoice);
        let response = self.gateway.submit(&payload, use_sandbox).await?;

        let irn = response.irn.ok_or(EInvoiceError::IrnNotAssigned {
            status: response.status.clone(),
        })?;
        let status: EInvoiceStatus = response.status.parse()?;

        let invoice = self
            .store
            .mark_submitted(invoice_id, &irn, status, &format!("IRN={irn}"))
            .await?;

        tracing::info!(%invoice_id, irn = %irn, "e-invoice submitted");
        Ok(SubmissionOutcome {
            invoice,
            signature_verified: response.signature_verified,
        })
    }

    /// Applies a guard-verified authority callback.
    ///
    /// The invoice is located **by IRN**; the status mutation and its
    /// `GSTN_STATUS_UPDATE` audit event commit together.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::InvoiceNotFoundForIrn` when no invoice
    /// holds the IRN, and `EInvoiceError::InvalidTransition` when the
    /// asserted status is not reachable.
    pub async fn apply_webhook(
        &self,
        verified: &VerifiedWebhook,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        let status: EInvoiceStatus = verified.status().parse()?;
        let invoice = self
            .store
            .update_status_by_irn(verified.irn(), status, &format!("status={status}"))
            .await?;
        tracing::info!(irn = %verified.irn(), %status, "webhook status applied");
        Ok(invoice)
    }

    /// Stores signed-document bytes and records the attachment.
    ///
    /// No status change; the `SIGNED_DOC_UPLOADED` audit event commits with
    /// the document row.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::Storage` when the object store fails (fast
    /// and explicit, never silent).
    pub async fn attach_signed_document<O: ObjectStore>(
        &self,
        objects: &O,
        invoice_id: Uuid,
        filename: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<SignedDocumentRecord, EInvoiceError> {
        // Existence check up front so storage is never written for a
        // missing invoice.
        self.store.load_invoice(invoice_id).await?;

        let key = signed_document_key(invoice_id, filename);
        let locator = objects.put(&key, bytes, content_type).await?;

        self.store
            .attach_signed_document(invoice_id, filename, &locator)
            .await
    }

    /// Returns a presigned PUT for a direct signed-document upload, plus
    /// the storage key the client must use.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::Storage` when presigning is unavailable.
    pub async fn presign_signed_upload<O: ObjectStore>(
        &self,
        objects: &O,
        invoice_id: Uuid,
        filename: &str,
    ) -> Result<(PresignedUpload, String), EInvoiceError> {
        self.store.load_invoice(invoice_id).await?;
        let key = signed_document_key(invoice_id, filename);
        let presigned = objects.presign_put(&key).await?;
        Ok((presigned, key))
    }

    /// Marks the invoice LUT-applicable with a reference.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::InvoiceNotFound` for unknown invoices.
    pub async fn apply_lut(
        &self,
        invoice_id: Uuid,
        lut_ref: &str,
    ) -> Result<InvoiceRecord, EInvoiceError> {
        self.store.apply_lut(invoice_id, lut_ref).await
    }

    /// Pure read: current status plus recent audit events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::InvoiceNotFound` for unknown invoices.
    pub async fn status_snapshot(
        &self,
        invoice_id: Uuid,
        limit: Option<u64>,
    ) -> Result<StatusSnapshot, EInvoiceError> {
        self.store
            .status_snapshot(invoice_id, limit.unwrap_or(DEFAULT_SNAPSHOT_EVENTS))
            .await
    }

    /// Hands a submission to the work queue.
    ///
    /// The worker later runs [`Self::process_submission`] with the same
    /// arguments; with no queue configured, callers run it inline instead
    /// and block for the full retry duration. Identical result contract
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::Queue` when the transport rejects the job.
    pub async fn enqueue_submission<Q: WorkQueue>(
        &self,
        queue: &Q,
        invoice_id: Uuid,
        use_sandbox: bool,
    ) -> Result<JobHandle, EInvoiceError> {
        let invoice = self.store.load_invoice(invoice_id).await?;
        invoice
            .invoice
            .einvoice_status
            .ensure_transition_to(EInvoiceStatus::IrnAssigned)?;

        let handle = queue
            .enqueue(
                SUBMIT_TASK,
                json!({ "invoice_id": invoice_id, "use_sandbox": use_sandbox }),
            )
            .await?;
        tracing::info!(%invoice_id, job = %handle.id, "submission enqueued");
        Ok(handle)
    }

    /// Worker path: submit and record the result with a composite outcome.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when every transport attempt failed; the
    /// invoice stays in its pre-submission state.
    pub async fn process_submission(
        &self,
        invoice_id: Uuid,
        use_sandbox: bool,
    ) -> Result<SubmissionRecord, EInvoiceError> {
        let invoice = self.store.load_invoice(invoice_id).await?;
        let payload = EInvoicePayload::from_invoice(&invoice);
        let response = self.gateway.submit(&payload, use_sandbox).await?;
        self.record_submission_result(invoice_id, &response).await
    }

    /// Records a gateway response: the primary IRN/status write commits
    /// transactionally, then the `SUBMITTED_TO_GSP` audit write runs as a
    /// separate outcome instead of being swallowed on failure.
    ///
    /// # Errors
    ///
    /// Returns store errors from the primary write only; an audit-write
    /// failure is reported in the returned record.
    pub async fn record_submission_result(
        &self,
        invoice_id: Uuid,
        response: &AuthorityResponse,
    ) -> Result<SubmissionRecord, EInvoiceError> {
        let invoice = match &response.irn {
            Some(irn) => {
                let status = response.status.parse().unwrap_or_else(|_| {
                    tracing::warn!(status = %response.status, "authority reported unknown status; recording IRN_ASSIGNED");
                    EInvoiceStatus::IrnAssigned
                });
                Some(
                    self.store
                        .mark_submitted(invoice_id, irn, status, &format!("IRN={irn}"))
                        .await?,
                )
            }
            None => None,
        };

        let details = format!("status={} irn={:?}", response.status, response.irn);
        let audit = match self
            .store
            .record_audit(invoice_id, AuditEventKind::SubmittedToGsp, &details)
            .await
        {
            Ok(_) => AuditWriteOutcome::Recorded,
            Err(err) => {
                tracing::error!(%invoice_id, error = %err, "submission audit write failed");
                AuditWriteOutcome::Failed(err.to_string())
            }
        };

        Ok(SubmissionRecord { invoice, audit })
    }
}

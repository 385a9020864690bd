//! E-invoice audit trail types.
//!
//! Audit events are append-only, immutable, and time-ordered. Mutations of
//! status or IRN write their event in the same transaction; the worker
//! recording path reports its audit write as a separate outcome instead of
//! swallowing failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known audit event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    /// An IRN was assigned on submission.
    IrnAssigned,
    /// The authority pushed a status change via webhook.
    GstnStatusUpdate,
    /// A signed document was attached.
    SignedDocUploaded,
    /// A gateway submission result was recorded by the worker.
    SubmittedToGsp,
    /// A Letter of Undertaking reference was applied.
    LutApplied,
}

impl AuditEventKind {
    /// Returns the canonical tag string stored with the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IrnAssigned => "IRN_ASSIGNED",
            Self::GstnStatusUpdate => "GSTN_STATUS_UPDATE",
            Self::SignedDocUploaded => "SIGNED_DOC_UPLOADED",
            Self::SubmittedToGsp => "SUBMITTED_TO_GSP",
            Self::LutApplied => "LUT_APPLIED",
        }
    }
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// The invoice the event belongs to.
    pub invoice_id: Uuid,
    /// Event tag (see [`AuditEventKind`]).
    pub event: String,
    /// Free-form details.
    pub details: Option<String>,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Outcome of a best-effort audit write that runs outside the primary
/// transaction.
///
/// Callers can distinguish full success from success-with-audit-gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditWriteOutcome {
    /// The audit event was recorded.
    Recorded,
    /// The audit write failed; the primary mutation still committed.
    Failed(String),
}

impl AuditWriteOutcome {
    /// Returns true if the audit event was recorded.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tags() {
        assert_eq!(AuditEventKind::IrnAssigned.as_str(), "IRN_ASSIGNED");
        assert_eq!(
            AuditEventKind::GstnStatusUpdate.as_str(),
            "GSTN_STATUS_UPDATE"
        );
        assert_eq!(
            AuditEventKind::SignedDocUploaded.as_str(),
            "SIGNED_DOC_UPLOADED"
        );
        assert_eq!(AuditEventKind::SubmittedToGsp.as_str(), "SUBMITTED_TO_GSP");
        assert_eq!(AuditEventKind::LutApplied.as_str(), "LUT_APPLIED");
    }

    #[test]
    fn test_audit_outcome() {
        assert!(AuditWriteOutcome::Recorded.is_recorded());
        assert!(!AuditWriteOutcome::Failed("db down".into()).is_recorded());
    }
}

//! Object storage interface for signed documents.
//!
//! The adapter itself (S3, local filesystem, ...) lives outside this
//! system; the core only depends on this trait. A misconfigured store must
//! fail fast and explicitly, never degrade silently.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the object storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store is not configured for the requested operation.
    #[error("Object storage not configured: {0}")]
    NotConfigured(String),

    /// The backing store failed.
    #[error("Object storage operation failed: {0}")]
    Backend(String),
}

/// A presigned PUT target for direct client uploads.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUpload {
    /// The URL to PUT the bytes to.
    pub url: String,
    /// Headers the client must send with the PUT.
    pub headers: HashMap<String, String>,
}

/// Object storage collaborator.
pub trait ObjectStore: Send + Sync {
    /// Stores bytes under a key and returns an opaque locator.
    fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;

    /// Returns a presigned PUT for a direct upload of `key`.
    fn presign_put(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<PresignedUpload, StorageError>> + Send;
}

/// Storage key for a signed document.
///
/// Format: `signed/{invoice_id}/{filename}`
#[must_use]
pub fn signed_document_key(invoice_id: Uuid, filename: &str) -> String {
    format!("signed/{invoice_id}/{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_document_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            signed_document_key(id, "invoice.pdf"),
            format!("signed/{id}/invoice.pdf")
        );
    }
}

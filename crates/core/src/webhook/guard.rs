//! Replay and authenticity checks for inbound callbacks.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use gstbooks_shared::config::WebhookConfig;

use super::error::WebhookError;
use super::signature::{canonical_string, verify_callback};

/// Raw inbound callback body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookCallback {
    /// IRN the callback refers to.
    pub irn: String,
    /// New status asserted by the authority.
    pub status: String,
    /// Hex HMAC signature over the canonical string.
    #[serde(default)]
    pub signature: Option<String>,
    /// Single-use token.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Callback timestamp (RFC 3339, or naive ISO 8601 assumed UTC).
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A callback that passed every guard check.
///
/// Only the guard can mint this; the lifecycle manager accepts nothing
/// else for webhook-driven updates.
#[derive(Debug, Clone)]
pub struct VerifiedWebhook {
    irn: String,
    status: String,
}

impl VerifiedWebhook {
    /// IRN the callback refers to.
    #[must_use]
    pub fn irn(&self) -> &str {
        &self.irn
    }

    /// New status asserted by the authority.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[cfg(test)]
    pub(crate) fn for_tests(irn: &str, status: &str) -> Self {
        Self {
            irn: irn.to_string(),
            status: status.to_string(),
        }
    }
}

/// Errors from the nonce store.
#[derive(Debug, Error)]
pub enum NonceError {
    /// The nonce was seen before.
    #[error("nonce already used")]
    Replayed,

    /// The backing store failed.
    #[error("nonce store failure: {0}")]
    Backend(String),
}

/// Append-only nonce store.
///
/// Uniqueness must be a storage-level constraint: `consume` is a single
/// atomic insert, never a check-then-insert sequence.
pub trait NonceStore: Send + Sync {
    /// Records the nonce, failing with `NonceError::Replayed` if it was
    /// ever seen before.
    fn consume(
        &self,
        nonce: &str,
    ) -> impl std::future::Future<Output = Result<(), NonceError>> + Send;
}

/// Webhook ingress guard.
///
/// Holds no state beyond the nonce store. Checks run in a fixed order:
/// nonce, then timestamp, then signature — the nonce is consumed even when
/// a later check fails, so an attacker cannot refine and resend a rejected
/// callback under the same nonce.
pub struct WebhookGuard<N: NonceStore> {
    config: WebhookConfig,
    nonces: N,
}

impl<N: NonceStore> WebhookGuard<N> {
    /// Creates a guard over a nonce store.
    pub const fn new(config: WebhookConfig, nonces: N) -> Self {
        Self { config, nonces }
    }

    /// Runs all checks against a callback.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's `WebhookError`; the nonce is
    /// consumed before any other check runs.
    pub async fn admit(&self, callback: &WebhookCallback) -> Result<VerifiedWebhook, WebhookError> {
        let nonce = callback.nonce.as_deref().unwrap_or("");
        if nonce.is_empty() {
            return Err(WebhookError::MissingNonce);
        }
        self.nonces.consume(nonce).await.map_err(|e| match e {
            NonceError::Replayed => WebhookError::ReplayedNonce,
            NonceError::Backend(msg) => WebhookError::Store(msg),
        })?;

        let timestamp = callback.timestamp.as_deref().unwrap_or("");
        if !timestamp.is_empty() {
            let parsed = parse_timestamp(timestamp)
                .ok_or_else(|| WebhookError::InvalidTimestamp(timestamp.to_string()))?;
            let skew_secs = (Utc::now() - parsed).num_seconds().abs();
            if skew_secs > self.config.timestamp_window_secs {
                return Err(WebhookError::TimestampOutOfWindow { skew_secs });
            }
        }

        let text = canonical_string(&callback.irn, &callback.status, nonce, timestamp);
        let authentic = callback
            .signature
            .as_deref()
            .is_some_and(|sig| verify_callback(self.config.signing_secret.as_bytes(), &text, sig));
        if !authentic {
            return Err(WebhookError::InvalidSignature);
        }

        tracing::debug!(irn = %callback.irn, status = %callback.status, "webhook callback admitted");
        Ok(VerifiedWebhook {
            irn: callback.irn.clone(),
            status: callback.status.clone(),
        })
    }
}

/// Parses an RFC 3339 timestamp, or a naive ISO 8601 one assumed UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::signature::sign_callback;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory stand-in for the storage-backed nonce store.
    #[derive(Default)]
    struct MemoryNonceStore {
        seen: Mutex<HashSet<String>>,
    }

    impl NonceStore for MemoryNonceStore {
        async fn consume(&self, nonce: &str) -> Result<(), NonceError> {
            let mut seen = self.seen.lock().expect("nonce set poisoned");
            if seen.insert(nonce.to_string()) {
                Ok(())
            } else {
                Err(NonceError::Replayed)
            }
        }
    }

    fn guard() -> WebhookGuard<MemoryNonceStore> {
        WebhookGuard::new(WebhookConfig::default(), MemoryNonceStore::default())
    }

    fn signed_callback(irn: &str, status: &str, nonce: &str, timestamp: &str) -> WebhookCallback {
        let text = canonical_string(irn, status, nonce, timestamp);
        let signature = sign_callback(b"dev-secret-key", &text);
        WebhookCallback {
            irn: irn.to_string(),
            status: status.to_string(),
            signature: Some(signature),
            nonce: (!nonce.is_empty()).then(|| nonce.to_string()),
            timestamp: (!timestamp.is_empty()).then(|| timestamp.to_string()),
        }
    }

    fn now_rfc3339() -> String {
        Utc::now().to_rfc3339()
    }

    #[tokio::test]
    async fn test_valid_callback_admitted() {
        let ts = now_rfc3339();
        let callback = signed_callback("IRN-1", "VALID", "n1", &ts);
        let verified = guard().admit(&callback).await.unwrap();
        assert_eq!(verified.irn(), "IRN-1");
        assert_eq!(verified.status(), "VALID");
    }

    #[tokio::test]
    async fn test_missing_nonce_rejected() {
        let callback = signed_callback("IRN-1", "VALID", "", "");
        assert_eq!(
            guard().admit(&callback).await.unwrap_err(),
            WebhookError::MissingNonce
        );
    }

    #[tokio::test]
    async fn test_replayed_nonce_rejected() {
        let g = guard();
        let ts = now_rfc3339();
        let callback = signed_callback("IRN-1", "VALID", "n1", &ts);
        g.admit(&callback).await.unwrap();

        let replay = signed_callback("IRN-1", "VALID", "n1", &ts);
        assert_eq!(
            g.admit(&replay).await.unwrap_err(),
            WebhookError::ReplayedNonce
        );
    }

    #[tokio::test]
    async fn test_rejected_callback_still_consumes_nonce() {
        let g = guard();
        // Bad signature, fresh nonce: rejected on signature...
        let mut callback = signed_callback("IRN-1", "VALID", "n1", "");
        callback.signature = Some("deadbeef".to_string());
        assert_eq!(
            g.admit(&callback).await.unwrap_err(),
            WebhookError::InvalidSignature
        );

        // ...and a corrected resend under the same nonce is now a replay.
        let corrected = signed_callback("IRN-1", "VALID", "n1", "");
        assert_eq!(
            g.admit(&corrected).await.unwrap_err(),
            WebhookError::ReplayedNonce
        );
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_rejected() {
        let callback = signed_callback("IRN-1", "VALID", "n1", "yesterday-ish");
        assert!(matches!(
            guard().admit(&callback).await.unwrap_err(),
            WebhookError::InvalidTimestamp(_)
        ));
    }

    #[tokio::test]
    async fn test_stale_timestamp_rejected() {
        let stale = (Utc::now() - chrono::Duration::seconds(301)).to_rfc3339();
        let callback = signed_callback("IRN-1", "VALID", "n1", &stale);
        assert!(matches!(
            guard().admit(&callback).await.unwrap_err(),
            WebhookError::TimestampOutOfWindow { .. }
        ));
    }

    #[tokio::test]
    async fn test_future_timestamp_rejected() {
        let future = (Utc::now() + chrono::Duration::seconds(600)).to_rfc3339();
        let callback = signed_callback("IRN-1", "VALID", "n1", &future);
        assert!(matches!(
            guard().admit(&callback).await.unwrap_err(),
            WebhookError::TimestampOutOfWindow { .. }
        ));
    }

    #[tokio::test]
    async fn test_absent_timestamp_is_accepted() {
        let callback = signed_callback("IRN-1", "VALID", "n1", "");
        assert!(guard().admit(&callback).await.is_ok());
    }

    #[tokio::test]
    async fn test_absent_signature_rejected() {
        let mut callback = signed_callback("IRN-1", "VALID", "n1", "");
        callback.signature = None;
        assert_eq!(
            guard().admit(&callback).await.unwrap_err(),
            WebhookError::InvalidSignature
        );
    }

    #[tokio::test]
    async fn test_naive_timestamp_parses_as_utc() {
        let naive = Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        let callback = signed_callback("IRN-1", "VALID", "n1", &naive);
        assert!(guard().admit(&callback).await.is_ok());
    }
}

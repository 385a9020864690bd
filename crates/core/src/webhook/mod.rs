//! Webhook ingress guard.
//!
//! Inbound authority callbacks pass three ordered checks before any state
//! mutation: nonce replay protection, timestamp freshness, and an HMAC
//! authenticity check. Success mints a [`VerifiedWebhook`], the only value
//! the lifecycle manager accepts for webhook-driven updates.

pub mod error;
pub mod guard;
pub mod signature;

pub use error::WebhookError;
pub use guard::{NonceError, NonceStore, VerifiedWebhook, WebhookCallback, WebhookGuard};
pub use signature::{canonical_string, sign_callback, verify_callback};

//! Deterministic local authority simulator.
//!
//! Used when no gateway endpoint is configured: local environments get the
//! full submission flow without network access. The canned IRN is derived
//! from the invoice number, so repeated submissions are reproducible.

use crate::einvoice::payload::EInvoicePayload;

use super::client::AuthorityResponse;

/// Simulated tax authority.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAuthority;

impl SimulatedAuthority {
    /// Accepts a payload and assigns a deterministic IRN.
    #[must_use]
    pub fn submit(&self, payload: &EInvoicePayload) -> AuthorityResponse {
        AuthorityResponse {
            status: "IRN_ASSIGNED".to_string(),
            irn: Some(format!("IRN-SIM-{}", payload.invoice_number)),
            signature_verified: None,
        }
    }

    /// Reports the status of a previously assigned IRN.
    #[must_use]
    pub fn get_status(&self, irn: &str) -> AuthorityResponse {
        AuthorityResponse {
            status: "VALID".to_string(),
            irn: Some(irn.to_string()),
            signature_verified: None,
        }
    }
}

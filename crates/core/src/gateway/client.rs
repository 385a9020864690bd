//! Gateway client: transport, signing, and retry.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use gstbooks_shared::config::GatewayConfig;

use crate::einvoice::payload::EInvoicePayload;

use super::error::GatewayError;
use super::signing::{PayloadSigner, ResponseVerifier};
use super::simulator::SimulatedAuthority;

/// Authority response under the common return contract.
#[derive(Debug, Clone)]
pub struct AuthorityResponse {
    /// Authority status string (e.g. `IRN_ASSIGNED`).
    pub status: String,
    /// Assigned IRN, when the authority returned one.
    pub irn: Option<String>,
    /// Result of response-signature verification: `None` when no verifying
    /// key is configured or the response carried no signature. A `false`
    /// here is surfaced to the caller, not treated as a transport failure.
    pub signature_verified: Option<bool>,
}

/// Wire shape of the authority response body.
#[derive(Debug, Deserialize)]
struct WireResponse {
    status: String,
    #[serde(default)]
    irn: Option<String>,
}

/// The authority integration, selected once at construction.
pub enum Authority {
    /// Deterministic local simulator (no endpoint configured).
    Simulated(SimulatedAuthority),
    /// Remote gateway over HTTP.
    Remote(Box<RemoteAuthority>),
}

impl std::fmt::Debug for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulated(_) => f.write_str("Authority::Simulated"),
            Self::Remote(_) => f.write_str("Authority::Remote"),
        }
    }
}

/// Remote gateway transport with signing and retries.
pub struct RemoteAuthority {
    http: reqwest::Client,
    base_url: String,
    sandbox_url: Option<String>,
    retries: u32,
    backoff_factor: Decimal,
    backoff_ceiling: Duration,
    signer: Option<PayloadSigner>,
    verifier: Option<ResponseVerifier>,
}

/// Outcome of a single transport attempt.
enum AttemptError {
    /// Worth retrying: timeout, connection error, non-2xx.
    Transport(String),
    /// Not worth retrying: the authority answered but unusably.
    Fatal(GatewayError),
}

impl RemoteAuthority {
    fn from_config(config: &GatewayConfig, base_url: String) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            sandbox_url: config.sandbox_url.clone(),
            retries: config.retries.max(1),
            backoff_factor: config.backoff_factor,
            backoff_ceiling: Duration::from_secs(config.backoff_ceiling_secs),
            signer: load_signer(config),
            verifier: load_verifier(config),
        })
    }

    async fn submit(&self, body: Vec<u8>, use_sandbox: bool) -> Result<AuthorityResponse, GatewayError> {
        let base = if use_sandbox {
            self.sandbox_url.as_deref().unwrap_or(&self.base_url)
        } else {
            &self.base_url
        };
        let url = format!("{}/einvoice/submit", base.trim_end_matches('/'));
        let signature = self.signer.as_ref().map(|s| s.sign(&body));

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.try_submit(&url, &body, signature.as_deref()).await {
                Ok(response) => return Ok(response),
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Transport(last)) => {
                    tracing::warn!(attempt, error = %last, "gateway submission attempt failed");
                    if attempt >= self.retries {
                        return Err(GatewayError::SubmissionFailed {
                            attempts: attempt,
                            last,
                        });
                    }
                    tokio::time::sleep(self.backoff_delay(attempt)).await;
                }
            }
        }
    }

    async fn try_submit(
        &self,
        url: &str,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<AuthorityResponse, AttemptError> {
        let mut request = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec());
        if let Some(sig) = signature {
            request = request.header("X-Signature", sig);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Transport(format!(
                "gateway returned {status}"
            )));
        }

        let signature_header = response
            .headers()
            .get("signature")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let text = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let wire: WireResponse = serde_json::from_str(&text)
            .map_err(|e| AttemptError::Fatal(GatewayError::MalformedResponse(e.to_string())))?;

        // Verification covers the raw response body. A mismatch is flagged
        // for the caller rather than rejecting the response.
        let signature_verified = match (&self.verifier, signature_header) {
            (Some(verifier), Some(sig)) => {
                let verified = verifier.verify(text.as_bytes(), &sig);
                if !verified {
                    tracing::warn!("gateway response signature verification failed");
                }
                Some(verified)
            }
            _ => None,
        };

        Ok(AuthorityResponse {
            status: wire.status,
            irn: wire.irn,
            signature_verified,
        })
    }

    /// Delay before the retry that follows failed attempt `attempt`
    /// (1-based): `backoff_factor^attempt` seconds, capped at the ceiling.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let mut seconds = Decimal::ONE;
        for _ in 0..attempt {
            seconds *= self.backoff_factor;
        }
        let millis = (seconds * Decimal::from(1000)).to_u64().unwrap_or(u64::MAX);
        Duration::from_millis(millis).min(self.backoff_ceiling)
    }
}

fn load_signer(config: &GatewayConfig) -> Option<PayloadSigner> {
    let path = config.signing_key_path.as_ref()?;
    match std::fs::read_to_string(path) {
        Ok(material) => match PayloadSigner::from_hex(&material) {
            Ok(signer) => Some(signer),
            Err(_) => {
                tracing::warn!(path = %path.display(), "unusable signing key; submitting unsigned");
                None
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read signing key; submitting unsigned");
            None
        }
    }
}

fn load_verifier(config: &GatewayConfig) -> Option<ResponseVerifier> {
    let path = config.verify_key_path.as_ref()?;
    match std::fs::read_to_string(path) {
        Ok(material) => match ResponseVerifier::from_hex(&material) {
            Ok(verifier) => Some(verifier),
            Err(_) => {
                tracing::warn!(path = %path.display(), "unusable verifying key; skipping response verification");
                None
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read verifying key; skipping response verification");
            None
        }
    }
}

/// Gateway client over the selected authority.
#[derive(Debug)]
pub struct GatewayClient {
    authority: Authority,
}

impl GatewayClient {
    /// Builds a client from configuration.
    ///
    /// With neither a base nor a sandbox URL configured, the client routes
    /// to the local simulator.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Configuration` when the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let effective_base = config
            .base_url
            .clone()
            .or_else(|| config.sandbox_url.clone());

        let authority = match effective_base {
            Some(base) => Authority::Remote(Box::new(RemoteAuthority::from_config(config, base)?)),
            None => {
                tracing::info!("no gateway endpoint configured; using simulated authority");
                Authority::Simulated(SimulatedAuthority)
            }
        };

        Ok(Self { authority })
    }

    /// Builds a client that always uses the local simulator.
    #[must_use]
    pub const fn simulated() -> Self {
        Self {
            authority: Authority::Simulated(SimulatedAuthority),
        }
    }

    /// Returns true when this client routes to the simulator.
    #[must_use]
    pub const fn is_simulated(&self) -> bool {
        matches!(self.authority, Authority::Simulated(_))
    }

    /// Submits a payload to the authority.
    ///
    /// The canonical payload bytes are serialized once: the same bytes are
    /// signed (when a key is configured) and transmitted.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::SubmissionFailed` after exhausting retries,
    /// or other `GatewayError` values for non-retriable failures.
    pub async fn submit(
        &self,
        payload: &EInvoicePayload,
        use_sandbox: bool,
    ) -> Result<AuthorityResponse, GatewayError> {
        match &self.authority {
            Authority::Simulated(simulator) => {
                tracing::debug!(invoice_number = %payload.invoice_number, "submitting to simulated authority");
                Ok(simulator.submit(payload))
            }
            Authority::Remote(remote) => {
                let body = payload
                    .to_canonical_bytes()
                    .map_err(|e| GatewayError::Serialization(e.to_string()))?;
                remote.submit(body, use_sandbox).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::einvoice::payload::PayloadLine;
    use rust_decimal_macros::dec;

    fn payload() -> EInvoicePayload {
        EInvoicePayload {
            supplier_name: None,
            supplier_gstin: None,
            invoice_number: "INV-7".to_string(),
            date: "2026-04-12".to_string(),
            customer_name: None,
            customer_gstin: None,
            place_of_supply: None,
            is_export: false,
            lut_applicable: false,
            iec: None,
            currency: "INR".to_string(),
            total_amount: dec!(500),
            lines: vec![PayloadLine {
                description: None,
                quantity: dec!(1),
                unit_rate: dec!(500),
                amount: dec!(500),
                igst: dec!(0),
                cgst: dec!(0),
                sgst: dec!(0),
            }],
        }
    }

    fn unreachable_config(retries: u32) -> GatewayConfig {
        GatewayConfig {
            base_url: Some("http://127.0.0.1:1".to_string()),
            sandbox_url: None,
            timeout_secs: 1,
            retries,
            backoff_factor: dec!(0.01),
            backoff_ceiling_secs: 1,
            signing_key_path: None,
            verify_key_path: None,
        }
    }

    #[test]
    fn test_unconfigured_client_routes_to_simulator() {
        let client = GatewayClient::from_config(&GatewayConfig::default()).unwrap();
        assert!(client.is_simulated());
    }

    #[test]
    fn test_configured_client_routes_to_remote() {
        let client = GatewayClient::from_config(&unreachable_config(3)).unwrap();
        assert!(!client.is_simulated());
    }

    #[tokio::test]
    async fn test_simulated_submit_contract() {
        let client = GatewayClient::simulated();
        let response = client.submit(&payload(), false).await.unwrap();
        assert_eq!(response.status, "IRN_ASSIGNED");
        assert_eq!(response.irn.as_deref(), Some("IRN-SIM-INV-7"));
        assert!(response.signature_verified.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_attempt_count() {
        let client = GatewayClient::from_config(&unreachable_config(3)).unwrap();
        let err = client.submit(&payload(), false).await.unwrap_err();
        match err {
            GatewayError::SubmissionFailed { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected SubmissionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_retries_still_attempts_once() {
        let client = GatewayClient::from_config(&unreachable_config(0)).unwrap();
        let err = client.submit(&payload(), false).await.unwrap_err();
        match err {
            GatewayError::SubmissionFailed { attempts, .. } => assert_eq!(attempts, 1),
            other => panic!("expected SubmissionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let remote = RemoteAuthority {
            http: reqwest::Client::new(),
            base_url: "http://example.invalid".to_string(),
            sandbox_url: None,
            retries: 5,
            backoff_factor: dec!(2),
            backoff_ceiling: Duration::from_secs(5),
            signer: None,
            verifier: None,
        };
        assert_eq!(remote.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(remote.backoff_delay(2), Duration::from_secs(4));
        // 2^3 = 8s exceeds the 5s ceiling
        assert_eq!(remote.backoff_delay(3), Duration::from_secs(5));
    }

    #[test]
    fn test_sandbox_base_selected_when_requested() {
        let config = GatewayConfig {
            base_url: Some("http://prod.invalid".to_string()),
            sandbox_url: Some("http://sandbox.invalid".to_string()),
            ..unreachable_config(1)
        };
        let remote = RemoteAuthority::from_config(&config, "http://prod.invalid".to_string()).unwrap();
        assert_eq!(remote.sandbox_url.as_deref(), Some("http://sandbox.invalid"));
    }
}

//! Ed25519 signing for gateway payloads.
//!
//! Keys are hex-encoded 32-byte values. The signer covers the exact
//! canonical payload bytes; the verifier covers the raw response body.

use ed25519_dalek::{Signer, Verifier};
use thiserror::Error;

/// Errors from key material handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The key is not valid hex or has the wrong length.
    #[error("invalid key material")]
    InvalidKey,
}

/// Ed25519 signer for outbound payloads.
pub struct PayloadSigner(ed25519_dalek::SigningKey);

impl PayloadSigner {
    /// Creates a signer from a hex-encoded 32-byte seed.
    ///
    /// # Errors
    ///
    /// Returns `SigningError::InvalidKey` for malformed material.
    pub fn from_hex(hex_seed: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(hex_seed.trim()).map_err(|_| SigningError::InvalidKey)?;
        let seed: [u8; 32] = bytes.try_into().map_err(|_| SigningError::InvalidKey)?;
        Ok(Self(ed25519_dalek::SigningKey::from_bytes(&seed)))
    }

    /// Signs a message, returning the hex signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> String {
        hex::encode(self.0.sign(message).to_bytes())
    }

    /// The corresponding verifier.
    #[must_use]
    pub fn verifier(&self) -> ResponseVerifier {
        ResponseVerifier(self.0.verifying_key())
    }
}

impl std::fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PayloadSigner(<redacted>)")
    }
}

/// Ed25519 verifier for response signatures.
#[derive(Clone)]
pub struct ResponseVerifier(ed25519_dalek::VerifyingKey);

impl ResponseVerifier {
    /// Creates a verifier from a hex-encoded 32-byte public key.
    ///
    /// # Errors
    ///
    /// Returns `SigningError::InvalidKey` for malformed material.
    pub fn from_hex(hex_key: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(hex_key.trim()).map_err(|_| SigningError::InvalidKey)?;
        let raw: [u8; 32] = bytes.try_into().map_err(|_| SigningError::InvalidKey)?;
        let key =
            ed25519_dalek::VerifyingKey::from_bytes(&raw).map_err(|_| SigningError::InvalidKey)?;
        Ok(Self(key))
    }

    /// Verifies a hex signature over a message.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature_hex: &str) -> bool {
        let Ok(bytes) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(raw) = <[u8; 64]>::try_from(bytes) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&raw);
        self.0.verify(message, &signature).is_ok()
    }
}

impl std::fmt::Debug for ResponseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResponseVerifier({})", hex::encode(self.0.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_HEX: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

    #[test]
    fn test_sign_and_verify() {
        let signer = PayloadSigner::from_hex(SEED_HEX).unwrap();
        let verifier = signer.verifier();
        let message = b"{\"invoice_number\":\"INV-1\"}";
        let signature = signer.sign(message);
        assert!(verifier.verify(message, &signature));
    }

    #[test]
    fn test_verify_fails_on_tampered_message() {
        let signer = PayloadSigner::from_hex(SEED_HEX).unwrap();
        let verifier = signer.verifier();
        let signature = signer.sign(b"original");
        assert!(!verifier.verify(b"tampered", &signature));
    }

    #[test]
    fn test_verify_fails_on_garbage_signature() {
        let signer = PayloadSigner::from_hex(SEED_HEX).unwrap();
        let verifier = signer.verifier();
        assert!(!verifier.verify(b"message", "not-hex"));
        assert!(!verifier.verify(b"message", "abcd"));
    }

    #[test]
    fn test_invalid_key_material() {
        assert_eq!(
            PayloadSigner::from_hex("zz").unwrap_err(),
            SigningError::InvalidKey
        );
        assert_eq!(
            PayloadSigner::from_hex("abcd").unwrap_err(),
            SigningError::InvalidKey
        );
        assert_eq!(
            ResponseVerifier::from_hex("abcd").unwrap_err(),
            SigningError::InvalidKey
        );
    }

    #[test]
    fn test_signer_debug_redacts() {
        let signer = PayloadSigner::from_hex(SEED_HEX).unwrap();
        assert!(format!("{signer:?}").contains("redacted"));
    }
}

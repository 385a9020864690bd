//! Callback authentication via HMAC-SHA256.
//!
//! The canonical string is `"{irn}|{status}|{nonce}|{timestamp}"`, with the
//! empty string standing in for absent fields. Signatures are hex-encoded
//! and compared in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Builds the canonical string a callback signature covers.
#[must_use]
pub fn canonical_string(irn: &str, status: &str, nonce: &str, timestamp: &str) -> String {
    format!("{irn}|{status}|{nonce}|{timestamp}")
}

/// Signs a canonical string with the shared secret, returning hex.
#[must_use]
pub fn sign_callback(secret: &[u8], text: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(text.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex signature over a canonical string.
///
/// The comparison runs in constant time; malformed hex verifies as false.
#[must_use]
pub fn verify_callback(secret: &[u8], text: &str, signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(text.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"dev-secret-key";

    #[test]
    fn test_canonical_string_shape() {
        assert_eq!(
            canonical_string("IRN-1", "VALID", "n1", "2026-04-12T10:00:00Z"),
            "IRN-1|VALID|n1|2026-04-12T10:00:00Z"
        );
        // Absent fields collapse to empty segments.
        assert_eq!(canonical_string("IRN-1", "VALID", "", ""), "IRN-1|VALID||");
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let text = canonical_string("IRN-1", "VALID", "n1", "");
        let signature = sign_callback(SECRET, &text);
        assert!(verify_callback(SECRET, &text, &signature));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let text = canonical_string("IRN-1", "VALID", "n1", "");
        let signature = sign_callback(b"other-secret", &text);
        assert!(!verify_callback(SECRET, &text, &signature));
    }

    #[test]
    fn test_verify_rejects_tampered_text() {
        let signature = sign_callback(SECRET, &canonical_string("IRN-1", "VALID", "n1", ""));
        assert!(!verify_callback(
            SECRET,
            &canonical_string("IRN-1", "CANCELLED", "n1", ""),
            &signature
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_hex() {
        assert!(!verify_callback(SECRET, "IRN-1|VALID|n1|", "not-hex!"));
    }
}

//! Bearer role-claim consumption.
//!
//! GSTBooks does not provision identities or mint tokens; it only decodes
//! a caller-supplied bearer token and checks its role claim. Token issuance
//! is the identity provider's problem.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by an inbound bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (caller identity).
    pub sub: String,
    /// Primary role claim.
    #[serde(default)]
    pub role: Option<String>,
    /// Additional roles, when the issuer uses a list claim.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// Returns true if the token carries the given role, either as the
    /// primary `role` claim or in the `roles` list.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        if self.role.as_deref() == Some(role) {
            return true;
        }
        self.roles.iter().any(|r| r == role)
    }
}

/// Errors that can occur while consuming a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The `Authorization` header is missing or not a bearer scheme.
    #[error("missing or malformed Authorization header")]
    MalformedHeader,

    /// The token signature or shape is invalid.
    #[error("invalid token")]
    InvalidToken,

    /// The token has expired.
    #[error("token has expired")]
    Expired,

    /// The token lacks a required role.
    #[error("role '{0}' required")]
    RoleRequired(String),
}

/// Verifies a bearer token against the shared secret and returns its claims.
///
/// # Errors
///
/// Returns `AuthError::Expired` for expired tokens and
/// `AuthError::InvalidToken` for anything else the decoder rejects.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken,
        })
}

/// Extracts and verifies the claims from an `Authorization` header value.
///
/// # Errors
///
/// Returns `AuthError::MalformedHeader` when the value is not a bearer
/// scheme, plus any error from [`verify_token`].
pub fn claims_from_header(header: &str, secret: &str) -> Result<Claims, AuthError> {
    let (scheme, token) = header
        .split_once(char::is_whitespace)
        .ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    verify_token(token.trim(), secret)
}

/// Requires the claims to carry a role.
///
/// # Errors
///
/// Returns `AuthError::RoleRequired` when the role is absent.
pub fn require_role(claims: &Claims, role: &str) -> Result<(), AuthError> {
    if claims.has_role(role) {
        Ok(())
    } else {
        Err(AuthError::RoleRequired(role.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn make_token(role: Option<&str>, roles: &[&str], exp_offset_secs: i64) -> String {
        let claims = Claims {
            sub: "user-1".to_string(),
            role: role.map(String::from),
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_round_trip() {
        let token = make_token(Some("admin"), &[], 3600);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.has_role("admin"));
    }

    #[test]
    fn test_expired_token() {
        let token = make_token(Some("admin"), &[], -3600);
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = make_token(Some("admin"), &[], 3600);
        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_claims_from_header() {
        let token = make_token(Some("accountant"), &[], 3600);
        let header = format!("Bearer {token}");
        let claims = claims_from_header(&header, SECRET).unwrap();
        assert!(claims.has_role("accountant"));

        assert!(matches!(
            claims_from_header(&token, SECRET),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            claims_from_header(&format!("Basic {token}"), SECRET),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn test_role_from_list_claim() {
        let token = make_token(None, &["viewer", "admin"], 3600);
        let claims = verify_token(&token, SECRET).unwrap();
        assert!(require_role(&claims, "admin").is_ok());
        assert!(matches!(
            require_role(&claims, "superuser"),
            Err(AuthError::RoleRequired(_))
        ));
    }
}

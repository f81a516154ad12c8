//! Signed QR table tokens
//!
//! A QR token is an HS256 JWT binding a table id to the restaurant. Each
//! token carries a fresh `jti` and its own `iat`, so two issuances for the
//! same table never produce the same string.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validity window of a printed QR code
pub const QR_TOKEN_VALIDITY_DAYS: i64 = 30;

/// Claims embedded in a table QR token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrClaims {
    pub table_id: String,
    pub restaurant_id: String,
    /// Per-issuance nonce
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum QrTokenError {
    #[error("QR token expired")]
    Expired,

    #[error("QR token signature mismatch")]
    InvalidSignature,

    #[error("Malformed QR token: {0}")]
    Malformed(String),

    #[error("QR token signing failed: {0}")]
    Signing(String),
}

/// Signs and checks QR tokens with the configured secret
#[derive(Clone)]
pub struct QrTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    restaurant_id: String,
    validity: Duration,
}

impl std::fmt::Debug for QrTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrTokenSigner")
            .field("restaurant_id", &self.restaurant_id)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl QrTokenSigner {
    pub fn new(secret: &str, restaurant_id: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            restaurant_id: restaurant_id.into(),
            validity: Duration::days(QR_TOKEN_VALIDITY_DAYS),
        }
    }

    /// Mint a token for `table_id` valid from `issued_at` for the validity window
    pub fn sign(&self, table_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, QrTokenError> {
        let claims = QrClaims {
            table_id: table_id.to_string(),
            restaurant_id: self.restaurant_id.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| QrTokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry. Never touches storage.
    pub fn verify(&self, token: &str) -> Result<QrClaims, QrTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat"]);

        let data = decode::<QrClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => QrTokenError::Expired,
                ErrorKind::InvalidSignature => QrTokenError::InvalidSignature,
                _ => QrTokenError::Malformed(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> QrTokenSigner {
        QrTokenSigner::new("qr-test-secret", "demo-restaurant")
    }

    #[test]
    fn sign_then_verify_returns_claims() {
        let table_id = Uuid::new_v4();
        let now = Utc::now();
        let token = signer().sign(table_id, now).unwrap();

        let claims = signer().verify(&token).unwrap();
        assert_eq!(claims.table_id, table_id.to_string());
        assert_eq!(claims.restaurant_id, "demo-restaurant");
        assert_eq!(claims.exp - claims.iat, QR_TOKEN_VALIDITY_DAYS * 24 * 3600);
    }

    #[test]
    fn same_inputs_produce_distinct_tokens() {
        let table_id = Uuid::new_v4();
        let now = Utc::now();
        let a = signer().sign(table_id, now).unwrap();
        let b = signer().sign(table_id, now).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let foreign = QrTokenSigner::new("someone-else", "demo-restaurant");
        let token = foreign.sign(Uuid::new_v4(), Utc::now()).unwrap();
        assert!(matches!(
            signer().verify(&token),
            Err(QrTokenError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::days(QR_TOKEN_VALIDITY_DAYS + 1);
        let token = signer().sign(Uuid::new_v4(), issued).unwrap();
        assert!(matches!(signer().verify(&token), Err(QrTokenError::Expired)));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            signer().verify("not-a-jwt"),
            Err(QrTokenError::Malformed(_))
        ));
    }
}

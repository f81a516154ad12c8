//! Guest-side QR verification
//!
//! Checks run in a fixed order and stop at the first failure:
//! parameters, signature, table existence, stored-token match, table status.
//! The signature check never reads storage, so a forged token reveals
//! nothing about which tables exist.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::store::TableTokenStore;
use super::token::QrTokenSigner;
use crate::db::BoxError;

/// Reason a scan was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFailure {
    MissingParams,
    InvalidSignature,
    TableNotFound,
    TokenSuperseded,
    TableInactive,
}

impl VerifyFailure {
    /// Wire code returned to the guest app
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParams => "MISSING_PARAMS",
            Self::InvalidSignature => "TOKEN_INVALID_SIGNATURE",
            Self::TableNotFound => "TABLE_NOT_FOUND",
            Self::TokenSuperseded => "TOKEN_EXPIRED_OR_REGENERATED",
            Self::TableInactive => "TABLE_INACTIVE",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingParams => "Missing authentication parameters.",
            Self::InvalidSignature => "Invalid QR code signature.",
            Self::TableNotFound => "Table not found.",
            Self::TokenSuperseded => {
                "This QR code is no longer valid. Please ask staff for assistance."
            }
            Self::TableInactive => "This table is currently inactive.",
        }
    }

    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::MissingParams => StatusCode::BAD_REQUEST,
            Self::InvalidSignature | Self::TokenSuperseded => StatusCode::UNAUTHORIZED,
            Self::TableNotFound => StatusCode::NOT_FOUND,
            Self::TableInactive => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for VerifyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("QR scan rejected: {0}")]
    Rejected(VerifyFailure),

    #[error("token store error: {0}")]
    Store(BoxError),
}

impl From<VerifyFailure> for VerifyError {
    fn from(f: VerifyFailure) -> Self {
        VerifyError::Rejected(f)
    }
}

/// Public identity of a verified table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedTable {
    pub id: Uuid,
    pub number: String,
    pub name: String,
}

/// Read-only verifier. Repeated scans of a current token keep succeeding.
#[derive(Clone)]
pub struct TableVerifier {
    store: Arc<dyn TableTokenStore>,
    signer: Arc<QrTokenSigner>,
}

impl TableVerifier {
    pub fn new(store: Arc<dyn TableTokenStore>, signer: Arc<QrTokenSigner>) -> Self {
        Self { store, signer }
    }

    /// Empty strings count as missing
    pub async fn verify(
        &self,
        table_id: Option<&str>,
        token: Option<&str>,
    ) -> Result<VerifiedTable, VerifyError> {
        let (Some(table_id), Some(token)) = (
            table_id.filter(|s| !s.is_empty()),
            token.filter(|s| !s.is_empty()),
        ) else {
            return Err(VerifyFailure::MissingParams.into());
        };

        if let Err(e) = self.signer.verify(token) {
            tracing::debug!(error = %e, "QR token rejected");
            return Err(VerifyFailure::InvalidSignature.into());
        }

        let id = Uuid::parse_str(table_id).map_err(|_| VerifyFailure::TableNotFound)?;
        let table = self
            .store
            .find_table(id)
            .await
            .map_err(VerifyError::Store)?
            .ok_or(VerifyFailure::TableNotFound)?;

        if table.qr_token.as_deref() != Some(token) {
            return Err(VerifyFailure::TokenSuperseded.into());
        }

        if !table.status.is_active() {
            return Err(VerifyFailure::TableInactive.into());
        }

        Ok(VerifiedTable {
            id: table.id,
            name: shared::models::display_name(&table.table_number),
            number: table.table_number,
        })
    }
}

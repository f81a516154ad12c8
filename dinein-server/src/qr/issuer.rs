//! Token issuance and bulk regeneration

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;
use uuid::Uuid;

use super::store::TableTokenStore;
use super::token::{QrTokenError, QrTokenSigner};
use crate::db::BoxError;
use crate::error::ServiceError;

/// Tables re-issued concurrently during bulk regeneration
const REGENERATE_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub table_id: Uuid,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Outcome of a bulk regeneration. Each table is its own unit of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkRegeneration {
    pub regenerated: usize,
    pub failed: usize,
}

#[derive(Error, Debug)]
pub enum IssueError {
    #[error("table {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Signing(#[from] QrTokenError),

    #[error("token store error: {0}")]
    Store(BoxError),
}

impl From<IssueError> for ServiceError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::NotFound(_) => ServiceError::App(AppError::new(ErrorCode::TableNotFound)),
            IssueError::Signing(e) => ServiceError::Db(Box::new(e)),
            IssueError::Store(e) => ServiceError::Db(e),
        }
    }
}

/// Mints table tokens and writes them to the store
#[derive(Clone)]
pub struct TokenIssuer {
    store: Arc<dyn TableTokenStore>,
    signer: Arc<QrTokenSigner>,
}

impl TokenIssuer {
    pub fn new(store: Arc<dyn TableTokenStore>, signer: Arc<QrTokenSigner>) -> Self {
        Self { store, signer }
    }

    /// Issue a fresh token for one table, superseding any previous one
    pub async fn issue(&self, table_id: Uuid) -> Result<IssuedToken, IssueError> {
        let issued_at = Utc::now();
        let token = self.signer.sign(table_id, issued_at)?;

        let saved = self
            .store
            .save_token(table_id, &token, issued_at)
            .await
            .map_err(IssueError::Store)?;
        if !saved {
            return Err(IssueError::NotFound(table_id));
        }

        tracing::info!(table_id = %table_id, "QR token issued");
        Ok(IssuedToken {
            table_id,
            token,
            issued_at,
        })
    }

    /// Re-issue tokens for every active table
    ///
    /// Not atomic across tables: a failure on one table leaves the others
    /// updated and is only reflected in `failed`.
    pub async fn regenerate_all(&self) -> Result<BulkRegeneration, IssueError> {
        let ids = self
            .store
            .active_table_ids()
            .await
            .map_err(IssueError::Store)?;

        let outcomes: Vec<(Uuid, Result<IssuedToken, IssueError>)> = stream::iter(ids)
            .map(|id| async move { (id, self.issue(id).await) })
            .buffer_unordered(REGENERATE_CONCURRENCY)
            .collect()
            .await;

        let mut summary = BulkRegeneration::default();
        for (table_id, outcome) in outcomes {
            match outcome {
                Ok(_) => summary.regenerated += 1,
                Err(e) => {
                    tracing::warn!(table_id = %table_id, error = %e, "QR regeneration failed");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            regenerated = summary.regenerated,
            failed = summary.failed,
            "Bulk QR regeneration finished"
        );
        Ok(summary)
    }
}

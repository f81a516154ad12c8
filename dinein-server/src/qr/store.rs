//! Persisted QR token state
//!
//! Each table row holds exactly one current token and its issuance time.
//! Writing a new token overwrites the old one in place; no history is kept.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::ActiveStatus;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, BoxError};

/// Table fields the QR flow needs
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TableTokenState {
    pub id: Uuid,
    pub table_number: String,
    #[sqlx(try_from = "String")]
    pub status: ActiveStatus,
    pub qr_token: Option<String>,
}

#[async_trait]
pub trait TableTokenStore: Send + Sync {
    async fn find_table(&self, id: Uuid) -> Result<Option<TableTokenState>, BoxError>;

    /// Replace the stored token. Returns `false` when the table does not exist.
    async fn save_token(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, BoxError>;

    /// Ids of every table whose status is `active`
    async fn active_table_ids(&self) -> Result<Vec<Uuid>, BoxError>;
}

#[async_trait]
impl TableTokenStore for PgPool {
    async fn find_table(&self, id: Uuid) -> Result<Option<TableTokenState>, BoxError> {
        db::tables::find_token_state(self, id).await
    }

    async fn save_token(
        &self,
        id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, BoxError> {
        db::tables::save_qr_token(self, id, token, issued_at).await
    }

    async fn active_table_ids(&self) -> Result<Vec<Uuid>, BoxError> {
        db::tables::active_ids(self).await
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for exercising the QR lifecycle without PostgreSQL

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryTableStore {
        tables: Mutex<HashMap<Uuid, TableTokenState>>,
        failing: Mutex<HashSet<Uuid>>,
    }

    impl MemoryTableStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a table with no token, as the create endpoint does
        pub fn insert(&self, table_number: &str, status: ActiveStatus) -> Uuid {
            let id = Uuid::new_v4();
            self.tables.lock().unwrap().insert(
                id,
                TableTokenState {
                    id,
                    table_number: table_number.to_string(),
                    status,
                    qr_token: None,
                },
            );
            id
        }

        pub fn set_status(&self, id: Uuid, status: ActiveStatus) {
            if let Some(table) = self.tables.lock().unwrap().get_mut(&id) {
                table.status = status;
            }
        }

        pub fn token_of(&self, id: Uuid) -> Option<String> {
            self.tables
                .lock()
                .unwrap()
                .get(&id)
                .and_then(|t| t.qr_token.clone())
        }

        /// Make every future write for `id` fail
        pub fn fail_writes_for(&self, id: Uuid) {
            self.failing.lock().unwrap().insert(id);
        }
    }

    #[async_trait]
    impl TableTokenStore for MemoryTableStore {
        async fn find_table(&self, id: Uuid) -> Result<Option<TableTokenState>, BoxError> {
            Ok(self.tables.lock().unwrap().get(&id).cloned())
        }

        async fn save_token(
            &self,
            id: Uuid,
            token: &str,
            _issued_at: DateTime<Utc>,
        ) -> Result<bool, BoxError> {
            if self.failing.lock().unwrap().contains(&id) {
                return Err("simulated write failure".into());
            }
            match self.tables.lock().unwrap().get_mut(&id) {
                Some(table) => {
                    table.qr_token = Some(token.to_string());
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn active_table_ids(&self) -> Result<Vec<Uuid>, BoxError> {
            Ok(self
                .tables
                .lock()
                .unwrap()
                .values()
                .filter(|t| t.status.is_active())
                .map(|t| t.id)
                .collect())
        }
    }
}

//! Public guest endpoints

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::qr::{VerifiedTable, VerifyError, VerifyFailure};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/menu/verify", get(verify))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    pub table_id: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyOk {
    pub valid: bool,
    pub table: VerifiedTable,
}

#[derive(Debug, Serialize)]
pub struct VerifyRejected {
    pub valid: bool,
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for VerifyFailure {
    fn into_response(self) -> Response {
        let body = VerifyRejected {
            valid: false,
            code: self.code(),
            message: self.message(),
        };
        (self.http_status(), Json(body)).into_response()
    }
}

/// GET /api/menu/verify?tableId=&token=
pub async fn verify(State(state): State<AppState>, Query(query): Query<VerifyQuery>) -> Response {
    match state
        .verifier
        .verify(query.table_id.as_deref(), query.token.as_deref())
        .await
    {
        Ok(table) => Json(VerifyOk { valid: true, table }).into_response(),
        Err(VerifyError::Rejected(failure)) => {
            tracing::debug!(
                table_id = query.table_id.as_deref().unwrap_or(""),
                code = failure.code(),
                "QR scan rejected"
            );
            failure.into_response()
        }
        Err(VerifyError::Store(e)) => {
            tracing::error!(error = %e, "QR verification lookup failed");
            AppError::new(ErrorCode::InternalError).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use shared::models::ActiveStatus;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::qr::store::memory::MemoryTableStore;
    use crate::state::{AppState, testing};

    fn app(store: Arc<MemoryTableStore>) -> (AppState, axum::Router) {
        let dir = std::env::temp_dir().join("dinein-verify-tests");
        let state = testing::state(store, dir);
        (state.clone(), crate::api::create_router(state))
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn current_token_verifies_with_table_identity() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("7", ActiveStatus::Active);
        let (state, app) = app(store);
        let issued = state.issuer.issue(id).await.unwrap();

        let (status, body) = get_json(
            app,
            &format!("/api/menu/verify?tableId={id}&token={}", issued.token),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["table"]["number"], "7");
        assert_eq!(body["table"]["name"], "Table 7");
        assert_eq!(body["table"]["id"], id.to_string());
    }

    #[tokio::test]
    async fn missing_token_is_bad_request() {
        let (_, app) = app(Arc::new(MemoryTableStore::new()));
        let (status, body) = get_json(app, &format!("/api/menu/verify?tableId={}", Uuid::new_v4())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["valid"], false);
        assert_eq!(body["code"], "MISSING_PARAMS");
        assert_eq!(body["message"], "Missing authentication parameters.");
    }

    #[tokio::test]
    async fn regenerated_token_is_rejected() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("T1", ActiveStatus::Active);
        let (state, app) = app(store);
        let old = state.issuer.issue(id).await.unwrap();
        state.issuer.issue(id).await.unwrap();

        let (status, body) = get_json(
            app,
            &format!("/api/menu/verify?tableId={id}&token={}", old.token),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_EXPIRED_OR_REGENERATED");
    }

    #[tokio::test]
    async fn inactive_table_is_forbidden() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("T2", ActiveStatus::Active);
        let (state, app) = app(store.clone());
        let issued = state.issuer.issue(id).await.unwrap();
        store.set_status(id, ActiveStatus::Inactive);

        let (status, body) = get_json(
            app,
            &format!("/api/menu/verify?tableId={id}&token={}", issued.token),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TABLE_INACTIVE");
    }

    #[tokio::test]
    async fn forged_token_is_unauthorized() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("T3", ActiveStatus::Active);
        let (_, app) = app(store);

        let (status, body) =
            get_json(app, &format!("/api/menu/verify?tableId={id}&token=not.a.jwt")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_INVALID_SIGNATURE");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let (_, app) = app(Arc::new(MemoryTableStore::new()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}

//! Table QR code administration: issue, download, bulk regenerate

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ServiceResult;
use crate::qr::BulkRegeneration;
use crate::qr::render::{self, PNG_WIDTH, RenderError};
use crate::state::AppState;

use super::ApiResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/tables/qr/regenerate-all", post(regenerate_all))
        .route("/api/admin/tables/{id}/qr/generate", post(generate))
        .route("/api/admin/tables/{id}/qr/download", get(download))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQr {
    pub table_id: Uuid,
    pub url: String,
    pub qr_image_data_url: String,
    pub qr_token_created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

fn render_failed(e: RenderError) -> AppError {
    tracing::error!(error = %e, "QR rendering failed");
    AppError::new(ErrorCode::QrRenderFailed)
}

/// POST /api/admin/tables/{id}/qr/generate
///
/// Replaces the table's token; previously printed codes stop verifying.
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<GeneratedQr> {
    let issued = state.issuer.issue(id).await?;
    let url = render::menu_url(&state.client_base_url, issued.table_id, &issued.token);
    let qr_image_data_url = render::png_data_url(&url).map_err(render_failed)?;

    tracing::info!(table_id = %id, user_id = %user.id, "QR token issued");
    Ok(Json(GeneratedQr {
        table_id: issued.table_id,
        url,
        qr_image_data_url,
        qr_token_created_at: issued.issued_at,
    }))
}

/// GET /api/admin/tables/{id}/qr/download?format=png|pdf
///
/// Renders from the stored token; never issues a new one.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> ServiceResult<Response> {
    let format = query.format.unwrap_or_else(|| "png".to_string());
    if format != "png" && format != "pdf" {
        return Err(AppError::with_message(ErrorCode::InvalidFormat, "Invalid format")
            .with_detail("format", format)
            .into());
    }

    let table = state.tokens.find_table(id).await?;
    let Some((table, token)) = table.and_then(|t| {
        let token = t.qr_token.clone()?;
        Some((t, token))
    }) else {
        return Err(AppError::new(ErrorCode::QrTokenMissing).into());
    };

    let url = render::menu_url(&state.client_base_url, table.id, &token);
    let (bytes, content_type) = if format == "pdf" {
        let pdf = render::pdf_bytes(&table.table_number, &url).map_err(render_failed)?;
        (pdf, "application/pdf")
    } else {
        let png = render::png_bytes(&url, PNG_WIDTH).map_err(render_failed)?;
        (png, "image/png")
    };

    let disposition = format!(
        "attachment; filename=\"table-{}.{format}\"",
        table.table_number
    );
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/admin/tables/qr/regenerate-all
pub async fn regenerate_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<BulkRegeneration> {
    let outcome = state.issuer.regenerate_all().await?;
    tracing::info!(
        user_id = %user.id,
        regenerated = outcome.regenerated,
        failed = outcome.failed,
        "Bulk QR regeneration finished"
    );
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use shared::models::{ActiveStatus, User, UserRole};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::staff_auth::create_token;
    use crate::qr::store::memory::MemoryTableStore;
    use crate::state::testing;

    fn app(store: Arc<MemoryTableStore>) -> (axum::Router, String) {
        let dir = std::env::temp_dir().join("dinein-qr-tests");
        let state = testing::state(store, dir);
        let admin = User {
            id: Uuid::new_v4(),
            email: "admin@example.test".into(),
            password_hash: String::new(),
            role: UserRole::Admin,
            status: ActiveStatus::Active,
            created_at: Utc::now(),
        };
        let bearer = format!("Bearer {}", create_token(&admin, &state.jwt_secret).unwrap());
        (crate::api::create_router(state), bearer)
    }

    fn request(method: Method, uri: &str, bearer: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, bearer)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn download_renders_stored_token_without_reissuing() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("12", ActiveStatus::Active);
        let (app, bearer) = app(store.clone());

        let generated = app
            .clone()
            .oneshot(request(
                Method::POST,
                &format!("/api/admin/tables/{id}/qr/generate"),
                &bearer,
            ))
            .await
            .unwrap();
        assert_eq!(generated.status(), StatusCode::OK);
        let body = generated.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        let issued = store.token_of(id).unwrap();
        assert!(body["url"].as_str().unwrap().ends_with(&issued));

        for format in ["png", "pdf"] {
            let response = app
                .clone()
                .oneshot(request(
                    Method::GET,
                    &format!("/api/admin/tables/{id}/qr/download?format={format}"),
                    &bearer,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                format!("attachment; filename=\"table-12.{format}\"").as_str()
            );
            assert_eq!(store.token_of(id).as_deref(), Some(issued.as_str()));
        }
    }

    #[tokio::test]
    async fn download_without_token_is_not_found() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("3", ActiveStatus::Active);
        let (app, bearer) = app(store.clone());

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/admin/tables/{id}/qr/download"),
                &bearer,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.token_of(id), None);
    }

    #[tokio::test]
    async fn unknown_format_is_rejected() {
        let store = Arc::new(MemoryTableStore::new());
        let id = store.insert("4", ActiveStatus::Active);
        let (app, bearer) = app(store);

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/admin/tables/{id}/qr/download?format=svg"),
                &bearer,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], ErrorCode::InvalidFormat.code());
    }
}

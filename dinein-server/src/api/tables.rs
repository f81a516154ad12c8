//! Dining table administration

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{ActiveStatus, DiningTable, TableFields, TablePayload, TableSort, TableStatusUpdate};
use uuid::Uuid;

use crate::db::{self, BoxError};
use crate::error::{ServiceError, ServiceResult, invalid};
use crate::state::AppState;

use super::{ApiResult, Message};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/tables", get(list_tables).post(create_table))
        .route(
            "/api/admin/tables/{id}",
            get(get_table).put(update_table).delete(delete_table),
        )
        .route("/api/admin/tables/{id}/status", patch(set_table_status))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListQuery {
    pub status: Option<String>,
    pub location: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

fn table_not_found() -> ServiceError {
    AppError::new(ErrorCode::TableNotFound).into()
}

/// Unique-index races surface as the same conflict as the pre-check
fn number_conflict(e: BoxError) -> ServiceError {
    if db::is_unique_violation(&e) {
        AppError::new(ErrorCode::TableNumberExists).into()
    } else {
        ServiceError::Db(e)
    }
}

async fn ensure_number_free(
    state: &AppState,
    fields: &TableFields,
    exclude: Option<Uuid>,
) -> ServiceResult<()> {
    if db::tables::number_taken(&state.pool, &fields.table_number, exclude).await? {
        return Err(AppError::new(ErrorCode::TableNumberExists).into());
    }
    Ok(())
}

/// GET /api/admin/tables
pub async fn list_tables(
    State(state): State<AppState>,
    Query(query): Query<TableListQuery>,
) -> ApiResult<Vec<DiningTable>> {
    let sort = TableSort::parse(query.sort_by.as_deref());
    let ascending = query.sort_order.as_deref() == Some("asc");
    let tables = db::tables::list(
        &state.pool,
        query.status.as_deref().filter(|s| !s.is_empty()),
        query.location.as_deref().filter(|s| !s.is_empty()),
        sort,
        ascending,
    )
    .await?;
    Ok(Json(tables))
}

/// GET /api/admin/tables/{id}
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DiningTable> {
    let table = db::tables::find(&state.pool, id)
        .await?
        .ok_or_else(table_not_found)?;
    Ok(Json(table))
}

/// POST /api/admin/tables
pub async fn create_table(
    State(state): State<AppState>,
    Json(payload): Json<TablePayload>,
) -> ServiceResult<(StatusCode, Json<DiningTable>)> {
    let fields = payload.validate()?;
    ensure_number_free(&state, &fields, None).await?;

    let table = db::tables::create(&state.pool, &fields)
        .await
        .map_err(number_conflict)?;

    tracing::info!(table_id = %table.id, table_number = %table.table_number, "Table created");
    Ok((StatusCode::CREATED, Json(table)))
}

/// PUT /api/admin/tables/{id}
pub async fn update_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TablePayload>,
) -> ApiResult<DiningTable> {
    let fields = payload.validate()?;
    ensure_number_free(&state, &fields, Some(id)).await?;

    let table = db::tables::update(&state.pool, id, &fields)
        .await
        .map_err(number_conflict)?
        .ok_or_else(table_not_found)?;
    Ok(Json(table))
}

/// PATCH /api/admin/tables/{id}/status
///
/// Deactivating a table makes guest scans fail with `TABLE_INACTIVE` while
/// keeping its token; reactivating restores the same code.
pub async fn set_table_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TableStatusUpdate>,
) -> ApiResult<DiningTable> {
    let status = ActiveStatus::parse(&req.status).ok_or_else(|| invalid("Invalid status"))?;
    let table = db::tables::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(table_not_found)?;

    tracing::info!(table_id = %id, status = %status, "Table status changed");
    Ok(Json(table))
}

/// DELETE /api/admin/tables/{id}
pub async fn delete_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    if !db::tables::delete(&state.pool, id).await? {
        return Err(table_not_found());
    }
    tracing::info!(table_id = %id, "Table deleted");
    Ok(Message::new("Table deleted successfully"))
}

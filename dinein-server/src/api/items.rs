//! Menu item administration

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ItemListQuery, ItemPage, ItemSort, ItemStatus, ItemStatusUpdate, MenuItem, MenuItemPayload,
    Pagination,
};
use uuid::Uuid;

use crate::db::{self, items::ItemFilter};
use crate::error::{ServiceError, ServiceResult, invalid};
use crate::state::AppState;

use super::{ApiResult, Message};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/menu/items", get(list_items).post(create_item))
        .route(
            "/api/admin/menu/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/admin/menu/items/{id}/status", patch(set_item_status))
}

pub(crate) fn item_not_found() -> ServiceError {
    AppError::new(ErrorCode::MenuItemNotFound).into()
}

async fn ensure_category(state: &AppState, category_id: Uuid) -> ServiceResult<()> {
    if !db::categories::exists(&state.pool, category_id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }
    Ok(())
}

/// GET /api/admin/menu/items
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> ApiResult<ItemPage> {
    let (page, limit) = query.page_window();
    let search = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let filter = ItemFilter {
        category_id: query.category_id,
        search,
        status: query.status.as_deref().filter(|s| !s.is_empty()),
    };

    let (data, total) = db::items::list(
        &state.pool,
        &filter,
        ItemSort::parse(query.sort_by.as_deref()),
        query.ascending(),
        limit,
        (page - 1) * limit,
    )
    .await?;

    Ok(Json(ItemPage {
        data,
        pagination: Pagination { total, page, limit },
    }))
}

/// GET /api/admin/menu/items/{id}
pub async fn get_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<MenuItem> {
    let item = db::items::find(&state.pool, id)
        .await?
        .ok_or_else(item_not_found)?;
    Ok(Json(item))
}

/// POST /api/admin/menu/items
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<MenuItemPayload>,
) -> ServiceResult<(StatusCode, Json<MenuItem>)> {
    let new_item = payload.validate_new()?;
    ensure_category(&state, new_item.category_id).await?;

    let item = db::items::create(&state.pool, &new_item).await?;
    tracing::info!(item_id = %item.id, name = %item.name, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/admin/menu/items/{id}
///
/// Absent fields keep their stored value.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MenuItemPayload>,
) -> ApiResult<MenuItem> {
    let payload = payload.validate_update()?;
    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id).await?;
    }

    let item = db::items::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(item_not_found)?;
    Ok(Json(item))
}

/// PATCH /api/admin/menu/items/{id}/status
pub async fn set_item_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ItemStatusUpdate>,
) -> ApiResult<MenuItem> {
    let status = ItemStatus::parse(&req.status)
        .filter(|s| *s != ItemStatus::Hidden)
        .ok_or_else(|| invalid("Invalid status"))?;
    let item = db::items::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(item_not_found)?;
    Ok(Json(item))
}

/// DELETE /api/admin/menu/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    if !db::items::soft_delete(&state.pool, id).await? {
        return Err(item_not_found());
    }
    tracing::info!(item_id = %id, "Menu item deleted");
    Ok(Message::new("Item deleted successfully"))
}

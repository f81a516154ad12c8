//! Menu category administration

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, put},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{ActiveStatus, CategoryFields, CategoryPayload, MenuCategory};
use uuid::Uuid;

use crate::db::{self, BoxError};
use crate::error::{ServiceError, ServiceResult, invalid};
use crate::state::AppState;

use super::{ApiResult, Message};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/menu/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/admin/menu/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route(
            "/api/admin/menu/categories/{id}/status",
            patch(set_category_status),
        )
}

#[derive(Debug, Deserialize)]
pub struct CategoryStatusUpdate {
    pub status: String,
}

fn category_not_found() -> ServiceError {
    AppError::new(ErrorCode::CategoryNotFound).into()
}

fn name_conflict(e: BoxError) -> ServiceError {
    if db::is_unique_violation(&e) {
        AppError::new(ErrorCode::CategoryNameExists).into()
    } else {
        ServiceError::Db(e)
    }
}

async fn ensure_name_free(
    state: &AppState,
    fields: &CategoryFields,
    exclude: Option<Uuid>,
) -> ServiceResult<()> {
    if db::categories::name_taken(&state.pool, &fields.name, exclude).await? {
        return Err(AppError::new(ErrorCode::CategoryNameExists).into());
    }
    Ok(())
}

/// GET /api/admin/menu/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<MenuCategory>> {
    let categories = db::categories::list(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /api/admin/menu/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> ServiceResult<(StatusCode, Json<MenuCategory>)> {
    let fields = payload.validate()?;
    ensure_name_free(&state, &fields, None).await?;

    let category = db::categories::create(&state.pool, &fields)
        .await
        .map_err(name_conflict)?;

    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/admin/menu/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> ApiResult<MenuCategory> {
    let fields = payload.validate()?;
    ensure_name_free(&state, &fields, Some(id)).await?;

    let category = db::categories::update(&state.pool, id, &fields)
        .await
        .map_err(name_conflict)?
        .ok_or_else(category_not_found)?;
    Ok(Json(category))
}

/// PATCH /api/admin/menu/categories/{id}/status
pub async fn set_category_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryStatusUpdate>,
) -> ApiResult<MenuCategory> {
    let status = ActiveStatus::parse(&req.status)
        .ok_or_else(|| invalid("Status must be active or inactive"))?;
    let category = db::categories::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(category_not_found)?;
    Ok(Json(category))
}

/// DELETE /api/admin/menu/categories/{id}
///
/// Soft delete; the name becomes available again.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Message> {
    if !db::categories::soft_delete(&state.pool, id).await? {
        return Err(category_not_found());
    }
    tracing::info!(category_id = %id, "Category deleted");
    Ok(Message::new("Category deleted successfully"))
}

//! Modifier groups, options and item links

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AttachGroups, ModifierGroup, ModifierGroupPayload, ModifierGroupWithOptions, ModifierOption,
    ModifierOptionPayload,
};
use uuid::Uuid;

use crate::db::{self, modifiers::ReplaceLinks};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

use super::ApiResult;
use super::items::item_not_found;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/menu/modifier-groups",
            get(list_groups).post(create_group),
        )
        .route(
            "/api/admin/menu/modifier-groups/{id}",
            put(update_group).delete(delete_group),
        )
        .route(
            "/api/admin/menu/modifier-groups/{id}/options",
            post(create_option),
        )
        .route(
            "/api/admin/menu/modifier-options/{id}",
            put(update_option).delete(delete_option),
        )
        .route(
            "/api/admin/menu/items/{id}/modifier-groups",
            post(attach_groups),
        )
}

fn group_not_found() -> ServiceError {
    AppError::new(ErrorCode::ModifierGroupNotFound).into()
}

fn option_not_found() -> ServiceError {
    AppError::new(ErrorCode::ModifierOptionNotFound).into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedGroup {
    pub message: &'static str,
    pub deleted_group: ModifierGroup,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedOption {
    pub message: &'static str,
    pub deleted_option: ModifierOption,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedGroups {
    pub message: &'static str,
    pub group_ids: Vec<Uuid>,
}

// ── Groups ──

/// GET /api/admin/menu/modifier-groups
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Vec<ModifierGroupWithOptions>> {
    let groups = db::modifiers::list_groups(&state.pool).await?;
    Ok(Json(groups))
}

/// POST /api/admin/menu/modifier-groups
pub async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<ModifierGroupPayload>,
) -> ServiceResult<(StatusCode, Json<ModifierGroup>)> {
    let fields = payload.validate()?;
    let group = db::modifiers::create_group(&state.pool, &fields).await?;
    tracing::info!(group_id = %group.id, name = %group.name, "Modifier group created");
    Ok((StatusCode::CREATED, Json(group)))
}

/// PUT /api/admin/menu/modifier-groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModifierGroupPayload>,
) -> ApiResult<ModifierGroup> {
    let fields = payload.validate()?;
    let group = db::modifiers::update_group(&state.pool, id, &fields)
        .await?
        .ok_or_else(group_not_found)?;
    Ok(Json(group))
}

/// DELETE /api/admin/menu/modifier-groups/{id}
///
/// Options and item links go with the group (ON DELETE CASCADE).
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DeletedGroup> {
    let group = db::modifiers::delete_group(&state.pool, id)
        .await?
        .ok_or_else(group_not_found)?;
    tracing::info!(group_id = %id, "Modifier group deleted");
    Ok(Json(DeletedGroup {
        message: "Group deleted successfully",
        deleted_group: group,
    }))
}

// ── Options ──

/// POST /api/admin/menu/modifier-groups/{id}/options
pub async fn create_option(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<ModifierOptionPayload>,
) -> ServiceResult<(StatusCode, Json<ModifierOption>)> {
    let fields = payload.validate()?;
    if !db::modifiers::group_exists(&state.pool, group_id).await? {
        return Err(group_not_found());
    }
    let option = db::modifiers::create_option(&state.pool, group_id, &fields).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

/// PUT /api/admin/menu/modifier-options/{id}
pub async fn update_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModifierOptionPayload>,
) -> ApiResult<ModifierOption> {
    let fields = payload.validate()?;
    let option = db::modifiers::update_option(&state.pool, id, &fields)
        .await?
        .ok_or_else(option_not_found)?;
    Ok(Json(option))
}

/// DELETE /api/admin/menu/modifier-options/{id}
pub async fn delete_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DeletedOption> {
    let option = db::modifiers::delete_option(&state.pool, id)
        .await?
        .ok_or_else(option_not_found)?;
    Ok(Json(DeletedOption {
        message: "Option deleted successfully",
        deleted_option: option,
    }))
}

// ── Item links ──

/// First occurrence wins; later duplicates would collide on the link key
fn dedup_preserving_order(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// POST /api/admin/menu/items/{id}/modifier-groups
///
/// Replaces the item's whole group set; list order becomes display order.
pub async fn attach_groups(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(req): Json<AttachGroups>,
) -> ApiResult<AttachedGroups> {
    if !db::items::exists(&state.pool, item_id).await? {
        return Err(item_not_found());
    }

    let group_ids = dedup_preserving_order(req.group_ids);
    match db::modifiers::replace_item_groups(&state.pool, item_id, &group_ids).await? {
        ReplaceLinks::Replaced => {}
        ReplaceLinks::UnknownGroup => return Err(group_not_found()),
    }

    let group_ids = db::modifiers::item_group_ids(&state.pool, item_id).await?;
    tracing::info!(item_id = %item_id, groups = group_ids.len(), "Item modifier groups replaced");
    Ok(Json(AttachedGroups {
        message: "Modifiers updated for menu item successfully",
        group_ids,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_group_ids_keep_first_position() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(dedup_preserving_order(vec![b, a, b, c, a]), vec![b, a, c]);
        assert!(dedup_preserving_order(Vec::new()).is_empty());
    }
}

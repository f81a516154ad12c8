//! Menu item photos
//!
//! Uploads are validated, decoded, re-encoded as JPEG and stored under the
//! upload directory under a fresh `{uuid}.jpg` name, one file per photo row.
//! Stored files are served publicly from `/uploads/{file}`.

use std::io::Cursor;
use std::path::Path as FsPath;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use image::codecs::jpeg::JpegEncoder;
use shared::error::{AppError, ErrorCode};
use shared::models::{ItemPhoto, PhotoUrls};
use uuid::Uuid;

use crate::db;
use crate::error::{ServiceError, ServiceResult, invalid};
use crate::state::AppState;

use super::Message;
use super::items::item_not_found;

/// Maximum size of one uploaded file (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum files per upload request
const MAX_FILES: usize = 5;

const SUPPORTED_FORMATS: &[&str] = &["jpg", "jpeg", "png", "webp"];

const JPEG_QUALITY: u8 = 85;

/// Multipart field carrying the files
const UPLOAD_FIELD: &str = "photos";

/// Public URL prefix of stored files
const UPLOADS_PREFIX: &str = "/uploads/";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/menu/items/{id}/photos",
            post(upload_photos).layer(DefaultBodyLimit::max(MAX_FILES * MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route(
            "/api/admin/menu/items/{id}/photos/from-url",
            post(add_photo_urls),
        )
        .route(
            "/api/admin/menu/items/{id}/photos/{photo_id}",
            delete(delete_photo),
        )
        .route(
            "/api/admin/menu/items/{id}/photos/{photo_id}/primary",
            patch(set_primary_photo),
        )
}

pub fn uploads_router() -> Router<AppState> {
    Router::new().route("/uploads/{file}", get(serve_upload))
}

// ── Image processing ──

fn extension_of(filename: &str) -> Option<String> {
    FsPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Validate one upload and re-encode it as JPEG
fn compress_upload(filename: &str, data: &[u8]) -> Result<Vec<u8>, AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large (max {}MB)", MAX_FILE_SIZE / 1024 / 1024),
        )
        .with_detail("file", filename));
    }

    let ext = extension_of(filename).unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat).with_detail("file", filename));
    }

    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
            .with_detail("file", filename)
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
            tracing::error!(file = filename, error = %e, "JPEG compression failed");
            AppError::new(ErrorCode::FileStorageFailed)
        })?;
    }
    Ok(buffer)
}

/// Write `data` under a new unique name
async fn store_file(dir: &FsPath, data: &[u8]) -> Result<String, AppError> {
    let name = format!("{}.jpg", Uuid::new_v4());
    let path = dir.join(&name);
    tokio::fs::write(&path, data).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to store upload");
        AppError::new(ErrorCode::FileStorageFailed)
    })?;
    Ok(name)
}

/// Plain file name without separators or parent references
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}

/// Delete the local file behind an `/uploads/...` URL; other URLs are left alone
async fn remove_upload(dir: &FsPath, url: &str) {
    let Some(name) = url.strip_prefix(UPLOADS_PREFIX).filter(|n| is_safe_name(n)) else {
        return;
    };
    match tokio::fs::remove_file(dir.join(name)).await {
        Ok(()) => tracing::debug!(file = name, "Upload removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(file = name, error = %e, "Failed to remove upload"),
    }
}

async fn ensure_item(state: &AppState, item_id: Uuid) -> ServiceResult<()> {
    if !db::items::exists(&state.pool, item_id).await? {
        return Err(item_not_found());
    }
    Ok(())
}

fn photo_not_found() -> ServiceError {
    AppError::new(ErrorCode::PhotoNotFound).into()
}

// ── Handlers ──

/// POST /api/admin/menu/items/{id}/photos (multipart field `photos`)
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ServiceResult<(StatusCode, Json<Message<Vec<ItemPhoto>>>)> {
    let mut files: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if files.len() == MAX_FILES {
            return Err(AppError::with_message(
                ErrorCode::TooManyFiles,
                format!("At most {MAX_FILES} photos per upload"),
            )
            .into());
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
        })?;
        files.push((filename, data));
    }

    if files.is_empty() {
        return Err(AppError::new(ErrorCode::NoFileProvided).into());
    }
    ensure_item(&state, item_id).await?;

    let mut compressed = Vec::with_capacity(files.len());
    for (filename, data) in &files {
        compressed.push(compress_upload(filename, data)?);
    }

    let mut urls = Vec::with_capacity(compressed.len());
    for data in &compressed {
        let name = store_file(&state.upload_dir, data).await?;
        urls.push(format!("{UPLOADS_PREFIX}{name}"));
    }

    let photos = db::photos::insert_many(&state.pool, item_id, &urls).await?;
    tracing::info!(item_id = %item_id, count = photos.len(), "Photos uploaded");
    Ok((
        StatusCode::CREATED,
        Message::with_data("Upload successful", photos),
    ))
}

/// POST /api/admin/menu/items/{id}/photos/from-url
pub async fn add_photo_urls(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(req): Json<PhotoUrls>,
) -> ServiceResult<(StatusCode, Json<Message<Vec<ItemPhoto>>>)> {
    let urls: Vec<String> = req
        .urls
        .unwrap_or_default()
        .into_iter()
        .filter_map(|u| shared::util::non_blank(Some(u)))
        .collect();
    if urls.is_empty() {
        return Err(invalid("Please provide photo URLs"));
    }
    ensure_item(&state, item_id).await?;

    let photos = db::photos::insert_many(&state.pool, item_id, &urls).await?;
    Ok((
        StatusCode::CREATED,
        Message::with_data("Photos saved successfully", photos),
    ))
}

/// DELETE /api/admin/menu/items/{id}/photos/{photo_id}
pub async fn delete_photo(
    State(state): State<AppState>,
    Path((item_id, photo_id)): Path<(Uuid, Uuid)>,
) -> ServiceResult<Json<Message>> {
    let photo = db::photos::find_for_item(&state.pool, item_id, photo_id)
        .await?
        .ok_or_else(photo_not_found)?;

    db::photos::delete(&state.pool, photo.id).await?;
    remove_upload(&state.upload_dir, &photo.photo_url).await;

    tracing::info!(item_id = %item_id, photo_id = %photo_id, "Photo deleted");
    Ok(Message::new("Photo deleted successfully"))
}

/// PATCH /api/admin/menu/items/{id}/photos/{photo_id}/primary
pub async fn set_primary_photo(
    State(state): State<AppState>,
    Path((item_id, photo_id)): Path<(Uuid, Uuid)>,
) -> ServiceResult<Json<Message>> {
    if !db::photos::set_primary(&state.pool, item_id, photo_id).await? {
        return Err(photo_not_found());
    }
    Ok(Message::new("Primary photo updated successfully"))
}

fn content_type_of(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// GET /uploads/{file}
pub async fn serve_upload(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    if !is_safe_name(&file) {
        tracing::warn!(file = %file, "Rejected upload path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    match tokio::fs::read(state.upload_dir.join(&file)).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_of(&file))],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

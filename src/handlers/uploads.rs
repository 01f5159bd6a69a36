//! File upload and storage handlers

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use super::extract::{AppPath, AppQuery};
use crate::middleware::AdminUser;
use crate::models::{StorageListQuery, StoredFile};
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::optional_field;
use crate::utils::logging::log_admin_action;

/// Folder for customer cake reference photos
pub const REFERENCE_IMAGE_FOLDER: &str = "cake-references";

/// One file read from a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Read the `file` part and an optional `folder` text part
pub async fn read_upload(mut multipart: Multipart) -> Result<(UploadedFile, Option<String>)> {
    let mut file = None;
    let mut folder = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?.to_vec();
                debug!(filename = %filename, content_type = %content_type, size = bytes.len(), "Multipart file read");
                file = Some(UploadedFile { bytes, filename, content_type });
            }
            Some("folder") => folder = optional_field(Some(field.text().await?)),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| BakeshopError::InvalidInput("Multipart field `file` is required".to_string()))?;
    if file.bytes.is_empty() {
        return Err(BakeshopError::InvalidInput("Uploaded file is empty".to_string()));
    }

    Ok((file, folder))
}

/// Handle `POST /api/uploads/reference-image`
pub async fn upload_reference_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>)> {
    let (file, _) = read_upload(multipart).await?;
    if !file.content_type.starts_with("image/") {
        return Err(BakeshopError::InvalidInput("Reference uploads must be images".to_string()));
    }

    let stored = state
        .services
        .storage_service
        .upload(file.bytes, &file.filename, &file.content_type, Some(REFERENCE_IMAGE_FOLDER))
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Handle `POST /api/admin/uploads`
pub async fn upload_file(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>)> {
    let (file, folder) = read_upload(multipart).await?;

    let stored = state
        .services
        .storage_service
        .upload(file.bytes, &file.filename, &file.content_type, folder.as_deref())
        .await?;

    log_admin_action(admin.id(), "upload_file", Some(&stored.storage_id), Some(&stored.url));
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Handle `GET /api/admin/storage[?folder=]`
pub async fn list_files(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<StorageListQuery>,
) -> Result<Json<Value>> {
    let folder = optional_field(query.folder);
    let folder = folder
        .as_deref()
        .unwrap_or(state.services.storage_service.default_folder())
        .to_string();
    let files = state.services.storage_service.list(Some(&folder)).await?;

    Ok(Json(json!({ "folder": folder, "files": files })))
}

/// Handle `DELETE /api/admin/storage/:storage_id`
pub async fn delete_file(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(storage_id): AppPath<String>,
) -> Result<StatusCode> {
    state.services.storage_service.delete(&storage_id).await?;

    log_admin_action(admin.id(), "delete_file", Some(&storage_id), None);
    Ok(StatusCode::NO_CONTENT)
}

//! Gallery handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::warn;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::AdminUser;
use crate::models::{CreateGalleryItemRequest, GalleryFilter, GalleryItem, UpdateGalleryItemRequest};
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::{optional_field, require_field};
use crate::utils::logging::log_admin_action;

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Handle `GET /api/gallery[?category=]`
pub async fn list_items(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<GalleryFilter>,
) -> Result<Json<Vec<GalleryItem>>> {
    let category = optional_field(filter.category);
    let items = state.db.gallery.list(category.as_deref()).await?;
    Ok(Json(items))
}

/// Handle `GET /api/gallery/:id`
pub async fn get_item(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> Result<Json<GalleryItem>> {
    let item = state
        .db
        .gallery
        .find_by_id(id)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Gallery item", id))?;
    Ok(Json(item))
}

/// Handle `POST /api/admin/gallery`
pub async fn create_item(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(request): AppJson<CreateGalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItem>)> {
    let request = CreateGalleryItemRequest {
        title: require_field("title", &request.title)?,
        description: optional_field(request.description),
        image_url: require_field("image_url", &request.image_url)?,
        storage_id: optional_field(request.storage_id),
        category: optional_field(request.category),
        tags: clean_tags(request.tags),
        is_featured: request.is_featured,
    };

    let item = state.db.gallery.create(request).await?;
    log_admin_action(admin.id(), "create_gallery_item", Some(&item.id.to_string()), Some(&item.title));
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handle `PUT /api/admin/gallery/:id`
pub async fn update_item(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateGalleryItemRequest>,
) -> Result<Json<GalleryItem>> {
    let request = UpdateGalleryItemRequest {
        tags: request.tags.map(clean_tags),
        ..request
    };

    let item = state
        .db
        .gallery
        .update(id, request)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Gallery item", id))?;

    log_admin_action(admin.id(), "update_gallery_item", Some(&id.to_string()), None);
    Ok(Json(item))
}

/// Handle `DELETE /api/admin/gallery/:id`
///
/// The hosted image is removed as well; a storage failure leaves the file
/// orphaned but does not fail the request.
pub async fn delete_item(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    let item = state
        .db
        .gallery
        .delete(id)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Gallery item", id))?;

    if let Some(storage_id) = item.storage_id.as_deref() {
        if let Err(e) = state.services.storage_service.delete(storage_id).await {
            warn!(storage_id = %storage_id, error = %e, "Failed to delete gallery image from storage");
        }
    }

    log_admin_action(admin.id(), "delete_gallery_item", Some(&id.to_string()), None);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_tags() {
        let tags = clean_tags(vec![" Wedding ".into(), "".into(), "CHOCOLATE".into()]);
        assert_eq!(tags, vec!["wedding".to_string(), "chocolate".to_string()]);
    }
}

//! Gallery repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::gallery::{GalleryItem, CreateGalleryItemRequest, UpdateGalleryItemRequest};
use crate::utils::errors::BakeshopError;

#[derive(Clone)]
pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new gallery item
    pub async fn create(&self, request: CreateGalleryItemRequest) -> Result<GalleryItem, BakeshopError> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            INSERT INTO gallery_items (title, description, image_url, storage_id, category, tags, is_featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, title, description, image_url, storage_id, category, tags, is_featured, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.image_url)
        .bind(request.storage_id)
        .bind(request.category)
        .bind(request.tags)
        .bind(request.is_featured)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Find gallery item by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<GalleryItem>, BakeshopError> {
        let item = sqlx::query_as::<_, GalleryItem>(
            "SELECT id, title, description, image_url, storage_id, category, tags, is_featured, created_at, updated_at FROM gallery_items WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// List items, featured first, optionally by category
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<GalleryItem>, BakeshopError> {
        let items = sqlx::query_as::<_, GalleryItem>(
            r#"
            SELECT id, title, description, image_url, storage_id, category, tags, is_featured, created_at, updated_at
            FROM gallery_items
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY is_featured DESC, created_at DESC
            "#
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Update gallery item
    pub async fn update(&self, id: i64, request: UpdateGalleryItemRequest) -> Result<Option<GalleryItem>, BakeshopError> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            UPDATE gallery_items
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                storage_id = COALESCE($5, storage_id),
                category = COALESCE($6, category),
                tags = COALESCE($7, tags),
                is_featured = COALESCE($8, is_featured),
                updated_at = $9
            WHERE id = $1
            RETURNING id, title, description, image_url, storage_id, category, tags, is_featured, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.image_url)
        .bind(request.storage_id)
        .bind(request.category)
        .bind(request.tags)
        .bind(request.is_featured)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Delete gallery item, returning it so its stored file can be removed
    pub async fn delete(&self, id: i64) -> Result<Option<GalleryItem>, BakeshopError> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            DELETE FROM gallery_items WHERE id = $1
            RETURNING id, title, description, image_url, storage_id, category, tags, is_featured, created_at, updated_at
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }
}

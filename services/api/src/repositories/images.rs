//! Image repository
//!
//! Images carry the name of their category next to `category_id` so public
//! listings can filter by name without a join. Every write that touches
//! `category_id` refreshes the name in the same statement.

use anyhow::Result;
use common::models::{Image, ImageMetadata, ImageQuery, UpdateImage};
use sqlx::PgPool;

use super::Page;

const COLUMNS: &str = "id, title, description, filename, file_path, file_size, mime_type, \
                       category, tags, is_featured, is_public, is_hero_image, \
                       is_profile_picture, is_thumbnail, category_id, owner_id, \
                       created_at, updated_at";

/// A stored upload ready to be recorded
#[derive(Debug, Clone)]
pub struct NewImageRecord {
    pub metadata: ImageMetadata,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub owner_id: i64,
}

#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public images, newest first
    pub async fn list_public(&self, query: &ImageQuery) -> Result<Vec<Image>> {
        let page = Page::new(query.skip, query.limit);
        let images = sqlx::query_as::<_, Image>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM images
            WHERE is_public
              AND ($1::TEXT IS NULL OR category = $1)
              AND ($2::BOOLEAN IS NULL OR is_featured = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#
        ))
        .bind(&query.category)
        .bind(query.is_featured)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    /// Every image uploaded by `owner_id`, public or not
    pub async fn list_by_owner(&self, owner_id: i64, page: Page) -> Result<Vec<Image>> {
        let images = sqlx::query_as::<_, Image>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM images
            WHERE owner_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(owner_id)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Image>> {
        let image =
            sqlx::query_as::<_, Image>(&format!("SELECT {COLUMNS} FROM images WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(image)
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM images WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, record: &NewImageRecord) -> Result<Image> {
        let metadata = &record.metadata;
        let category_id = metadata.category_id.filter(|_| !metadata.is_profile_picture);

        let image = sqlx::query_as::<_, Image>(&format!(
            r#"
            INSERT INTO images (
                title, description, filename, file_path, file_size, mime_type,
                category, tags, is_featured, is_public, is_hero_image,
                is_profile_picture, is_thumbnail, category_id, owner_id
            )
            VALUES (
                $1, $2, $3, $4, $5, $6,
                (SELECT name FROM categories WHERE id = $12), $7, $8, $9, $10,
                $11, $13, $12, $14
            )
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&metadata.title)
        .bind(&metadata.description)
        .bind(&record.filename)
        .bind(&record.file_path)
        .bind(record.file_size)
        .bind(&record.mime_type)
        .bind(&metadata.tags)
        .bind(metadata.is_featured)
        .bind(metadata.is_public)
        .bind(metadata.is_hero_image)
        .bind(metadata.is_profile_picture)
        .bind(category_id)
        .bind(metadata.is_thumbnail)
        .bind(record.owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(image)
    }

    /// Apply the present fields of `changes`
    ///
    /// `category_id: Some(None)` detaches the image from its category.
    pub async fn update(&self, id: i64, changes: &UpdateImage) -> Result<Option<Image>> {
        let (set_category, category_id) = match changes.category_id {
            Some(category_id) => (true, category_id),
            None => (false, None),
        };

        let image = sqlx::query_as::<_, Image>(&format!(
            r#"
            UPDATE images SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                tags = COALESCE($4, tags),
                is_featured = COALESCE($5, is_featured),
                is_public = COALESCE($6, is_public),
                is_hero_image = COALESCE($7, is_hero_image),
                is_profile_picture = COALESCE($8, is_profile_picture),
                is_thumbnail = COALESCE($9, is_thumbnail),
                category_id = CASE WHEN $10 THEN $11 ELSE category_id END,
                category = CASE
                    WHEN $10 THEN (SELECT name FROM categories WHERE id = $11)
                    ELSE category
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.tags)
        .bind(changes.is_featured)
        .bind(changes.is_public)
        .bind(changes.is_hero_image)
        .bind(changes.is_profile_picture)
        .bind(changes.is_thumbnail)
        .bind(set_category)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(image)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Social media link repository

use anyhow::Result;
use common::models::{NewSocialMedia, SocialMedia, UpdateSocialMedia};
use sqlx::PgPool;

use super::Page;

const COLUMNS: &str =
    "id, platform, display_name, url, icon_name, is_active, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct SocialMediaRepository {
    pool: PgPool,
}

impl SocialMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active_only: bool, page: Page) -> Result<Vec<SocialMedia>> {
        let links = sqlx::query_as::<_, SocialMedia>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM social_media
            WHERE ($1 = FALSE OR is_active)
            ORDER BY sort_order ASC, created_at DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(active_only)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>> {
        let link = sqlx::query_as::<_, SocialMedia>(&format!(
            "SELECT {COLUMNS} FROM social_media WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(link)
    }

    pub async fn create(&self, link: &NewSocialMedia) -> Result<SocialMedia> {
        let created = sqlx::query_as::<_, SocialMedia>(&format!(
            r#"
            INSERT INTO social_media (platform, display_name, url, icon_name, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&link.platform)
        .bind(&link.display_name)
        .bind(&link.url)
        .bind(&link.icon_name)
        .bind(link.is_active)
        .bind(link.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: &UpdateSocialMedia) -> Result<Option<SocialMedia>> {
        let updated = sqlx::query_as::<_, SocialMedia>(&format!(
            r#"
            UPDATE social_media SET
                platform = COALESCE($2, platform),
                display_name = COALESCE($3, display_name),
                url = COALESCE($4, url),
                icon_name = COALESCE($5, icon_name),
                is_active = COALESCE($6, is_active),
                sort_order = COALESCE($7, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.platform)
        .bind(&changes.display_name)
        .bind(&changes.url)
        .bind(&changes.icon_name)
        .bind(changes.is_active)
        .bind(changes.sort_order)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM social_media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Hero slide repository

use anyhow::Result;
use common::models::{HeroSlide, NewHeroSlide, UpdateHeroSlide};
use sqlx::PgPool;

use super::Page;

const COLUMNS: &str = "id, title, subtitle, description, button_text, button_link, image_id, \
                       is_active, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct HeroSlideRepository {
    pool: PgPool,
}

impl HeroSlideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active_only: bool, page: Page) -> Result<Vec<HeroSlide>> {
        let slides = sqlx::query_as::<_, HeroSlide>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM hero_slides
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
        Ok(slides)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<HeroSlide>> {
        let slide = sqlx::query_as::<_, HeroSlide>(&format!(
            "SELECT {COLUMNS} FROM hero_slides WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(slide)
    }

    pub async fn create(&self, slide: &NewHeroSlide) -> Result<HeroSlide> {
        let created = sqlx::query_as::<_, HeroSlide>(&format!(
            r#"
            INSERT INTO hero_slides
                (title, subtitle, description, button_text, button_link, image_id, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&slide.title)
        .bind(&slide.subtitle)
        .bind(&slide.description)
        .bind(&slide.button_text)
        .bind(&slide.button_link)
        .bind(slide.image_id)
        .bind(slide.is_active)
        .bind(slide.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: &UpdateHeroSlide) -> Result<Option<HeroSlide>> {
        let updated = sqlx::query_as::<_, HeroSlide>(&format!(
            r#"
            UPDATE hero_slides SET
                title = COALESCE($2, title),
                subtitle = COALESCE($3, subtitle),
                description = COALESCE($4, description),
                button_text = COALESCE($5, button_text),
                button_link = COALESCE($6, button_link),
                image_id = COALESCE($7, image_id),
                is_active = COALESCE($8, is_active),
                sort_order = COALESCE($9, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.subtitle)
        .bind(&changes.description)
        .bind(&changes.button_text)
        .bind(&changes.button_link)
        .bind(changes.image_id)
        .bind(changes.is_active)
        .bind(changes.sort_order)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM hero_slides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Testimonial repository

use anyhow::Result;
use common::models::{NewTestimonial, Testimonial, UpdateTestimonial};
use sqlx::PgPool;

use super::Page;

const COLUMNS: &str = "id, name, title, company, content, rating, image_url, is_featured, \
                       is_active, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct TestimonialRepository {
    pool: PgPool,
}

impl TestimonialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active_only: bool, page: Page) -> Result<Vec<Testimonial>> {
        let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM testimonials
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
        Ok(testimonials)
    }

    /// Active featured testimonials
    pub async fn featured(&self, limit: i64) -> Result<Vec<Testimonial>> {
        let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM testimonials
            WHERE is_active AND is_featured
            ORDER BY sort_order ASC, created_at DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(testimonials)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Testimonial>> {
        let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {COLUMNS} FROM testimonials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(testimonial)
    }

    pub async fn create(&self, testimonial: &NewTestimonial) -> Result<Testimonial> {
        let created = sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            INSERT INTO testimonials
                (name, title, company, content, rating, image_url, is_featured, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&testimonial.name)
        .bind(&testimonial.title)
        .bind(&testimonial.company)
        .bind(&testimonial.content)
        .bind(testimonial.rating)
        .bind(&testimonial.image_url)
        .bind(testimonial.is_featured)
        .bind(testimonial.is_active)
        .bind(testimonial.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: &UpdateTestimonial) -> Result<Option<Testimonial>> {
        let updated = sqlx::query_as::<_, Testimonial>(&format!(
            r#"
            UPDATE testimonials SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                company = COALESCE($4, company),
                content = COALESCE($5, content),
                rating = COALESCE($6, rating),
                image_url = COALESCE($7, image_url),
                is_featured = COALESCE($8, is_featured),
                is_active = COALESCE($9, is_active),
                sort_order = COALESCE($10, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.title)
        .bind(&changes.company)
        .bind(&changes.content)
        .bind(changes.rating)
        .bind(&changes.image_url)
        .bind(changes.is_featured)
        .bind(changes.is_active)
        .bind(changes.sort_order)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Category repository

use anyhow::Result;
use common::models::{Category, NewCategory, UpdateCategory};
use sqlx::PgPool;

use super::Page;

const COLUMNS: &str =
    "id, name, slug, description, is_active, sort_order, created_at, updated_at";

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active_only: bool, page: Page) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM categories
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

        Ok(categories)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(category)
    }

    /// Whether another category already uses `name` or `slug`
    pub async fn is_taken(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        except_id: Option<i64>,
    ) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE (name = $1 OR slug = $2)
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn create(&self, category: &NewCategory) -> Result<Category> {
        let created = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, slug, description, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.is_active)
        .bind(category.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Apply the present fields; a rename is copied onto the category's images
    pub async fn update(&self, id: i64, changes: &UpdateCategory) -> Result<Option<Category>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(&changes.description)
        .bind(changes.is_active)
        .bind(changes.sort_order)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(category) = &updated {
            if changes.name.is_some() {
                sqlx::query("UPDATE images SET category = $2 WHERE category_id = $1")
                    .bind(id)
                    .bind(&category.name)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a category; its images stay but lose the category
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE images SET category = NULL, category_id = NULL WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

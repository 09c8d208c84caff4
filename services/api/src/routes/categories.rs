//! Category endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    models::{ListQuery, NewCategory, UpdateCategory},
    validation::check,
};
use tracing::info;

use super::{admin_only, list_options};
use crate::{
    error::{ApiError, ApiResult},
    response::{created, message, ok},
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/api/categories/", post(create_category))
        .route("/api/categories/:id", put(update_category).delete(delete_category));

    Router::new()
        .route("/api/categories/", get(list_categories))
        .route("/api/categories/:id", get(get_category))
        .merge(admin_only(admin, state))
}

fn duplicate() -> ApiError {
    ApiError::Conflict("Category with this name or slug already exists".to_string())
}

async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (active_only, page) = list_options(&query);
    let categories = state.categories.list(active_only, page).await?;
    Ok(ok(categories, "Categories retrieved."))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    Ok(ok(category, "Category details retrieved."))
}

async fn create_category(
    State(state): State<AppState>,
    Json(category): Json<NewCategory>,
) -> ApiResult<impl IntoResponse> {
    check(&category)?;

    if state
        .categories
        .is_taken(Some(&category.name), Some(&category.slug), None)
        .await?
    {
        return Err(duplicate());
    }

    let category = state
        .categories
        .create(&category)
        .await
        .map_err(|e| ApiError::from_write(e, duplicate))?;
    info!("Created category {}", category.slug);
    Ok(created(category, "Category created."))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<UpdateCategory>,
) -> ApiResult<impl IntoResponse> {
    check(&changes)?;

    if (changes.name.is_some() || changes.slug.is_some())
        && state
            .categories
            .is_taken(changes.name.as_deref(), changes.slug.as_deref(), Some(id))
            .await?
    {
        return Err(duplicate());
    }

    let category = state
        .categories
        .update(id, &changes)
        .await
        .map_err(|e| ApiError::from_write(e, duplicate))?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    Ok(ok(category, "Category updated."))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.categories.delete(id).await? {
        return Err(ApiError::not_found("Category"));
    }
    info!("Deleted category {}", id);
    Ok(message("Category deleted successfully"))
}

//! Hero slide endpoints
//!
//! A slide points at an uploaded image, which must exist when the slide is
//! created or re-pointed.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    models::{ListQuery, NewHeroSlide, UpdateHeroSlide},
    validation::check,
};

use super::{admin_only, list_options};
use crate::{
    error::{ApiError, ApiResult},
    response::{created, message, ok},
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/api/hero-slides/", post(create_slide))
        .route("/api/hero-slides/:id", put(update_slide).delete(delete_slide));

    Router::new()
        .route("/api/hero-slides/", get(list_slides))
        .route("/api/hero-slides/:id", get(get_slide))
        .merge(admin_only(admin, state))
}

async fn ensure_image(state: &AppState, image_id: i64) -> ApiResult<()> {
    if !state.images.exists(image_id).await? {
        return Err(ApiError::not_found("Image"));
    }
    Ok(())
}

async fn list_slides(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (active_only, page) = list_options(&query);
    let slides = state.hero_slides.list(active_only, page).await?;
    Ok(ok(slides, "Hero slides retrieved."))
}

async fn get_slide(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let slide = state
        .hero_slides
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Hero slide"))?;
    Ok(ok(slide, "Hero slide details retrieved."))
}

async fn create_slide(
    State(state): State<AppState>,
    Json(slide): Json<NewHeroSlide>,
) -> ApiResult<impl IntoResponse> {
    check(&slide)?;
    ensure_image(&state, slide.image_id).await?;

    let slide = state.hero_slides.create(&slide).await?;
    Ok(created(slide, "Hero slide created."))
}

async fn update_slide(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<UpdateHeroSlide>,
) -> ApiResult<impl IntoResponse> {
    check(&changes)?;
    if let Some(image_id) = changes.image_id {
        ensure_image(&state, image_id).await?;
    }

    let slide = state
        .hero_slides
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Hero slide"))?;
    Ok(ok(slide, "Hero slide updated."))
}

async fn delete_slide(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.hero_slides.delete(id).await? {
        return Err(ApiError::not_found("Hero slide"));
    }
    Ok(message("Hero slide deleted."))
}

//! Testimonial endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    models::{ListQuery, NewTestimonial, UpdateTestimonial},
    validation::check,
};
use serde::Deserialize;

use super::{admin_only, list_options};
use crate::{
    error::{ApiError, ApiResult},
    repositories::Page,
    response::{created, message, ok},
    state::AppState,
};

const DEFAULT_FEATURED_LIMIT: i64 = 6;

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/api/testimonials/", post(create_testimonial))
        .route(
            "/api/testimonials/:id",
            put(update_testimonial).delete(delete_testimonial),
        );

    Router::new()
        .route("/api/testimonials/", get(list_testimonials))
        .route("/api/testimonials/featured", get(featured_testimonials))
        .route("/api/testimonials/:id", get(get_testimonial))
        .merge(admin_only(admin, state))
}

#[derive(Debug, Deserialize)]
struct FeaturedQuery {
    limit: Option<i64>,
}

async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (active_only, page) = list_options(&query);
    let testimonials = state.testimonials.list(active_only, page).await?;
    Ok(ok(testimonials, "Testimonials retrieved."))
}

async fn featured_testimonials(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = Page::new(None, Some(query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT))).limit;
    let testimonials = state.testimonials.featured(limit).await?;
    Ok(ok(testimonials, "Featured testimonials retrieved."))
}

async fn get_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let testimonial = state
        .testimonials
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial"))?;
    Ok(ok(testimonial, "Testimonial details retrieved."))
}

async fn create_testimonial(
    State(state): State<AppState>,
    Json(testimonial): Json<NewTestimonial>,
) -> ApiResult<impl IntoResponse> {
    check(&testimonial)?;
    let testimonial = state.testimonials.create(&testimonial).await?;
    Ok(created(testimonial, "Testimonial created."))
}

async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<UpdateTestimonial>,
) -> ApiResult<impl IntoResponse> {
    check(&changes)?;
    let testimonial = state
        .testimonials
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Testimonial"))?;
    Ok(ok(testimonial, "Testimonial updated."))
}

async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.testimonials.delete(id).await? {
        return Err(ApiError::not_found("Testimonial"));
    }
    Ok(message("Testimonial deleted."))
}

//! Social media link endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    models::{ListQuery, NewSocialMedia, UpdateSocialMedia},
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
        .route("/api/social-media/", post(create_link))
        .route("/api/social-media/:id", put(update_link).delete(delete_link));

    Router::new()
        .route("/api/social-media/", get(list_links))
        .route("/api/social-media/:id", get(get_link))
        .merge(admin_only(admin, state))
}

async fn list_links(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (active_only, page) = list_options(&query);
    let links = state.social_media.list(active_only, page).await?;
    Ok(ok(links, "Social media links retrieved."))
}

async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let link = state
        .social_media
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Social media link"))?;
    Ok(ok(link, "Social media link retrieved."))
}

async fn create_link(
    State(state): State<AppState>,
    Json(link): Json<NewSocialMedia>,
) -> ApiResult<impl IntoResponse> {
    check(&link)?;
    let link = state.social_media.create(&link).await?;
    Ok(created(link, "Social media link created."))
}

async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<UpdateSocialMedia>,
) -> ApiResult<impl IntoResponse> {
    check(&changes)?;
    let link = state
        .social_media
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Social media link"))?;
    Ok(ok(link, "Social media link updated."))
}

async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    if !state.social_media.delete(id).await? {
        return Err(ApiError::not_found("Social media link"));
    }
    Ok(message("Social media link deleted."))
}

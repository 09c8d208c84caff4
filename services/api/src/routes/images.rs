//! Gallery image endpoints
//!
//! Listing and reading are public. Uploading requires a signed-in user, and
//! an image can only be changed or deleted by the user who uploaded it.

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    FieldErrors,
    models::{Image, ImageMetadata, ImageQuery, UpdateImage},
    validation::check,
};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    repositories::{Page, images::NewImageRecord},
    response::{created, message, ok},
    state::AppState,
    storage::StoredFile,
};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/images/", post(upload_image))
        .route("/api/images/my-images", get(my_images))
        .route("/api/images/:id", put(update_image).delete(delete_image))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/api/images/", get(list_images))
        .route("/api/images/:id", get(get_image))
        .merge(protected)
}

async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> ApiResult<impl IntoResponse> {
    let images = state.images.list_public(&query).await?;
    Ok(ok(images, "Images retrieved."))
}

async fn my_images(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ImageQuery>,
) -> ApiResult<impl IntoResponse> {
    let images = state
        .images
        .list_by_owner(user.id, Page::new(query.skip, query.limit))
        .await?;
    Ok(ok(images, "Your images retrieved."))
}

async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let image = state
        .images
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Image"))?;
    Ok(ok(image, "Image details retrieved."))
}

/// File part of an upload
struct UploadedFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

fn parse_flag(field: &str, value: &str, errors: &mut FieldErrors) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => true,
        "false" | "0" | "off" | "no" | "" => false,
        _ => {
            errors.add(field, "Must be true or false");
            false
        }
    }
}

/// Split a multipart upload into the file and its metadata
async fn read_upload(
    mut multipart: Multipart,
) -> ApiResult<(Option<UploadedFile>, ImageMetadata, FieldErrors)> {
    let mut file = None;
    let mut metadata = ImageMetadata::titled("");
    let mut errors = FieldErrors::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            file = Some(UploadedFile {
                name: file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await?;
        let optional = || Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match name.as_str() {
            "title" => metadata.title = value.trim().to_string(),
            "description" => metadata.description = optional(),
            "tags" => metadata.tags = optional(),
            "category_id" => match optional().map(|v| v.parse::<i64>()) {
                None => metadata.category_id = None,
                Some(Ok(id)) => metadata.category_id = Some(id),
                Some(Err(_)) => errors.add("category_id", "Category is invalid"),
            },
            "is_featured" => metadata.is_featured = parse_flag(&name, &value, &mut errors),
            "is_public" => metadata.is_public = parse_flag(&name, &value, &mut errors),
            "is_hero_image" => metadata.is_hero_image = parse_flag(&name, &value, &mut errors),
            "is_profile_picture" => {
                metadata.is_profile_picture = parse_flag(&name, &value, &mut errors)
            }
            "is_thumbnail" => metadata.is_thumbnail = parse_flag(&name, &value, &mut errors),
            _ => {}
        }
    }

    Ok((file, metadata, errors))
}

async fn ensure_category(state: &AppState, category_id: Option<i64>) -> ApiResult<()> {
    if let Some(id) = category_id {
        if state.categories.find_by_id(id).await?.is_none() {
            return Err(ApiError::BadRequest("Category not found".to_string()));
        }
    }
    Ok(())
}

async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let (file, mut metadata, mut errors) = read_upload(multipart).await?;

    if let Err(invalid) = check(&metadata) {
        for (field, messages) in invalid.iter() {
            for msg in messages {
                errors.add(field, msg.as_str());
            }
        }
    }
    if file.is_none() {
        errors.add("file", "Please choose an image to upload");
    }
    let Some(file) = file.filter(|_| errors.is_empty()) else {
        return Err(errors.into());
    };

    if metadata.is_profile_picture {
        metadata.category_id = None;
    }
    ensure_category(&state, metadata.category_id).await?;

    let stored = state
        .storage
        .save(&file.name, file.content_type.as_deref(), &file.bytes)
        .await?;
    let image = record_upload(&state, stored, metadata, user.id).await?;

    info!("User {} uploaded image {}", user.username, image.id);
    Ok(created(image, "Image uploaded."))
}

/// Insert the row for a saved file, removing the file if the insert fails
pub(super) async fn record_upload(
    state: &AppState,
    stored: StoredFile,
    metadata: ImageMetadata,
    owner_id: i64,
) -> ApiResult<Image> {
    let filename = stored.filename.clone();
    let record = NewImageRecord {
        metadata,
        filename: stored.filename,
        file_path: stored.file_path,
        file_size: stored.file_size,
        mime_type: stored.mime_type,
        owner_id,
    };

    match state.images.create(&record).await {
        Ok(image) => Ok(image),
        Err(e) => {
            error!("Failed to record upload {}: {:#}", filename, e);
            state.storage.remove(&filename).await;
            Err(e.into())
        }
    }
}

/// Category assignment an update ends up applying
///
/// An image that is a profile picture after the update loses its category.
fn category_change(changes: &UpdateImage, is_profile_picture: bool) -> Option<Option<i64>> {
    if changes.is_profile_picture.unwrap_or(is_profile_picture) {
        return Some(None);
    }
    changes.category_id
}

/// Load an image the caller is allowed to modify
async fn owned_image(state: &AppState, user: &AuthUser, id: i64) -> ApiResult<Image> {
    let image = state
        .images
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Image"))?;

    if image.owner_id != user.id {
        return Err(ApiError::Forbidden("Not enough permissions".to_string()));
    }
    Ok(image)
}

async fn update_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(mut changes): Json<UpdateImage>,
) -> ApiResult<impl IntoResponse> {
    check(&changes)?;
    let image = owned_image(&state, &user, id).await?;

    changes.category_id = category_change(&changes, image.is_profile_picture);
    if let Some(category_id) = changes.category_id {
        ensure_category(&state, category_id).await?;
    }

    let image = state
        .images
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Image"))?;
    Ok(ok(image, "Image updated."))
}

async fn delete_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let image = owned_image(&state, &user, id).await?;

    if !state.images.delete(id).await? {
        return Err(ApiError::not_found("Image"));
    }
    state.storage.remove(&image.filename).await;

    info!("User {} deleted image {}", user.username, id);
    Ok(message("Image deleted."))
}

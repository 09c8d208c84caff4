//! Route flows against a live PostgreSQL
//!
//! Every test needs `DATABASE_URL` and is ignored by default; run them with
//! `cargo test -p api -- --ignored`. Rows are created with unique names so
//! the tests can share one database.

use super::{create_router, images::record_upload};
use crate::{
    config::Settings,
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::images::NewImageRecord,
    state::AppState,
};
use anyhow::Result;
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, init_pool, migrate},
    models::{ImageMetadata, User},
};
use serde_json::{Value, json};
use std::path::Path;
use tower::ServiceExt;

const BOUNDARY: &str = "studio-test-boundary";

async fn live_state(upload_dir: &Path) -> Result<AppState> {
    let mut settings = Settings::from_env()?;
    settings.upload_dir = upload_dir.to_path_buf();

    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    migrate(&pool, &sqlx::migrate!("./migrations")).await?;

    // Nothing here touches refresh tokens
    let redis = RedisPool::new(&RedisConfig::new("redis://127.0.0.1:9")).await?;
    let jwt = JwtService::new(JwtConfig {
        secret: "flow-secret".to_string(),
        access_token_expiry: 300,
    });

    Ok(AppState::new(
        settings,
        pool,
        redis,
        jwt,
        RateLimiter::new(RateLimiterConfig::default()),
    ))
}

fn unique() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_string()
}

/// Create a user and an access token for it
async fn sign_up(state: &AppState, is_admin: bool) -> Result<(User, String)> {
    let name = format!("user{}", unique());
    let user = state
        .users
        .create(&name, &format!("{}@example.com", name), "password123", is_admin)
        .await?;
    let token = state.jwt.generate_access_token(&user)?;
    Ok((user, token))
}

async fn call(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(token: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/images/")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create_category(state: &AppState, token: &str) -> Value {
    let suffix = unique();
    let (status, body) = call(
        state,
        json_request(
            Method::POST,
            "/api/categories/",
            token,
            json!({"name": format!("Weddings {suffix}"), "slug": format!("weddings-{suffix}")}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

async fn insert_image(state: &AppState, owner_id: i64, category_id: Option<i64>) -> Result<i64> {
    let mut metadata = ImageMetadata::titled("Golden hour");
    metadata.category_id = category_id;
    let image = state
        .images
        .create(&NewImageRecord {
            metadata,
            filename: format!("{}.jpg", unique()),
            file_path: "static/images/unused.jpg".to_string(),
            file_size: 3,
            mime_type: "image/jpeg".to_string(),
            owner_id,
        })
        .await?;
    Ok(image.id)
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_stores_file_and_row() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (admin, admin_token) = sign_up(&state, true).await?;
    let category = create_category(&state, &admin_token).await;
    let category_id = category["id"].as_i64().unwrap().to_string();

    let request = upload_request(
        &admin_token,
        &[
            ("title", "Golden hour"),
            ("category_id", category_id.as_str()),
            ("is_featured", "on"),
        ],
        Some(("sunset.JPG", &b"jpegdata"[..])),
    );
    let (status, body) = call(&state, request).await;

    assert_eq!(status, StatusCode::CREATED);
    let image = &body["data"];
    assert_eq!(image["owner_id"], admin.id);
    assert_eq!(image["is_featured"], true);
    assert_eq!(image["category"], category["name"]);
    let filename = image["filename"].as_str().unwrap();
    assert!(filename.ends_with(".jpg"));
    assert_eq!(std::fs::read(dir.path().join(filename))?, b"jpegdata");

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_with_unknown_category_saves_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (_, token) = sign_up(&state, false).await?;

    let request = upload_request(
        &token,
        &[("title", "Golden hour"), ("category_id", "999999999")],
        Some(("sunset.jpg", &b"jpegdata"[..])),
    );
    let (status, body) = call(&state, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category not found");
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_failed_insert_removes_saved_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;

    let stored = state.storage.save("sunset.jpg", None, b"jpegdata").await?;
    let path = dir.path().join(&stored.filename);
    assert!(path.exists());

    // No such owner: the foreign key rejects the row
    let result = record_upload(&state, stored, ImageMetadata::titled("Orphan"), -1).await;

    assert!(result.is_err());
    assert!(!path.exists());

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_only_the_owner_may_change_an_image() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (owner, owner_token) = sign_up(&state, false).await?;
    let (_, other_token) = sign_up(&state, true).await?;
    let id = insert_image(&state, owner.id, None).await?;
    let uri = format!("/api/images/{}", id);

    let (status, body) = call(
        &state,
        json_request(Method::PUT, &uri, &other_token, json!({"title": "Mine now"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not enough permissions");

    let (status, _) = call(&state, json_request(Method::DELETE, &uri, &other_token, Value::Null)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &state,
        json_request(Method::PUT, &uri, &owner_token, json!({"title": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Renamed");

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_profile_picture_update_detaches_category() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (owner, token) = sign_up(&state, true).await?;
    let category = create_category(&state, &token).await;
    let id = insert_image(&state, owner.id, category["id"].as_i64()).await?;

    let (status, body) = call(
        &state,
        json_request(
            Method::PUT,
            &format!("/api/images/{}", id),
            &token,
            json!({"is_profile_picture": true, "category_id": category["id"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_profile_picture"], true);
    assert_eq!(body["data"]["category_id"], Value::Null);
    assert_eq!(body["data"]["category"], Value::Null);

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_category_name_or_slug_conflicts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (_, token) = sign_up(&state, true).await?;
    let existing = create_category(&state, &token).await;

    let same_name = json!({"name": existing["name"], "slug": format!("other-{}", unique())});
    let (status, body) = call(
        &state,
        json_request(Method::POST, "/api/categories/", &token, same_name),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let same_slug = json!({"name": format!("Other {}", unique()), "slug": existing["slug"]});
    let (status, _) = call(
        &state,
        json_request(Method::POST, "/api/categories/", &token, same_slug),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let other = create_category(&state, &token).await;
    let (status, _) = call(
        &state,
        json_request(
            Method::PUT,
            &format!("/api/categories/{}", other["id"]),
            &token,
            json!({"slug": existing["slug"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_category_rename_and_delete_reach_images() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (admin, token) = sign_up(&state, true).await?;
    let category = create_category(&state, &token).await;
    let category_id = category["id"].as_i64().unwrap();
    let image_id = insert_image(&state, admin.id, Some(category_id)).await?;

    let renamed = format!("Portraits {}", unique());
    let (status, _) = call(
        &state,
        json_request(
            Method::PUT,
            &format!("/api/categories/{}", category_id),
            &token,
            json!({"name": renamed}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let image = state.images.find_by_id(image_id).await?.unwrap();
    assert_eq!(image.category.as_deref(), Some(renamed.as_str()));

    let (status, _) = call(
        &state,
        json_request(
            Method::DELETE,
            &format!("/api/categories/{}", category_id),
            &token,
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let image = state.images.find_by_id(image_id).await?.unwrap();
    assert_eq!(image.category_id, None);
    assert_eq!(image.category, None);

    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_hero_slide_needs_existing_image() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let state = live_state(dir.path()).await?;
    let (admin, token) = sign_up(&state, true).await?;

    let (status, body) = call(
        &state,
        json_request(
            Method::POST,
            "/api/hero-slides/",
            &token,
            json!({"title": "Welcome", "image_id": 999999999}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Image not found");

    let image_id = insert_image(&state, admin.id, None).await?;
    let (status, body) = call(
        &state,
        json_request(
            Method::POST,
            "/api/hero-slides/",
            &token,
            json!({"title": "Welcome", "image_id": image_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["image_id"], image_id);

    Ok(())
}

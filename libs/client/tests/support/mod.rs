//! Scripted in-memory stand-in for the studio API

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use client::{ApiRequest, ApiResponse, Body, TokenPair, Transport, TransportError};
use common::models::{Image, User};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeState {
    pub requests: Vec<ApiRequest>,
    pub valid_access: HashSet<String>,
    pub valid_refresh: HashSet<String>,
    pub refresh_calls: usize,
    pub refresh_fails: bool,
    /// Paths that behave as if the network were down
    pub offline: HashSet<String>,
    pub images: BTreeMap<i64, Image>,
    pub next_id: i64,
    pub minted: u32,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
    refresh_delay: Duration,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.with_state(|state| {
            state.next_id = 1;
            for title in ["Sunset", "Portrait"] {
                let id = state.next_id;
                state.next_id += 1;
                state.images.insert(id, image(id, title));
            }
        });
        api
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Mint a valid pair as if the user had signed in earlier
    pub fn issue_tokens(&self) -> TokenPair {
        self.with_state(mint)
    }

    pub fn expire_access_tokens(&self) {
        self.with_state(|state| state.valid_access.clear());
    }

    pub fn refresh_calls(&self) -> usize {
        self.with_state(|state| state.refresh_calls)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.with_state(|state| state.requests.clone())
    }

    pub fn request_count(&self) -> usize {
        self.with_state(|state| state.requests.len())
    }

    pub fn go_offline(&self, path: &str) {
        self.with_state(|state| state.offline.insert(path.to_string()));
    }
}

fn mint(state: &mut FakeState) -> TokenPair {
    state.minted += 1;
    let pair = TokenPair::new(
        format!("access-{}", state.minted),
        format!("refresh-{}", state.minted),
    );
    state.valid_access.insert(pair.access_token.clone());
    state.valid_refresh.insert(pair.refresh_token.clone());
    pair
}

pub fn admin() -> User {
    User {
        id: 1,
        username: "admin".to_string(),
        email: "admin@cheriyanphotography.com".to_string(),
        full_name: None,
        is_active: true,
        is_admin: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn image(id: i64, title: &str) -> Image {
    Image {
        id,
        title: title.to_string(),
        description: None,
        filename: format!("{}.jpg", id),
        file_path: format!("static/images/{}.jpg", id),
        file_size: Some(3),
        mime_type: Some("image/jpeg".to_string()),
        category: None,
        tags: None,
        is_featured: false,
        is_public: true,
        is_hero_image: false,
        is_profile_picture: false,
        is_thumbnail: false,
        category_id: None,
        owner_id: 1,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn ok(data: Value, message: &str) -> ApiResponse {
    ApiResponse::json(200, &json!({"success": true, "message": message, "data": data}))
}

fn fail(status: u16, message: &str) -> ApiResponse {
    ApiResponse::json(
        status,
        &json!({"success": false, "message": message,
                "error": {"code": "ERROR", "description": message}}),
    )
}

fn unauthorized() -> ApiResponse {
    ApiResponse::json(401, &json!({"detail": "Could not validate credentials"}))
}

fn authorized(state: &FakeState, request: &ApiRequest) -> bool {
    request
        .bearer()
        .is_some_and(|token| state.valid_access.contains(token))
}

#[async_trait]
impl Transport for FakeApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.path.clone();
        let refreshing = path == "/api/auth/refresh";
        if refreshing && !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state.offline.contains(&path) {
            return Err(TransportError::Connection("connection refused".to_string()));
        }

        let response = match (request.method.as_str(), path.as_str()) {
            ("POST", "/api/auth/login") => {
                let Body::Form(fields) = &request.body else {
                    return Ok(fail(422, "Expected a form body"));
                };
                let field = |name: &str| {
                    fields
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v.as_str())
                };
                if field("username") == Some("admin") && field("password") == Some("admin123") {
                    let pair = mint(&mut state);
                    ok(
                        json!({"access_token": pair.access_token, "refresh_token": pair.refresh_token,
                               "token_type": "bearer", "user": admin()}),
                        "Authentication successful.",
                    )
                } else {
                    fail(401, "Incorrect username or password")
                }
            }
            ("POST", "/api/auth/refresh") => {
                state.refresh_calls += 1;
                let token = match &request.body {
                    Body::Json(body) => body["refresh_token"].as_str().unwrap_or("").to_string(),
                    _ => String::new(),
                };
                if state.refresh_fails || !state.valid_refresh.remove(&token) {
                    fail(401, "Invalid refresh token")
                } else {
                    let pair = mint(&mut state);
                    // Bare token object, no envelope
                    ApiResponse::json(
                        200,
                        &json!({"access_token": pair.access_token, "refresh_token": pair.refresh_token}),
                    )
                }
            }
            ("POST", "/api/auth/logout") => {
                ok(Value::Null, "Signed out and refresh token revoked.")
            }
            ("GET", "/api/auth/me") => {
                if authorized(&state, &request) {
                    ok(json!(admin()), "Authenticated user profile retrieved.")
                } else {
                    unauthorized()
                }
            }
            ("GET", "/api/images/my-images") => {
                if authorized(&state, &request) {
                    let images: Vec<&Image> = state.images.values().collect();
                    ok(json!(images), "Images retrieved.")
                } else {
                    unauthorized()
                }
            }
            ("GET", "/api/images/") => {
                let images: Vec<&Image> = state.images.values().collect();
                ok(json!(images), "Images retrieved.")
            }
            ("POST", "/api/images/") => {
                if !authorized(&state, &request) {
                    unauthorized()
                } else if let Body::Multipart { fields, .. } = &request.body {
                    let title = fields
                        .iter()
                        .find(|(k, _)| k == "title")
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    let id = state.next_id;
                    state.next_id += 1;
                    let created = image(id, &title);
                    state.images.insert(id, created.clone());
                    ok(json!(created), "Image uploaded.")
                } else {
                    fail(422, "Expected a multipart body")
                }
            }
            ("DELETE", other) if other.starts_with("/api/images/") => {
                if !authorized(&state, &request) {
                    unauthorized()
                } else {
                    let id: i64 = other["/api/images/".len()..].parse().unwrap_or(0);
                    match state.images.remove(&id) {
                        Some(_) => ok(Value::Null, "Image deleted."),
                        None => fail(404, "Image not found"),
                    }
                }
            }
            _ => fail(404, "Not Found"),
        };

        Ok(response)
    }
}

//! reqwest transport against a local axum server

use axum::{
    Json, Router,
    extract::{Form, Multipart, Query},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use client::{ApiRequest, FilePart, HttpTransport, Transport, TransportError};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

async fn echo(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({"authorization": authorization, "query": query}))
}

async fn form(Form(fields): Form<HashMap<String, String>>) -> Json<Value> {
    Json(json!(fields))
}

async fn upload(mut multipart: Multipart) -> Result<Json<Value>, StatusCode> {
    let mut fields = HashMap::new();
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            file = Some(json!({"name": file_name, "type": content_type, "len": bytes.len()}));
        } else {
            let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            fields.insert(name, value);
        }
    }
    Ok(Json(json!({"fields": fields, "file": file})))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/echo", get(echo))
        .route("/api/form", post(form))
        .route("/api/upload", post(upload));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_headers_and_query_reach_server() {
    let transport = HttpTransport::new(spawn_server().await, Duration::from_secs(5)).unwrap();

    let mut request = ApiRequest::get("/api/echo").query([("active_only", "true".to_string())]);
    request.set_header("Authorization", "Bearer abc");

    let response = transport.execute(request).await.unwrap();
    assert_eq!(response.status, 200);

    let body: Value = response.decode().unwrap();
    assert_eq!(body["authorization"], "Bearer abc");
    assert_eq!(body["query"]["active_only"], "true");
}

#[tokio::test]
async fn test_form_body_is_url_encoded() {
    let transport = HttpTransport::new(spawn_server().await, Duration::from_secs(5)).unwrap();

    let request = ApiRequest::post("/api/form").form(vec![
        ("username".to_string(), "admin".to_string()),
        ("password".to_string(), "admin 123".to_string()),
    ]);
    let body: Value = transport.execute(request).await.unwrap().decode().unwrap();

    assert_eq!(body, json!({"username": "admin", "password": "admin 123"}));
}

#[tokio::test]
async fn test_multipart_carries_file_and_fields() {
    let transport = HttpTransport::new(spawn_server().await, Duration::from_secs(5)).unwrap();

    let request = ApiRequest::post("/api/upload").multipart(
        vec![
            ("title".to_string(), "Sunset".to_string()),
            ("is_featured".to_string(), "true".to_string()),
        ],
        FilePart::new("sunset.jpg", vec![0xff; 16]),
    );
    let body: Value = transport.execute(request).await.unwrap().decode().unwrap();

    assert_eq!(body["fields"]["title"], "Sunset");
    assert_eq!(body["fields"]["is_featured"], "true");
    assert_eq!(body["file"]["name"], "sunset.jpg");
    assert_eq!(body["file"]["type"], "image/jpeg");
    assert_eq!(body["file"]["len"], 16);
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Port 9 (discard) is closed on test machines
    let transport =
        HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let error = transport
        .execute(ApiRequest::get("/api/echo"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        TransportError::Connection(_) | TransportError::Timeout(_) | TransportError::Request(_)
    ));
}

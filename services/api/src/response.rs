//! Success envelopes

use axum::{Json, http::StatusCode};
use common::Envelope;
use serde::Serialize;

pub fn ok<T: Serialize>(data: T, message: &str) -> Json<Envelope<T>> {
    Json(Envelope::ok(data, message))
}

pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::ok(data, message)))
}

/// Envelope without `data`
pub fn message(message: &str) -> Json<Envelope<()>> {
    Json(Envelope::message(message))
}

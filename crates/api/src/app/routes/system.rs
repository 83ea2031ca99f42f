use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app::dto;

pub async fn banner() -> impl IntoResponse {
    Json(dto::ServiceBanner::default())
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "no route");
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route not found" })))
}

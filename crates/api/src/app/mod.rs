//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, catalog service, startup seeding
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::middleware::AdminState;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Request bodies up to 10 MiB.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<services::AppServices>, config: &ApiConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    routes::router(AdminState::new(config.admin_token.clone()))
        .layer(Extension(services))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout))
                .layer(cors),
        )
}

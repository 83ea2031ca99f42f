use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app::errors;

/// Admin token expected on write routes; `None` leaves them open.
#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub token: Option<Arc<str>>,
}

impl AdminState {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.map(Arc::from),
        }
    }
}

pub async fn admin_guard(
    State(state): State<AdminState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.token.as_deref() else {
        return next.run(req).await;
    };

    match extract_bearer(req.headers()) {
        Some(token) if token == expected => next.run(req).await,
        Some(_) => errors::json_error(StatusCode::UNAUTHORIZED, "Not authorized, token failed"),
        None => errors::json_error(StatusCode::UNAUTHORIZED, "Not authorized, no token"),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

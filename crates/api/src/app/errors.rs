use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use plantify_core::DomainError;
use plantify_infra::CatalogError;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Map a catalog failure to the storefront envelope.
///
/// `server_message` is what clients see for store failures; the store error
/// itself is only logged.
pub fn catalog_error_to_response(
    err: CatalogError,
    server_message: &'static str,
) -> axum::response::Response {
    match err {
        CatalogError::Domain(DomainError::Validation(errors)) => {
            validation_error(errors.messages().to_vec())
        }
        CatalogError::Domain(DomainError::NotFound | DomainError::InvalidId(_)) => {
            json_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND)
        }
        CatalogError::Domain(DomainError::Conflict(msg)) => json_error(StatusCode::CONFLICT, msg),
        CatalogError::Store(e) => {
            tracing::error!(error = %e, "{server_message}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, server_message)
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn validation_error(errors: Vec<String>) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "success": false,
            "message": "Validation error",
            "errors": errors,
        })),
    )
        .into_response()
}

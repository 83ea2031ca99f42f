use axum::{routing::get, Router};

use crate::middleware::AdminState;

pub mod products;
pub mod system;

/// Every route of the service, without the cross-cutting layers.
pub fn router(admin: AdminState) -> Router {
    Router::new()
        .route("/", get(system::banner))
        .route("/health", get(system::health))
        .nest("/api/products", products::router(admin))
        .fallback(system::not_found)
}

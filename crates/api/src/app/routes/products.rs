use std::sync::Arc;

use axum::{
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use plantify_core::{DomainError, ProductId};
use plantify_infra::CatalogError;
use plantify_products::{ListingParams, ListingQuery, NewReview, ProductDraft};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::middleware::{self, AdminState};

/// `/api/products` routes. Create/update/delete sit behind the admin guard.
pub fn router(admin: AdminState) -> Router {
    let guard = from_fn_with_state(admin, middleware::admin_guard);

    Router::new()
        .route(
            "/",
            get(list_products).merge(post(create_product).route_layer(guard.clone())),
        )
        .route(
            "/:id",
            get(get_product).merge(
                axum::routing::put(update_product)
                    .delete(delete_product)
                    .route_layer(guard),
            ),
        )
        .route("/:id/reviews", post(add_review))
}

/// Malformed ids can never name a stored product.
fn parse_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::NOT_FOUND, errors::PRODUCT_NOT_FOUND))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> axum::response::Response {
    let params = match params {
        Ok(Query(p)) => p,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable listing query; using defaults");
            ListingParams::default()
        }
    };

    match services.catalog.list(&ListingQuery::from(params)).await {
        Ok(page) => Json(dto::ListResponse {
            success: true,
            data: page.data,
            pagination: page.pagination,
        })
        .into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Server error while fetching products"),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.get_product(id).await {
        Ok(product) => Json(dto::ProductResponse::new(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Server error while fetching product"),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductDraft>, JsonRejection>,
) -> axum::response::Response {
    let Json(draft) = match body {
        Ok(b) => b,
        Err(e) => return errors::validation_error(vec![e.body_text()]),
    };

    match services.catalog.create_product(draft).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(dto::ProductResponse::with_message(
                product,
                "Product created successfully",
            )),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Server error while creating product"),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductDraft>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::validation_error(vec![e.body_text()]),
    };

    match services.catalog.update_product(id, patch).await {
        Ok(product) => Json(dto::ProductResponse::with_message(
            product,
            "Product updated successfully",
        ))
        .into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Server error while updating product"),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.catalog.delete_product(id).await {
        Ok(()) => Json(dto::MessageResponse::ok("Product deleted successfully")).into_response(),
        Err(e) => errors::catalog_error_to_response(e, "Server error while deleting product"),
    }
}

pub async fn add_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<NewReview>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(review) = match body {
        Ok(b) => b,
        Err(e) => return errors::validation_error(vec![e.body_text()]),
    };

    match services.catalog.add_review(id, review).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(dto::MessageResponse::ok("Review added successfully")),
        )
            .into_response(),
        // A second review by the same shopper is a client mistake, not a key clash.
        Err(CatalogError::Domain(DomainError::Conflict(msg))) => {
            errors::json_error(StatusCode::BAD_REQUEST, msg)
        }
        Err(e) => errors::catalog_error_to_response(e, "Server error while adding review"),
    }
}

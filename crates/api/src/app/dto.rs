use serde::Serialize;

use plantify_products::{PaginationInfo, Product, ProductSummary};

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<ProductSummary>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub data: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl ProductResponse {
    pub fn new(data: Product) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: Product, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub products: &'static str,
    pub health: &'static str,
}

impl Default for ServiceBanner {
    fn default() -> Self {
        Self {
            message: "Plantify API Server is running!",
            version: env!("CARGO_PKG_VERSION"),
            endpoints: Endpoints {
                products: "/api/products",
                health: "/health",
            },
        }
    }
}

use thiserror::Error;

use plantify_core::ProductId;
use plantify_products::{PageRequest, Product, ProductFilter, SortKey};

pub type StoreResult<T> = Result<T, StoreError>;

/// Product store error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique key (SKU) is already taken by another product.
    #[error("duplicate key: {0}")]
    Conflict(String),

    /// The record to replace does not exist.
    #[error("record not found")]
    NotFound,

    /// The backend failed (connection, query, decoding...). Never shown to clients.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Async access to the product collection.
///
/// Every query method applies `ProductFilter` semantics, including the
/// mandatory `isActive = true` predicate.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Filtered, ordered, windowed products.
    async fn find(
        &self,
        filter: &ProductFilter,
        sort: SortKey,
        page: PageRequest,
    ) -> StoreResult<Vec<Product>>;

    /// Number of products matching `filter`, ignoring any window.
    async fn count(&self, filter: &ProductFilter) -> StoreResult<u64>;

    /// Every product matching `filter`, unordered. Feeds relevance ranking.
    async fn candidates(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;

    /// Lookup by id regardless of the active flag.
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Insert a new product. SKU collisions yield `StoreError::Conflict`.
    async fn insert(&self, product: Product) -> StoreResult<()>;

    /// Replace an existing product (matched by id).
    async fn replace(&self, product: Product) -> StoreResult<()>;
}

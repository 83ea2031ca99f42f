//! Catalog service: listing queries plus the single-product read/write path.
//!
//! The listing has two paths. Without a search term the store filters, orders
//! and windows the products itself. With a search term every candidate is
//! fetched, ranked by relevance in memory, and windowed afterwards; `total`
//! still counts the base filter, so products matched only through tags or the
//! short description are counted without ever being listed.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use plantify_core::{DomainError, ProductId};
use plantify_products::{
    ListingQuery, NewReview, PaginationInfo, Product, ProductDraft, ProductSummary, rank,
};

use crate::store::{ProductStore, StoreError};

/// Error returned by every catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("product store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(_) => {
                Self::Domain(DomainError::conflict("Product with this SKU already exists"))
            }
            StoreError::NotFound => Self::Domain(DomainError::NotFound),
            other => Self::Store(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub data: Vec<ProductSummary>,
    pub pagination: PaginationInfo,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn ProductStore>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Filtered, sorted (or relevance-ranked), paginated listing.
    #[instrument(
        skip(self, query),
        fields(
            search = query.filter.search.as_ref().map(|t| t.as_str()),
            page = query.page.page,
            limit = query.page.limit,
        ),
        err
    )]
    pub async fn list(&self, query: &ListingQuery) -> CatalogResult<CatalogPage> {
        let filter = &query.filter;

        let (products, total) = match &filter.search {
            None => tokio::try_join!(
                self.store.find(filter, query.sort, query.page),
                self.store.count(filter),
            )?,
            Some(term) => {
                let (candidates, total) =
                    tokio::try_join!(self.store.candidates(filter), self.store.count(filter))?;
                let ranked = rank(candidates, term, query.sort);
                (query.page.slice(ranked), total)
            }
        };

        Ok(CatalogPage {
            data: products.into_iter().map(Product::into_summary).collect(),
            pagination: query.page.info(total),
        })
    }

    /// Active product with its reviews.
    #[instrument(skip(self), err)]
    pub async fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        match self.store.get(id).await? {
            Some(product) if product.is_active() => Ok(product),
            _ => Err(DomainError::NotFound.into()),
        }
    }

    #[instrument(skip(self, draft), fields(sku = draft.sku.as_deref()), err)]
    pub async fn create_product(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let product = draft.into_new_product(ProductId::new(), Utc::now())?;
        self.store.insert(product.clone()).await?;
        info!(product_id = %product.summary.id, sku = %product.summary.sku, "product created");
        Ok(product)
    }

    /// Partial update. Inactive products can be updated (and re-activated).
    #[instrument(skip(self, patch), err)]
    pub async fn update_product(&self, id: ProductId, patch: ProductDraft) -> CatalogResult<Product> {
        let existing = self.load(id).await?;
        let updated = ProductDraft::apply_to(patch, &existing, Utc::now())?;
        self.store.replace(updated.clone()).await?;
        info!(product_id = %id, "product updated");
        Ok(updated)
    }

    /// Soft delete: the product stays stored with `isActive = false`.
    #[instrument(skip(self), err)]
    pub async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        let mut product = self.load(id).await?;
        product.deactivate(Utc::now());
        self.store.replace(product).await?;
        info!(product_id = %id, "product deactivated");
        Ok(())
    }

    #[instrument(skip(self, review), err)]
    pub async fn add_review(&self, id: ProductId, review: NewReview) -> CatalogResult<Product> {
        let mut product = self.load(id).await?;
        product.add_review(review, Utc::now())?;
        self.store.replace(product.clone()).await?;
        info!(
            product_id = %id,
            rating_average = product.summary.rating.average,
            rating_count = product.summary.rating.count,
            "review added"
        );
        Ok(product)
    }

    async fn load(&self, id: ProductId) -> CatalogResult<Product> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound.into())
    }
}

//! Startup seeding from a JSON array of product drafts.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use plantify_core::{DomainError, ValidationErrors};
use plantify_products::ProductDraft;

use crate::catalog::{CatalogError, CatalogService};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file {path} is not a JSON array of products: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed product {sku:?} is invalid: {errors}")]
    Invalid {
        sku: Option<String>,
        errors: ValidationErrors,
    },

    #[error(transparent)]
    Catalog(CatalogError),
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

pub fn load_seed_file(path: &Path) -> Result<Vec<ProductDraft>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Create every draft through the catalog. Drafts whose SKU is taken are skipped.
pub async fn seed_catalog(
    catalog: &CatalogService,
    drafts: Vec<ProductDraft>,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for draft in drafts {
        let sku = draft.sku.clone();
        match catalog.create_product(draft).await {
            Ok(_) => report.created += 1,
            Err(CatalogError::Domain(DomainError::Conflict(_))) => {
                warn!(sku = sku.as_deref(), "seed product already present; skipping");
                report.skipped += 1;
            }
            Err(CatalogError::Domain(DomainError::Validation(errors))) => {
                return Err(SeedError::Invalid { sku, errors });
            }
            Err(other) => return Err(SeedError::Catalog(other)),
        }
    }

    info!(created = report.created, skipped = report.skipped, "catalog seeded");
    Ok(report)
}

use std::sync::Arc;

use thiserror::Error;

use plantify_infra::{
    CatalogService, InMemoryProductStore, ProductStore,
    seed::{SeedError, SeedReport, load_seed_file, seed_catalog},
};

use crate::config::ApiConfig;

/// Services shared by every handler (injected through `Extension`).
#[derive(Debug, Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            catalog: CatalogService::new(store),
        }
    }

    /// Empty in-memory catalog (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Seed(#[from] SeedError),

    #[cfg(feature = "postgres")]
    #[error("postgres store unavailable: {0}")]
    Store(#[from] plantify_infra::StoreError),
}

/// Wire the product store (Postgres when configured, in-memory otherwise) and seed it.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StartupError> {
    let services = AppServices::new(build_store(config).await?);

    if let Some(path) = &config.seed_file {
        let drafts = load_seed_file(path)?;
        let SeedReport { created, skipped } = seed_catalog(&services.catalog, drafts).await?;
        tracing::info!(path = %path.display(), created, skipped, "seed file applied");
    }

    Ok(services)
}

#[cfg(feature = "postgres")]
async fn build_store(config: &ApiConfig) -> Result<Arc<dyn ProductStore>, StartupError> {
    use plantify_infra::PostgresProductStore;

    match &config.database_url {
        Some(url) => {
            let store = PostgresProductStore::connect(url).await?;
            store.migrate().await?;
            tracing::info!("using postgres product store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory product store");
            Ok(Arc::new(InMemoryProductStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_store(config: &ApiConfig) -> Result<Arc<dyn ProductStore>, StartupError> {
    if config.database_url.is_some() {
        tracing::warn!(
            "DATABASE_URL set but postgres feature not enabled, falling back to in-memory"
        );
    }
    Ok(Arc::new(InMemoryProductStore::new()))
}

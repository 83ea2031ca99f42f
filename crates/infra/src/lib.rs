//! Infrastructure layer: product storage, the catalog service, seeding.

pub mod catalog;
pub mod seed;
pub mod store;

pub use catalog::{CatalogError, CatalogPage, CatalogService};
pub use store::{InMemoryProductStore, ProductStore, StoreError, StoreResult};

#[cfg(feature = "postgres")]
pub use store::PostgresProductStore;

#[cfg(test)]
pub(crate) mod test_support;

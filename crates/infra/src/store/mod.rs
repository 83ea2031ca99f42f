//! Product store boundary.
//!
//! The catalog talks to its document collection through [`ProductStore`];
//! implementations decide how filters, ordering and windows are evaluated.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError, StoreResult};

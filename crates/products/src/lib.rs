//! Products domain module: the plant catalog.
//!
//! This crate contains business rules for products/catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage): product model and
//! validation, review ratings, listing filter/sort/pagination, and search relevance.

pub mod draft;
pub mod product;
pub mod query;
pub mod relevance;

pub use draft::ProductDraft;
pub use product::{
    Badge, CareInstructions, Category, Difficulty, NewReview, Product, ProductImages,
    ProductSummary, Rating, Review, Specifications,
};
pub use query::{
    ListingParams, ListingQuery, PageRequest, PaginationInfo, PriceRange, ProductFilter,
    SearchTerm, SortKey,
};
pub use relevance::{rank, relevance_score};

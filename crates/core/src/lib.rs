//! `plantify-core`: shared building blocks for the catalog crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, ValidationErrors};
pub use id::{ProductId, ReviewId, UserId};

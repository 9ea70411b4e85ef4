//! Business logic services.
//!
//! # Services
//!
//! - `catalog` - Category and product operations behind the picker endpoints
//!   (search limits, empty-query defaults, upstream failure policy)

pub mod catalog;

pub use catalog::CatalogService;

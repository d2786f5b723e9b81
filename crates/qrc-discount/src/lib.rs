//! QRC Discount
//!
//! Turns one page of the discount catalog into select options and resolves a
//! chosen discount id to its display code without another network call.
//!
//! # Architecture
//!
//! ```text
//! DiscountCatalog ──page──▶ DiscountResolver ──options──▶ select control
//!                                │   ▲
//!                           fill │   │ resolve(id)
//!                                ▼   │
//!                          DiscountCodeCache
//! ```
//!
//! Enable the `mock` feature to get `MockDiscountCatalog` in downstream tests.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod catalog;
pub mod error;
pub mod resolver;

pub use cache::{CacheStats, DiscountCodeCache};
#[cfg(any(test, feature = "mock"))]
pub use catalog::MockDiscountCatalog;
pub use catalog::{DiscountCatalog, DiscountRecord, GraphqlDiscountCatalog, DISCOUNTS_QUERY};
pub use error::CatalogError;
pub use resolver::{
    CatalogState, DiscountOption, DiscountResolver, DEFAULT_PAGE_SIZE, NO_DISCOUNT_LABEL,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

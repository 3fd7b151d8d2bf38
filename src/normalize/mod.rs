//! Normalization module for Catalog-Walker
//!
//! Pure functions shared by the walkers and the item extractor:
//! category-name canonicalization, origin and link resolution, and
//! physical-dimension parsing.

mod category;
mod dimension;
mod origin;

// Re-export main functions
pub use category::{canonicalize_categories, canonicalize_category};
pub use dimension::{parse_physical_dimension, Dimension};
pub use origin::{resolve_link, resolve_origin};

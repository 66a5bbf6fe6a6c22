//! Windows Module
//!
//! Core SKU table, product type decoding, and the version helper that
//! classifies Windows nodes from their collected attributes.

pub mod product_type;
pub mod sku;
pub mod version_helper;

pub use product_type::*;
pub use sku::*;
pub use version_helper::*;

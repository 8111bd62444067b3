//! Carts
//!
//! A user's cart and wishlist are sets of active line items. Lines are identified by product,
//! wishlist flag and the normalised set of selected attribute values, so adding the same
//! selection twice accumulates quantity on one line.

pub mod attributes;
pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;

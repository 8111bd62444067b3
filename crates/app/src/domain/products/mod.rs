//! Products
//!
//! The catalog read model the cart and checkout code depends on: products with stock and
//! pricing, their categories, and the attributes a shopper can pick values for.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;

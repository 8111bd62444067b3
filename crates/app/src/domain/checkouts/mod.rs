//! Checkouts
//!
//! Turns an explicit item list or a set of cart lines into a persisted order, attaches billing,
//! shipping and an optional coupon, and computes totals, all in one transaction. Order status
//! changes are recorded in an append-only history; payment status follows its own small state
//! machine and drives coupon usage accounting.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod totals;

pub use errors::CheckoutsServiceError;
pub use service::*;

//! Dashboard
//!
//! Sales and order statistics for the admin dashboard. Day and month boundaries are UTC.

pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod windows;

pub use errors::DashboardServiceError;
pub use service::*;

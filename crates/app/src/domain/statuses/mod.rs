//! Order Statuses
//!
//! Admin-defined workflow statuses an order moves through. The handful of statuses the order
//! pipeline relies on are addressed by [`records::WellKnownStatus`] and looked up through a
//! [`StatusResolver`], never by a hard-coded identifier.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod resolver;
pub mod service;

pub use errors::StatusesServiceError;
pub use resolver::StatusResolver;
pub use service::*;

//! Address Book
//!
//! Each user keeps at most one default shipping and one default billing address among their
//! non-deleted addresses. Earlier defaults are cleared in the same transaction that sets a new one.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::AddressesServiceError;
pub use service::*;

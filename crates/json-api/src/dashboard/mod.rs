//! Admin dashboard routes.

pub(crate) mod errors;
pub(crate) mod stats;

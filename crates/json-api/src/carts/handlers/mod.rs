//! Cart Handlers

pub(crate) mod add;
pub(crate) mod bulk_remove;
pub(crate) mod clear;
pub(crate) mod quantity;
pub(crate) mod remove;
pub(crate) mod summary;
pub(crate) mod wishlist;

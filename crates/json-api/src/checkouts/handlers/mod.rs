//! Customer Checkout Handlers

pub(crate) mod coupon_preview;
pub(crate) mod create;
pub(crate) mod create_from_cart;
pub(crate) mod get;
pub(crate) mod list;

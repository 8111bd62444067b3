//! Admin Checkout Handlers

pub(crate) mod cancel;
pub(crate) mod coupon_preview;
pub(crate) mod get;
pub(crate) mod history;
pub(crate) mod list;
pub(crate) mod payment;
pub(crate) mod status;

//! Coupons
//!
//! Coupon administration lives in [`service`]. Deciding whether a coupon applies to an order and
//! how much it takes off is the pure [`evaluator`], which never touches storage.

pub mod data;
pub mod errors;
pub mod evaluator;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::CouponsServiceError;
pub use evaluator::CouponRejection;
pub use service::*;

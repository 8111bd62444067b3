//! Storefront Domain Concerns

pub mod addresses;
pub mod carts;
pub mod checkouts;
pub(crate) mod columns;
pub mod coupons;
pub mod dashboard;
pub mod products;
pub mod shipping;
pub mod statuses;
pub mod users;

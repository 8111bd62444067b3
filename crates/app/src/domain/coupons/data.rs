//! Coupon Data

use jiff::Timestamp;

use crate::domain::{
    coupons::records::{CouponStatus, CouponUuid, Discount},
    products::records::{CategoryUuid, ProductUuid},
};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub campaign_name: String,
    pub description: Option<String>,
    pub discount: Discount,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub max_uses: Option<u64>,
    pub max_uses_per_user: u64,
    pub min_order_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub status: CouponStatus,
    pub scoped_products: Vec<ProductUuid>,
    pub scoped_categories: Vec<CategoryUuid>,
}

/// Partial coupon update. Unset fields keep their stored value, and scope sets are only
/// replaced when given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CouponUpdate {
    pub code: Option<String>,
    pub campaign_name: Option<String>,
    pub description: Option<Option<String>>,
    pub discount: Option<Discount>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub max_uses: Option<Option<u64>>,
    pub max_uses_per_user: Option<u64>,
    pub min_order_amount: Option<Option<u64>>,
    pub max_discount_amount: Option<Option<u64>>,
    pub status: Option<CouponStatus>,
    pub scoped_products: Option<Vec<ProductUuid>>,
    pub scoped_categories: Option<Vec<CategoryUuid>>,
}

impl CouponUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn campaign_name(mut self, campaign_name: impl Into<String>) -> Self {
        self.campaign_name = Some(campaign_name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }

    #[must_use]
    pub fn window(mut self, starts_at: Timestamp, ends_at: Timestamp) -> Self {
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self
    }

    #[must_use]
    pub fn starts_at(mut self, starts_at: Timestamp) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    #[must_use]
    pub fn ends_at(mut self, ends_at: Timestamp) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    #[must_use]
    pub fn max_uses(mut self, max_uses: Option<u64>) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    #[must_use]
    pub fn max_uses_per_user(mut self, max_uses_per_user: u64) -> Self {
        self.max_uses_per_user = Some(max_uses_per_user);
        self
    }

    #[must_use]
    pub fn min_order_amount(mut self, amount: Option<u64>) -> Self {
        self.min_order_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn max_discount_amount(mut self, amount: Option<u64>) -> Self {
        self.max_discount_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn status(mut self, status: CouponStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn scoped_products(mut self, products: Vec<ProductUuid>) -> Self {
        self.scoped_products = Some(products);
        self
    }

    #[must_use]
    pub fn scoped_categories(mut self, categories: Vec<CategoryUuid>) -> Self {
        self.scoped_categories = Some(categories);
        self
    }
}

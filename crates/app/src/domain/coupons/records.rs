//! Coupon Records

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        columns::UnknownVariant,
        products::records::{CategoryUuid, ProductUuid},
    },
    uuids::TypedUuid,
};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// What a coupon takes off an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Whole percent of the subtotal, `1..=100`.
    Percentage(u64),

    /// Fixed amount in minor units.
    Fixed(u64),
}

impl Discount {
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Percentage(_) => "percentage",
            Self::Fixed(_) => "fixed",
        }
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        match self {
            Self::Percentage(value) | Self::Fixed(value) => value,
        }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Percentage(percent) => percent >= 1 && percent <= 100,
            Self::Fixed(_) => true,
        }
    }

    pub(crate) fn from_parts(kind: &str, value: u64) -> Result<Self, UnknownVariant> {
        match kind {
            "percentage" => Ok(Self::Percentage(value)),
            "fixed" => Ok(Self::Fixed(value)),
            other => Err(UnknownVariant::new("discount kind", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[default]
    Active,
    Inactive,
}

impl CouponStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for CouponStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownVariant::new("coupon status", other)),
        }
    }
}

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub campaign_name: String,
    pub description: Option<String>,
    pub discount: Discount,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    /// `None` means unlimited.
    pub max_uses: Option<u64>,
    pub max_uses_per_user: u64,
    pub min_order_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub scoped_products: Vec<ProductUuid>,
    pub scoped_categories: Vec<CategoryUuid>,
    pub status: CouponStatus,
    pub usage_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CouponRecord {
    #[must_use]
    pub fn is_scoped(&self) -> bool {
        !self.scoped_products.is_empty() || !self.scoped_categories.is_empty()
    }
}

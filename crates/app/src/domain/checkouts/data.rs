//! Checkout Data

use std::str::FromStr;

use serde_json::Value;

use crate::domain::{
    addresses::records::AddressUuid,
    carts::{attributes::SelectedAttributes, records::CartItemUuid},
    checkouts::records::{CheckoutUuid, PaymentMethod, PaymentStatus},
    columns::UnknownVariant,
    products::records::ProductUuid,
    shipping::records::ShippingMethodUuid,
    users::UserUuid,
};

/// A line requested directly by the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckoutItem {
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    pub selected_attributes: SelectedAttributes,
}

/// Everything an order needs besides its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub billing_address: Option<AddressUuid>,
    pub shipping_address: AddressUuid,
    pub shipping_method: ShippingMethodUuid,
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

/// New Checkout Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckout {
    pub uuid: CheckoutUuid,
    pub items: Vec<NewCheckoutItem>,
    pub details: CheckoutDetails,
}

/// An order built from the shopper's active cart lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartCheckout {
    pub uuid: CheckoutUuid,
    pub cart_items: Vec<CartItemUuid>,
    pub details: CheckoutDetails,
}

/// Columns an order list may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutSort {
    #[default]
    CreatedAt,
    Total,
    OrderNumber,
}

impl CheckoutSort {
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "c.created_at",
            Self::Total => "c.total",
            Self::OrderNumber => "c.order_number",
        }
    }
}

impl FromStr for CheckoutSort {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "total" => Ok(Self::Total),
            "orderNumber" | "order_number" => Ok(Self::OrderNumber),
            other => Err(UnknownVariant::new("sort column", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub(crate) const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(UnknownVariant::new("sort direction", value)),
        }
    }
}

/// Filter, order and page for listing orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutListQuery {
    pub user: Option<UserUuid>,
    pub sort: CheckoutSort,
    pub direction: SortDirection,
    pub limit: u64,
    pub offset: u64,
}

impl CheckoutListQuery {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_user(mut self, user: UserUuid) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: CheckoutSort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Clamp the page size to `1..=100`.
    #[must_use]
    pub fn page(mut self, limit: u64, offset: u64) -> Self {
        self.limit = limit.clamp(1, Self::MAX_LIMIT);
        self.offset = offset;
        self
    }
}

impl Default for CheckoutListQuery {
    fn default() -> Self {
        Self {
            user: None,
            sort: CheckoutSort::default(),
            direction: SortDirection::default(),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Extra information recorded with a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChange {
    pub title: Option<String>,
    pub note: Option<String>,
    pub created_by: Option<UserUuid>,
}

/// A payment status reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    pub details: Option<Value>,
}

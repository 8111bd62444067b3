//! Checkout Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{
        addresses::records::AddressUuid,
        carts::attributes::SelectedAttributes,
        columns::UnknownVariant,
        coupons::records::CouponUuid,
        products::records::{CategoryUuid, ProductUuid},
        shipping::records::ShippingMethodUuid,
        statuses::records::{OrderStatusUuid, WellKnownStatus},
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Checkout UUID
pub type CheckoutUuid = TypedUuid<CheckoutRecord>;

/// Checkout Item UUID
pub type CheckoutItemUuid = TypedUuid<CheckoutItemRecord>;

/// Status History UUID
pub type StatusHistoryUuid = TypedUuid<StatusHistoryRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Cod,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Cod => "cod",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cod" => Ok(Self::Cod),
            other => Err(UnknownVariant::new("payment method", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Whether a payment may move from `self` to `next`. Repeating the current status is
    /// allowed and only replaces the payment details.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Pending | Self::Paid | Self::Failed)
                | (Self::Failed, Self::Failed | Self::Pending | Self::Paid)
                | (Self::Paid, Self::Paid | Self::Refunded)
                | (Self::Refunded, Self::Refunded)
        )
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownVariant::new("payment status", other)),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The product as it was when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    pub category_uuid: Option<CategoryUuid>,
}

/// Checkout Item Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemRecord {
    pub uuid: CheckoutItemUuid,
    pub checkout_uuid: CheckoutUuid,
    pub product: ProductSnapshot,
    pub unit_price: u64,
    pub quantity: u64,
    pub line_total: u64,
    pub selected_attributes: SelectedAttributes,
    pub created_at: Timestamp,
}

/// The order's current workflow status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStatus {
    pub uuid: OrderStatusUuid,
    pub code: String,
    pub title: String,
    pub is_terminal: bool,
}

impl CurrentStatus {
    #[must_use]
    pub fn is(&self, status: WellKnownStatus) -> bool {
        self.code == status.code()
    }
}

/// Checkout Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRecord {
    pub uuid: CheckoutUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub items: Vec<CheckoutItemRecord>,
    pub billing_address_uuid: AddressUuid,
    pub shipping_address_uuid: AddressUuid,
    pub shipping_method_uuid: ShippingMethodUuid,
    pub coupon_uuid: Option<CouponUuid>,
    pub subtotal: u64,
    pub shipping_charge: u64,
    pub discount: u64,
    pub tax: u64,
    pub total: u64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_details: Option<Value>,
    pub status: CurrentStatus,
    pub last_status_note: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub paid_at: Option<Timestamp>,
    pub canceled_at: Option<Timestamp>,
    pub refunded_at: Option<Timestamp>,
}

/// One entry of an order's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryRecord {
    pub uuid: StatusHistoryUuid,
    pub checkout_uuid: CheckoutUuid,
    pub status_uuid: OrderStatusUuid,
    pub status_code: String,
    pub status_title: String,
    pub title: Option<String>,
    pub note: Option<String>,
    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
}

/// What an order would cost with a coupon applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPreview {
    pub total: u64,
    pub discounted_total: u64,
}

/// One page of orders together with the number of orders matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPage {
    pub checkouts: Vec<CheckoutRecord>,
    pub total: u64,
}

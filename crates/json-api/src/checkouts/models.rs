//! Checkout request and response bodies.

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use storefront_app::domain::checkouts::{
    data::{CheckoutDetails, NewCheckoutItem},
    records::{
        CheckoutItemRecord, CheckoutPage, CheckoutRecord, CouponPreview, PaymentMethod,
        PaymentStatus, StatusHistoryRecord,
    },
};

use crate::carts::models::{
    SelectedAttributeBody, into_selected_attributes, selected_attribute_bodies,
};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentMethodBody {
    Cash,
    Card,
    BankTransfer,
    Cod,
}

impl From<PaymentMethodBody> for PaymentMethod {
    fn from(body: PaymentMethodBody) -> Self {
        match body {
            PaymentMethodBody::Cash => PaymentMethod::Cash,
            PaymentMethodBody::Card => PaymentMethod::Card,
            PaymentMethodBody::BankTransfer => PaymentMethod::BankTransfer,
            PaymentMethodBody::Cod => PaymentMethod::Cod,
        }
    }
}

impl From<PaymentMethod> for PaymentMethodBody {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Cod => Self::Cod,
        }
    }
}

/// Where the payment stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentStatusBody {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl From<PaymentStatusBody> for PaymentStatus {
    fn from(body: PaymentStatusBody) -> Self {
        match body {
            PaymentStatusBody::Pending => PaymentStatus::Pending,
            PaymentStatusBody::Paid => PaymentStatus::Paid,
            PaymentStatusBody::Failed => PaymentStatus::Failed,
            PaymentStatusBody::Refunded => PaymentStatus::Refunded,
        }
    }
}

impl From<PaymentStatus> for PaymentStatusBody {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Failed => Self::Failed,
            PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

/// Addresses, shipping, payment and coupon shared by both ways of placing an order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutDetailsBody {
    /// Defaults to the customer's default billing address
    #[serde(default)]
    pub billing_address_uuid: Option<Uuid>,

    pub shipping_address_uuid: Uuid,

    pub shipping_method_uuid: Uuid,

    pub payment_method: PaymentMethodBody,

    #[serde(default)]
    pub coupon_code: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CheckoutDetailsBody> for CheckoutDetails {
    fn from(body: CheckoutDetailsBody) -> Self {
        CheckoutDetails {
            billing_address: body.billing_address_uuid.map(Into::into),
            shipping_address: body.shipping_address_uuid.into(),
            shipping_method: body.shipping_method_uuid.into(),
            payment_method: body.payment_method.into(),
            coupon_code: body
                .coupon_code
                .map(|code| code.trim().to_owned())
                .filter(|code| !code.is_empty()),
            notes: body.notes,
        }
    }
}

/// A product to order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutItemBody {
    pub product_uuid: Uuid,

    pub quantity: u64,

    #[serde(default)]
    pub selected_attributes: Vec<SelectedAttributeBody>,
}

impl From<CheckoutItemBody> for NewCheckoutItem {
    fn from(body: CheckoutItemBody) -> Self {
        NewCheckoutItem {
            product_uuid: body.product_uuid.into(),
            quantity: body.quantity,
            selected_attributes: into_selected_attributes(body.selected_attributes),
        }
    }
}

/// Ordered line with the product as it was at checkout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    pub unit_price: u64,
    pub quantity: u64,
    pub line_total: u64,
    pub selected_attributes: Vec<SelectedAttributeBody>,
}

impl From<CheckoutItemRecord> for CheckoutItemResponse {
    fn from(item: CheckoutItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product.product_uuid.into_uuid(),
            name: item.product.name,
            sku: item.product.sku,
            image: item.product.image,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total,
            selected_attributes: selected_attribute_bodies(&item.selected_attributes),
        }
    }
}

/// Current workflow status of an order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderStatusResponse {
    pub uuid: Uuid,
    pub code: String,
    pub title: String,
    /// Whether the order can still move to another status
    pub is_terminal: bool,
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutResponse {
    pub uuid: Uuid,
    pub order_number: String,
    pub user_uuid: Uuid,
    pub items: Vec<CheckoutItemResponse>,
    pub billing_address_uuid: Uuid,
    pub shipping_address_uuid: Uuid,
    pub shipping_method_uuid: Uuid,
    pub coupon_uuid: Option<Uuid>,
    pub subtotal: u64,
    pub shipping_charge: u64,
    pub discount: u64,
    pub tax: u64,
    pub total: u64,
    pub payment_method: PaymentMethodBody,
    pub payment_status: PaymentStatusBody,
    pub payment_details: Option<Value>,
    pub status: OrderStatusResponse,
    pub last_status_note: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub paid_at: Option<String>,
    pub canceled_at: Option<String>,
    pub refunded_at: Option<String>,
}

impl From<CheckoutRecord> for CheckoutResponse {
    fn from(checkout: CheckoutRecord) -> Self {
        Self {
            uuid: checkout.uuid.into_uuid(),
            order_number: checkout.order_number,
            user_uuid: checkout.user_uuid.into_uuid(),
            items: checkout.items.into_iter().map(Into::into).collect(),
            billing_address_uuid: checkout.billing_address_uuid.into_uuid(),
            shipping_address_uuid: checkout.shipping_address_uuid.into_uuid(),
            shipping_method_uuid: checkout.shipping_method_uuid.into_uuid(),
            coupon_uuid: checkout.coupon_uuid.map(Into::into),
            subtotal: checkout.subtotal,
            shipping_charge: checkout.shipping_charge,
            discount: checkout.discount,
            tax: checkout.tax,
            total: checkout.total,
            payment_method: checkout.payment_method.into(),
            payment_status: checkout.payment_status.into(),
            payment_details: checkout.payment_details,
            status: OrderStatusResponse {
                uuid: checkout.status.uuid.into_uuid(),
                code: checkout.status.code,
                title: checkout.status.title,
                is_terminal: checkout.status.is_terminal,
            },
            last_status_note: checkout.last_status_note,
            notes: checkout.notes,
            created_at: checkout.created_at.to_string(),
            updated_at: checkout.updated_at.to_string(),
            paid_at: checkout.paid_at.as_ref().map(ToString::to_string),
            canceled_at: checkout.canceled_at.as_ref().map(ToString::to_string),
            refunded_at: checkout.refunded_at.as_ref().map(ToString::to_string),
        }
    }
}

/// One page of orders
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutPageResponse {
    pub checkouts: Vec<CheckoutResponse>,
    /// Orders matching the filter across all pages
    pub total: u64,
}

impl From<CheckoutPage> for CheckoutPageResponse {
    fn from(page: CheckoutPage) -> Self {
        Self {
            checkouts: page.checkouts.into_iter().map(Into::into).collect(),
            total: page.total,
        }
    }
}

/// Status History Entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusHistoryResponse {
    pub uuid: Uuid,
    pub status_uuid: Uuid,
    pub status_code: String,
    pub status_title: String,
    pub title: Option<String>,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: String,
}

impl From<StatusHistoryRecord> for StatusHistoryResponse {
    fn from(entry: StatusHistoryRecord) -> Self {
        Self {
            uuid: entry.uuid.into_uuid(),
            status_uuid: entry.status_uuid.into_uuid(),
            status_code: entry.status_code,
            status_title: entry.status_title,
            title: entry.title,
            note: entry.note,
            created_by: entry.created_by.map(Into::into),
            created_at: entry.created_at.to_string(),
        }
    }
}

/// Coupon Preview Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponPreviewResponse {
    /// Subtotal plus shipping
    pub total: u64,

    /// Total after the coupon's discount
    pub discounted_total: u64,
}

impl From<CouponPreview> for CouponPreviewResponse {
    fn from(preview: CouponPreview) -> Self {
        Self {
            total: preview.total,
            discounted_total: preview.discounted_total,
        }
    }
}

//! Cart Records

use jiff::Timestamp;
use serde::Serialize;

use crate::{
    domain::{
        carts::attributes::SelectedAttributes, products::records::ProductUuid, users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    /// Effective product price when the line was last priced.
    pub unit_price: u64,
    pub line_total: u64,
    pub selected_attributes: SelectedAttributes,
    pub is_wishlist: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined with the product details shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummaryLine {
    #[serde(flatten)]
    pub item: CartItemRecord,
    pub product_name: String,
    pub product_sku: String,
    pub product_image: Option<String>,
    pub available_stock: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartSummaryLine>,
    pub total_items: u64,
    pub subtotal: u64,
}

impl CartSummary {
    #[must_use]
    pub fn from_lines(items: Vec<CartSummaryLine>) -> Self {
        let total_items = items.iter().map(|line| line.item.quantity).sum();
        let subtotal = items.iter().map(|line| line.item.line_total).sum();

        Self {
            items,
            total_items,
            subtotal,
        }
    }
}

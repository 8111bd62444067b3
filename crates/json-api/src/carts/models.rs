//! Cart request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::{
    attributes::{SelectedAttribute, SelectedAttributes},
    records::{CartItemRecord, CartSummary, CartSummaryLine},
};

/// A chosen attribute value, e.g. size "M".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SelectedAttributeBody {
    pub attribute_uuid: Uuid,
    pub value_uuid: Uuid,
}

impl From<SelectedAttributeBody> for SelectedAttribute {
    fn from(body: SelectedAttributeBody) -> Self {
        SelectedAttribute {
            attribute_uuid: body.attribute_uuid.into(),
            value_uuid: body.value_uuid.into(),
        }
    }
}

impl From<&SelectedAttribute> for SelectedAttributeBody {
    fn from(selected: &SelectedAttribute) -> Self {
        Self {
            attribute_uuid: selected.attribute_uuid.into_uuid(),
            value_uuid: selected.value_uuid.into_uuid(),
        }
    }
}

pub(crate) fn into_selected_attributes(body: Vec<SelectedAttributeBody>) -> SelectedAttributes {
    SelectedAttributes::new(body.into_iter().map(SelectedAttribute::from))
}

pub(crate) fn selected_attribute_bodies(
    selected: &SelectedAttributes,
) -> Vec<SelectedAttributeBody> {
    selected.iter().map(SelectedAttributeBody::from).collect()
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub quantity: u64,

    /// Price of one unit when the line was last priced
    pub unit_price: u64,

    pub line_total: u64,

    pub selected_attributes: Vec<SelectedAttributeBody>,

    /// Whether the line sits in the wishlist rather than the cart
    pub is_wishlist: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
            selected_attributes: selected_attribute_bodies(&item.selected_attributes),
            is_wishlist: item.is_wishlist,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Cart line with the product details shown next to it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartSummaryLineResponse {
    pub item: CartItemResponse,
    pub product_name: String,
    pub product_sku: String,
    pub product_image: Option<String>,
    /// Stock currently available for the product
    pub available_stock: u64,
}

impl From<CartSummaryLine> for CartSummaryLineResponse {
    fn from(line: CartSummaryLine) -> Self {
        Self {
            item: line.item.into(),
            product_name: line.product_name,
            product_sku: line.product_sku,
            product_image: line.product_image,
            available_stock: line.available_stock,
        }
    }
}

/// Cart Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartSummaryResponse {
    /// Active lines, newest first
    pub items: Vec<CartSummaryLineResponse>,

    /// Sum of line quantities
    pub total_items: u64,

    /// Sum of line totals
    pub subtotal: u64,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            items: summary.items.into_iter().map(Into::into).collect(),
            total_items: summary.total_items,
            subtotal: summary.subtotal,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use jiff::Timestamp;

    use storefront_app::domain::{
        carts::{
            attributes::SelectedAttributes,
            records::{CartItemRecord, CartItemUuid},
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::TEST_USER_UUID;

    pub(crate) fn make_cart_item(uuid: CartItemUuid, quantity: u64) -> CartItemRecord {
        CartItemRecord {
            uuid,
            user_uuid: TEST_USER_UUID,
            product_uuid: ProductUuid::new(),
            quantity,
            unit_price: 250,
            line_total: 250 * quantity,
            selected_attributes: SelectedAttributes::default(),
            is_wishlist: false,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}

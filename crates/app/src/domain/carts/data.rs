//! Cart Data

use crate::domain::{
    carts::{attributes::SelectedAttributes, records::CartItemUuid},
    products::records::ProductUuid,
};

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Used only when no existing line matches and a new one is inserted.
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    pub selected_attributes: SelectedAttributes,
    pub is_wishlist: bool,
}

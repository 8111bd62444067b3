//! Shipping Method Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Shipping Method UUID
pub type ShippingMethodUuid = TypedUuid<ShippingMethodRecord>;

/// Shipping Method Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodRecord {
    pub uuid: ShippingMethodUuid,
    pub name: String,
    /// Flat charge added to every order using this method.
    pub charge: u64,
    pub is_active: bool,
    pub created_at: Timestamp,
}

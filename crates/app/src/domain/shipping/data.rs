//! Shipping Method Data

use crate::domain::shipping::records::ShippingMethodUuid;

/// New Shipping Method Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShippingMethod {
    pub uuid: ShippingMethodUuid,
    pub name: String,
    pub charge: u64,
    pub is_active: bool,
}

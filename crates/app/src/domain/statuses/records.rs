//! Order Status Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{domain::columns::UnknownVariant, uuids::TypedUuid};

/// Order Status UUID
pub type OrderStatusUuid = TypedUuid<OrderStatusRecord>;

/// Statuses the order pipeline itself needs to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl WellKnownStatus {
    /// The unique `code` the status is stored under.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for WellKnownStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant::new("order status", other)),
        }
    }
}

impl fmt::Display for WellKnownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Order Status Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusRecord {
    pub uuid: OrderStatusUuid,
    pub code: String,
    pub title: String,
    pub position: i32,
    pub is_terminal: bool,
    pub created_at: Timestamp,
}

impl OrderStatusRecord {
    /// Whether this record is the given well-known status.
    #[must_use]
    pub fn is(&self, status: WellKnownStatus) -> bool {
        self.code == status.code()
    }
}

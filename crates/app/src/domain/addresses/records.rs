//! Address Records

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{columns::UnknownVariant, users::UserUuid},
    uuids::TypedUuid,
};

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    #[default]
    Home,
    Work,
    Billing,
    Shipping,
    Other,
}

impl AddressKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Work => "work",
            Self::Billing => "billing",
            Self::Shipping => "shipping",
            Self::Other => "other",
        }
    }
}

impl FromStr for AddressKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "home" => Ok(Self::Home),
            "work" => Ok(Self::Work),
            "billing" => Ok(Self::Billing),
            "shipping" => Ok(Self::Shipping),
            "other" => Ok(Self::Other),
            other => Err(UnknownVariant::new("address kind", other)),
        }
    }
}

/// Which of the two per-user defaults an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultKind {
    Shipping,
    Billing,
}

impl DefaultKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Billing => "billing",
        }
    }
}

/// Address Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    pub kind: AddressKind,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub line_1: String,
    pub line_2: Option<String>,
    pub region: String,
    pub landmark: Option<String>,
    pub notes: Option<String>,
    pub is_default_shipping: bool,
    pub is_default_billing: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AddressRecord {
    #[must_use]
    pub fn is_default(&self, kind: DefaultKind) -> bool {
        match kind {
            DefaultKind::Shipping => self.is_default_shipping,
            DefaultKind::Billing => self.is_default_billing,
        }
    }
}

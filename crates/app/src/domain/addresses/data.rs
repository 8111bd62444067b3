//! Address Data

use crate::domain::addresses::records::{AddressKind, AddressUuid, DefaultKind};

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAddress {
    pub uuid: AddressUuid,
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
}

/// Partial address update. Only the fields that were set are written; optional columns can be
/// cleared by setting them to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressUpdate {
    pub kind: Option<AddressKind>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<Option<String>>,
    pub line_1: Option<String>,
    pub line_2: Option<Option<String>>,
    pub region: Option<String>,
    pub landmark: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub is_default_shipping: Option<bool>,
    pub is_default_billing: Option<bool>,
}

impl AddressUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: AddressKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
        self
    }

    #[must_use]
    pub fn line_1(mut self, line_1: impl Into<String>) -> Self {
        self.line_1 = Some(line_1.into());
        self
    }

    #[must_use]
    pub fn line_2(mut self, line_2: Option<String>) -> Self {
        self.line_2 = Some(line_2);
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn landmark(mut self, landmark: Option<String>) -> Self {
        self.landmark = Some(landmark);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn default_shipping(mut self, is_default: bool) -> Self {
        self.is_default_shipping = Some(is_default);
        self
    }

    #[must_use]
    pub fn default_billing(mut self, is_default: bool) -> Self {
        self.is_default_billing = Some(is_default);
        self
    }

    /// Defaults this update promotes the address to.
    pub(crate) fn promoted_defaults(&self) -> impl Iterator<Item = DefaultKind> + '_ {
        [
            (DefaultKind::Shipping, self.is_default_shipping),
            (DefaultKind::Billing, self.is_default_billing),
        ]
        .into_iter()
        .filter_map(|(kind, flag)| (flag == Some(true)).then_some(kind))
    }
}

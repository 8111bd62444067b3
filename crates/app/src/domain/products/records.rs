//! Product Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{domain::columns::UnknownVariant, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Category UUID
pub type CategoryUuid = TypedUuid<CategoryRecord>;

/// Attribute UUID
pub type AttributeUuid = TypedUuid<AttributeRecord>;

/// Attribute Value UUID
pub type AttributeValueUuid = TypedUuid<AttributeValueRecord>;

/// Stock availability as shown to shoppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    BackOrder,
    PreOrder,
}

impl StockStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::BackOrder => "back_order",
            Self::PreOrder => "pre_order",
        }
    }
}

impl FromStr for StockStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in_stock" => Ok(Self::InStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            "back_order" => Ok(Self::BackOrder),
            "pre_order" => Ok(Self::PreOrder),
            other => Err(UnknownVariant::new("stock status", other)),
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownVariant::new("product status", other)),
        }
    }
}

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub price: u64,
    pub discount_price: Option<u64>,
    pub total_stock: u64,
    pub stock_status: StockStatus,
    pub status: ProductStatus,
    pub category_uuid: Option<CategoryUuid>,
    pub feature_image: Option<String>,
    pub attributes: Vec<AttributeUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// The price a shopper pays right now: the discount price when one is set.
    #[must_use]
    pub fn effective_price(&self) -> u64 {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether the product can be put into a cart at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Active && self.stock_status == StockStatus::InStock
    }

    #[must_use]
    pub fn has_attribute(&self, attribute: AttributeUuid) -> bool {
        self.attributes.contains(&attribute)
    }
}

/// Category Record
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub uuid: CategoryUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Attribute Record
#[derive(Debug, Clone)]
pub struct AttributeRecord {
    pub uuid: AttributeUuid,
    pub name: String,
    pub values: Vec<AttributeValueRecord>,
    pub created_at: Timestamp,
}

/// Attribute Value Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValueRecord {
    pub uuid: AttributeValueUuid,
    pub attribute_uuid: AttributeUuid,
    pub value: String,
}

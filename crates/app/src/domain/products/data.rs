//! Products Data

use crate::domain::products::records::{
    AttributeUuid, AttributeValueUuid, CategoryUuid, ProductStatus, ProductUuid, StockStatus,
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
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
}

/// New Category Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: String,
}

/// New Attribute Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttribute {
    pub uuid: AttributeUuid,
    pub name: String,
    pub values: Vec<NewAttributeValue>,
}

/// New Attribute Value Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttributeValue {
    pub uuid: AttributeValueUuid,
    pub value: String,
}

//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    columns::{
        try_get_amount, try_get_enum, try_get_optional_amount, try_i64_from_u64,
        try_optional_i64_from_u64,
    },
    products::{
        data::NewProduct,
        records::{AttributeUuid, ProductRecord, ProductUuid, StockStatus},
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("../sql/create_product.sql");
const CREATE_PRODUCT_ATTRIBUTES_SQL: &str = include_str!("../sql/create_product_attributes.sql");
const GET_PRODUCT_SQL: &str = include_str!("../sql/get_product.sql");
const GET_PRODUCTS_SQL: &str = include_str!("../sql/get_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("../sql/count_products.sql");
const SET_STOCK_SQL: &str = include_str!("../sql/set_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let (created_at, updated_at): (SqlxTimestamp, SqlxTimestamp) =
            query_as(CREATE_PRODUCT_SQL)
                .bind(product.uuid)
                .bind(&product.name)
                .bind(&product.sku)
                .bind(try_i64_from_u64(product.price, "price")?)
                .bind(try_optional_i64_from_u64(
                    product.discount_price,
                    "discount_price",
                )?)
                .bind(try_i64_from_u64(product.total_stock, "total_stock")?)
                .bind(product.stock_status.as_str())
                .bind(product.status.as_str())
                .bind(product.category_uuid)
                .bind(&product.feature_image)
                .fetch_one(&mut **tx)
                .await?;

        if !product.attributes.is_empty() {
            let attribute_uuids: Vec<Uuid> = product
                .attributes
                .iter()
                .map(|attribute| attribute.into_uuid())
                .collect();

            query(CREATE_PRODUCT_ATTRIBUTES_SQL)
                .bind(product.uuid)
                .bind(&attribute_uuids)
                .execute(&mut **tx)
                .await?;
        }

        Ok(ProductRecord {
            uuid: product.uuid,
            name: product.name,
            sku: product.sku,
            price: product.price,
            discount_price: product.discount_price,
            total_stock: product.total_stock,
            stock_status: product.stock_status,
            status: product.status,
            category_uuid: product.category_uuid,
            feature_image: product.feature_image,
            attributes: product.attributes,
            created_at: created_at.to_jiff(),
            updated_at: updated_at.to_jiff(),
        })
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch every product in `products` that exists. Missing ids are simply absent from the
    /// result, so callers compare lengths to detect them.
    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        let records = query_as::<Postgres, ProductRecord>(GET_PRODUCTS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        debug!(
            requested = uuids.len(),
            found = records.len(),
            "resolved products"
        );

        Ok(records)
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        let count: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .bind(&uuids)
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }

    pub(crate) async fn set_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        total_stock: u64,
        stock_status: StockStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_STOCK_SQL)
            .bind(product)
            .bind(try_i64_from_u64(total_stock, "total_stock")?)
            .bind(stock_status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let attribute_uuids: Vec<Uuid> = row.try_get("attribute_uuids")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            price: try_get_amount(row, "price")?,
            discount_price: try_get_optional_amount(row, "discount_price")?,
            total_stock: try_get_amount(row, "total_stock")?,
            stock_status: try_get_enum(row, "stock_status")?,
            status: try_get_enum(row, "status")?,
            category_uuid: row.try_get("category_uuid")?,
            feature_image: row.try_get("feature_image")?,
            attributes: attribute_uuids
                .into_iter()
                .map(AttributeUuid::from_uuid)
                .collect(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

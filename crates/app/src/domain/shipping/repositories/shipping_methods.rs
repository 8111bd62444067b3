//! Shipping Methods Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    columns::{try_get_amount, try_i64_from_u64},
    shipping::{
        data::NewShippingMethod,
        records::{ShippingMethodRecord, ShippingMethodUuid},
    },
};

const CREATE_SHIPPING_METHOD_SQL: &str = include_str!("../sql/create_shipping_method.sql");
const LIST_SHIPPING_METHODS_SQL: &str = include_str!("../sql/list_shipping_methods.sql");
const GET_ACTIVE_SHIPPING_METHOD_SQL: &str =
    include_str!("../sql/get_active_shipping_method.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShippingMethodsRepository;

impl PgShippingMethodsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_shipping_method(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: NewShippingMethod,
    ) -> Result<ShippingMethodRecord, sqlx::Error> {
        query_as::<Postgres, ShippingMethodRecord>(CREATE_SHIPPING_METHOD_SQL)
            .bind(method.uuid)
            .bind(&method.name)
            .bind(try_i64_from_u64(method.charge, "charge")?)
            .bind(method.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_shipping_methods(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        active_only: bool,
    ) -> Result<Vec<ShippingMethodRecord>, sqlx::Error> {
        query_as::<Postgres, ShippingMethodRecord>(LIST_SHIPPING_METHODS_SQL)
            .bind(active_only)
            .fetch_all(&mut **tx)
            .await
    }

    /// Look up a method that can still be chosen for a new order.
    pub(crate) async fn get_active_shipping_method(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        method: ShippingMethodUuid,
    ) -> Result<Option<ShippingMethodRecord>, sqlx::Error> {
        query_as::<Postgres, ShippingMethodRecord>(GET_ACTIVE_SHIPPING_METHOD_SQL)
            .bind(method)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ShippingMethodRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            charge: try_get_amount(row, "charge")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

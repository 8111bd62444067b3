//! Dashboard Statistics Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    columns::{try_get_amount, try_i64_from_u64},
    dashboard::{
        records::{OrderCounts, SalesTotals},
        windows::ReportingWindows,
    },
    products::records::ProductUuid,
    statuses::records::WellKnownStatus,
};

const SALES_TOTALS_SQL: &str = include_str!("../sql/sales_totals.sql");
const ORDER_COUNTS_SQL: &str = include_str!("../sql/order_counts.sql");
const TOP_PRODUCTS_SQL: &str = include_str!("../sql/top_products.sql");

/// Aggregated order lines of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProductSales {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    pub total_value: u64,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatsRepository;

impl PgStatsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn sales_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        windows: &ReportingWindows,
    ) -> Result<SalesTotals, sqlx::Error> {
        query_as::<Postgres, SalesTotals>(SALES_TOTALS_SQL)
            .bind(SqlxTimestamp::from(windows.today))
            .bind(SqlxTimestamp::from(windows.yesterday))
            .bind(SqlxTimestamp::from(windows.this_month))
            .bind(SqlxTimestamp::from(windows.last_month))
            .bind(SqlxTimestamp::from(windows.now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn order_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<OrderCounts, sqlx::Error> {
        let processing = [
            WellKnownStatus::Pending.code(),
            WellKnownStatus::Processing.code(),
        ];

        query_as::<Postgres, OrderCounts>(ORDER_COUNTS_SQL)
            .bind(WellKnownStatus::Cancelled.code())
            .bind(&processing[..])
            .bind(WellKnownStatus::Delivered.code())
            .fetch_one(&mut **tx)
            .await
    }

    /// Products ordered since `since`, highest order value first.
    pub(crate) async fn top_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
        limit: u64,
    ) -> Result<Vec<ProductSales>, sqlx::Error> {
        query_as::<Postgres, ProductSales>(TOP_PRODUCTS_SQL)
            .bind(SqlxTimestamp::from(since))
            .bind(try_i64_from_u64(limit, "limit")?)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SalesTotals {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            today: try_get_amount(row, "today")?,
            yesterday: try_get_amount(row, "yesterday")?,
            this_month: try_get_amount(row, "this_month")?,
            last_month: try_get_amount(row, "last_month")?,
            all_time: try_get_amount(row, "all_time")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderCounts {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            total: try_get_amount(row, "total")?,
            cancelled: try_get_amount(row, "cancelled")?,
            processing: try_get_amount(row, "processing")?,
            delivered: try_get_amount(row, "delivered")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductSales {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: row.try_get("product_uuid")?,
            name: row.try_get("product_name")?,
            sku: row.try_get("product_sku")?,
            image: row.try_get("product_image")?,
            total_value: try_get_amount(row, "total_value")?,
            total_quantity: try_get_amount(row, "total_quantity")?,
        })
    }
}

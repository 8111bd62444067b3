//! Dashboard Stats Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::dashboard::records::{
    DashboardStats, OrderCounts, SalesTotals, TopProduct,
};

use crate::{dashboard::errors::into_status_error, extensions::*, state::State};

/// Order totals per period
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SalesResponse {
    pub today: u64,
    pub yesterday: u64,
    pub this_month: u64,
    pub last_month: u64,
    pub all_time: u64,
}

impl From<SalesTotals> for SalesResponse {
    fn from(sales: SalesTotals) -> Self {
        Self {
            today: sales.today,
            yesterday: sales.yesterday,
            this_month: sales.this_month,
            last_month: sales.last_month,
            all_time: sales.all_time,
        }
    }
}

/// Order counts by status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderCountsResponse {
    pub total: u64,
    pub cancelled: u64,
    /// Pending and processing orders
    pub processing: u64,
    pub delivered: u64,
}

impl From<OrderCounts> for OrderCountsResponse {
    fn from(counts: OrderCounts) -> Self {
        Self {
            total: counts.total,
            cancelled: counts.cancelled,
            processing: counts.processing,
            delivered: counts.delivered,
        }
    }
}

/// Best-selling product over the last three months
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TopProductResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    pub total_value: u64,
    pub total_quantity: u64,
    /// Percentage of the listed products' combined value
    pub ratio: f64,
}

impl From<TopProduct> for TopProductResponse {
    fn from(product: TopProduct) -> Self {
        Self {
            product_uuid: product.product_uuid.into_uuid(),
            name: product.name,
            sku: product.sku,
            image: product.image,
            total_value: product.total_value,
            total_quantity: product.total_quantity,
            ratio: product.ratio,
        }
    }
}

/// Dashboard Stats Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DashboardStatsResponse {
    pub sales: SalesResponse,
    pub orders: OrderCountsResponse,
    pub top_products: Vec<TopProductResponse>,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            sales: stats.sales.into(),
            orders: stats.orders.into(),
            top_products: stats.top_products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dashboard Stats Handler
///
/// Day and month boundaries are in UTC.
#[endpoint(
    tags("admin"),
    summary = "Sales Dashboard",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DashboardStatsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .dashboard
        .stats(Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}

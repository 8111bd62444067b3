//! Dashboard service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::Span;

use crate::{
    database::Db,
    domain::dashboard::{
        errors::DashboardServiceError,
        records::{DashboardStats, TopProduct, share_of},
        repositories::PgStatsRepository,
        windows::ReportingWindows,
    },
};

const TOP_PRODUCTS: u64 = 3;

#[derive(Debug, Clone)]
pub struct PgDashboardService {
    db: Db,
    stats: PgStatsRepository,
}

impl PgDashboardService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            stats: PgStatsRepository::new(),
        }
    }
}

#[async_trait]
impl DashboardService for PgDashboardService {
    #[tracing::instrument(
        name = "dashboard.service.stats",
        skip(self),
        fields(now = %now, total_orders = tracing::field::Empty),
        err
    )]
    async fn stats(&self, now: Timestamp) -> Result<DashboardStats, DashboardServiceError> {
        let windows = ReportingWindows::at(now)?;

        let mut tx = self.db.begin().await?;

        let sales = self.stats.sales_totals(&mut tx, &windows).await?;
        let orders = self.stats.order_counts(&mut tx).await?;
        let top = self
            .stats
            .top_products(&mut tx, windows.top_products_since, TOP_PRODUCTS)
            .await?;

        tx.commit().await?;

        Span::current().record("total_orders", orders.total);

        let top_sum = top
            .iter()
            .map(|product| product.total_value)
            .fold(0, u64::saturating_add);

        let top_products = top
            .into_iter()
            .map(|product| TopProduct {
                ratio: share_of(product.total_value, top_sum),
                product_uuid: product.product_uuid,
                name: product.name,
                sku: product.sku,
                image: product.image,
                total_value: product.total_value,
                total_quantity: product.total_quantity,
            })
            .collect();

        Ok(DashboardStats {
            sales,
            orders,
            top_products,
        })
    }
}

#[automock]
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Sales, order counts and best sellers as of `now`.
    async fn stats(&self, now: Timestamp) -> Result<DashboardStats, DashboardServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{checkouts::CheckoutsService, users::UserUuid},
        test::{
            TestContext,
            helpers::{
                checkout_details, create_address, create_product, create_shipping_method,
                new_checkout, new_checkout_item,
            },
        },
    };

    use super::*;

    #[tokio::test]
    async fn empty_store_has_zero_stats() -> TestResult {
        let ctx = TestContext::new().await;

        let stats = ctx.dashboard.stats(Timestamp::now()).await?;

        assert_eq!(stats.sales.all_time, 0);
        assert_eq!(stats.orders.total, 0);
        assert!(stats.top_products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn stats_cover_todays_orders_and_best_sellers() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let mug = create_product(&ctx, "SKU-MUG", 10, 100).await?;
        let tea = create_product(&ctx, "SKU-TEA", 5, 100).await?;
        let spoon = create_product(&ctx, "SKU-SPOON", 1, 100).await?;
        let cloth = create_product(&ctx, "SKU-CLOTH", 1, 100).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![
                        new_checkout_item(mug.uuid, 2),
                        new_checkout_item(tea.uuid, 2),
                        new_checkout_item(spoon.uuid, 5),
                    ],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        let cancelled = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(cloth.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        ctx.checkouts.cancel(cancelled.uuid, None).await?;

        let stats = ctx.dashboard.stats(Timestamp::now()).await?;

        assert_eq!(stats.sales.today, order.total + cancelled.total);
        assert_eq!(stats.sales.this_month, stats.sales.today);
        assert_eq!(stats.sales.all_time, 36);
        assert_eq!(stats.sales.yesterday, 0);

        assert_eq!(stats.orders.total, 2);
        assert_eq!(stats.orders.cancelled, 1);
        assert_eq!(stats.orders.processing, 1);
        assert_eq!(stats.orders.delivered, 0);

        let skus: Vec<&str> = stats
            .top_products
            .iter()
            .map(|product| product.sku.as_str())
            .collect();

        assert_eq!(skus, ["SKU-MUG", "SKU-TEA", "SKU-SPOON"]);
        assert_eq!(stats.top_products[0].total_value, 20);
        assert_eq!(stats.top_products[0].total_quantity, 2);
        assert!((stats.top_products[0].ratio - 57.14).abs() < f64::EPSILON);

        Ok(())
    }
}

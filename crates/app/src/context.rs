//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        checkouts::{CheckoutsService, PgCheckoutsService},
        coupons::{CouponsService, PgCouponsService},
        dashboard::{DashboardService, PgDashboardService},
        products::{PgProductsService, ProductsService},
        shipping::{PgShippingService, ShippingService},
        statuses::{PgStatusesService, StatusesService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub statuses: Arc<dyn StatusesService>,
    pub shipping: Arc<dyn ShippingService>,
    pub addresses: Arc<dyn AddressesService>,
    pub carts: Arc<dyn CartsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub checkouts: Arc<dyn CheckoutsService>,
    pub dashboard: Arc<dyn DashboardService>,
}

impl AppContext {
    /// Build every service over one shared pool.
    #[must_use]
    pub fn from_db(db: &Db) -> Self {
        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            statuses: Arc::new(PgStatusesService::new(db.clone())),
            shipping: Arc::new(PgShippingService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            checkouts: Arc::new(PgCheckoutsService::new(db.clone())),
            dashboard: Arc::new(PgDashboardService::new(db.clone())),
        }
    }

    /// Build application context from a database URL, applying pending migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        Ok(Self::from_db(&Db::new(pool)))
    }
}

//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        coupons::{
            data::{CouponUpdate, NewCoupon},
            errors::CouponsServiceError,
            records::{CouponRecord, CouponUuid},
            repositories::PgCouponsRepository,
        },
        products::{
            records::{CategoryUuid, ProductUuid},
            repositories::{PgCategoriesRepository, PgProductsRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    coupons: PgCouponsRepository,
    products: PgProductsRepository,
    categories: PgCategoriesRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            coupons: PgCouponsRepository::new(),
            products: PgProductsRepository::new(),
            categories: PgCategoriesRepository::new(),
        }
    }

    async fn ensure_scope_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: Option<&[ProductUuid]>,
        categories: Option<&[CategoryUuid]>,
    ) -> Result<(), CouponsServiceError> {
        if let Some(products) = products.filter(|products| !products.is_empty()) {
            let unique: Vec<ProductUuid> = dedup(products);

            if self.products.count_products(tx, &unique).await? != unique.len() as u64 {
                return Err(CouponsServiceError::InvalidReference);
            }
        }

        if let Some(categories) = categories.filter(|categories| !categories.is_empty()) {
            let unique: Vec<CategoryUuid> = dedup(categories);

            if self.categories.count_categories(tx, &unique).await? != unique.len() as u64 {
                return Err(CouponsServiceError::InvalidReference);
            }
        }

        Ok(())
    }
}

fn dedup<T: Copy + Eq + std::hash::Hash>(values: &[T]) -> Vec<T> {
    let mut seen = FxHashSet::default();

    values
        .iter()
        .copied()
        .filter(|value| seen.insert(*value))
        .collect()
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(coupon_uuid = %coupon.uuid, code = %coupon.code),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        if coupon.starts_at > coupon.ends_at {
            return Err(CouponsServiceError::InvalidWindow);
        }

        if !coupon.discount.is_valid() {
            return Err(CouponsServiceError::InvalidDiscount);
        }

        let mut tx = self.db.begin().await?;

        self.ensure_scope_exists(
            &mut tx,
            Some(&coupon.scoped_products),
            Some(&coupon.scoped_categories),
        )
        .await?;

        self.coupons.create_coupon(&mut tx, &coupon).await?;

        self.coupons
            .replace_scoped_products(&mut tx, coupon.uuid, &coupon.scoped_products)
            .await?;

        self.coupons
            .replace_scoped_categories(&mut tx, coupon.uuid, &coupon.scoped_categories)
            .await?;

        let created = self.coupons.get_coupon(&mut tx, coupon.uuid).await?;

        tx.commit().await?;

        info!(coupon_uuid = %created.uuid, code = %created.code, "created coupon");

        Ok(created)
    }

    #[tracing::instrument(
        name = "coupons.service.update_coupon",
        skip(self, update),
        fields(coupon_uuid = %coupon),
        err
    )]
    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self
            .coupons
            .lock_coupon(&mut tx, coupon)
            .await?
            .ok_or(CouponsServiceError::NotFound)?;

        let starts_at = update.starts_at.unwrap_or(existing.starts_at);
        let ends_at = update.ends_at.unwrap_or(existing.ends_at);

        if starts_at > ends_at {
            return Err(CouponsServiceError::InvalidWindow);
        }

        if update.discount.is_some_and(|discount| !discount.is_valid()) {
            return Err(CouponsServiceError::InvalidDiscount);
        }

        self.ensure_scope_exists(
            &mut tx,
            update.scoped_products.as_deref(),
            update.scoped_categories.as_deref(),
        )
        .await?;

        self.coupons.update_coupon(&mut tx, coupon, &update).await?;

        if let Some(products) = &update.scoped_products {
            self.coupons
                .replace_scoped_products(&mut tx, coupon, products)
                .await?;
        }

        if let Some(categories) = &update.scoped_categories {
            self.coupons
                .replace_scoped_categories(&mut tx, coupon, categories)
                .await?;
        }

        let updated = self.coupons.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        info!(coupon_uuid = %coupon, "updated coupon");

        Ok(updated)
    }

    #[tracing::instrument(name = "coupons.service.get_coupon_by_code", skip(self), err)]
    async fn get_coupon_by_code(&self, code: String) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self.coupons.get_coupon_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        Ok(coupon)
    }

    #[tracing::instrument(name = "coupons.service.get_coupon", skip(self), err)]
    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self.coupons.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(coupon)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Creates a coupon and its product and category scope.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Applies the fields set on `update`.
    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError>;

    async fn get_coupon_by_code(&self, code: String) -> Result<CouponRecord, CouponsServiceError>;

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError>;
}

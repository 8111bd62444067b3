//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    columns::{
        try_get_amount, try_get_enum, try_get_optional_amount, try_i64_from_u64,
        try_optional_i64_from_u64,
    },
    coupons::{
        data::{CouponUpdate, NewCoupon},
        records::{CouponRecord, CouponUuid, Discount},
    },
    products::records::{CategoryUuid, ProductUuid},
    users::UserUuid,
};

const GET_COUPON_SQL: &str = include_str!("../sql/get_coupon.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("../sql/get_coupon_by_code.sql");
const LOCK_COUPON_SQL: &str = include_str!("../sql/lock_coupon.sql");
const LOCK_COUPON_BY_CODE_SQL: &str = include_str!("../sql/lock_coupon_by_code.sql");
const CREATE_COUPON_SQL: &str = include_str!("../sql/create_coupon.sql");
const UPDATE_COUPON_SQL: &str = include_str!("../sql/update_coupon.sql");
const CREATE_COUPON_PRODUCTS_SQL: &str = include_str!("../sql/create_coupon_products.sql");
const CREATE_COUPON_CATEGORIES_SQL: &str = include_str!("../sql/create_coupon_categories.sql");
const DELETE_COUPON_PRODUCTS_SQL: &str = include_str!("../sql/delete_coupon_products.sql");
const DELETE_COUPON_CATEGORIES_SQL: &str = include_str!("../sql/delete_coupon_categories.sql");
const INCREMENT_USAGE_SQL: &str = include_str!("../sql/increment_usage.sql");
const DECREMENT_USAGE_SQL: &str = include_str!("../sql/decrement_usage.sql");
const COUNT_USER_PAID_USES_SQL: &str = include_str!("../sql/count_user_paid_uses.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_COUPON_SQL)
            .bind(coupon.uuid)
            .bind(&coupon.code)
            .bind(&coupon.campaign_name)
            .bind(&coupon.description)
            .bind(coupon.discount.kind())
            .bind(try_i64_from_u64(coupon.discount.value(), "discount_value")?)
            .bind(SqlxTimestamp::from(coupon.starts_at))
            .bind(SqlxTimestamp::from(coupon.ends_at))
            .bind(try_optional_i64_from_u64(coupon.max_uses, "max_uses")?)
            .bind(try_i64_from_u64(
                coupon.max_uses_per_user,
                "max_uses_per_user",
            )?)
            .bind(try_optional_i64_from_u64(
                coupon.min_order_amount,
                "min_order_amount",
            )?)
            .bind(try_optional_i64_from_u64(
                coupon.max_discount_amount,
                "max_discount_amount",
            )?)
            .bind(coupon.status.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        update: &CouponUpdate,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_COUPON_SQL)
            .bind(coupon)
            .bind(&update.code)
            .bind(&update.campaign_name)
            .bind(update.description.is_some())
            .bind(update.description.clone().flatten())
            .bind(update.discount.map(Discount::kind))
            .bind(try_optional_i64_from_u64(
                update.discount.map(Discount::value),
                "discount_value",
            )?)
            .bind(update.starts_at.map(SqlxTimestamp::from))
            .bind(update.ends_at.map(SqlxTimestamp::from))
            .bind(update.max_uses.is_some())
            .bind(try_optional_i64_from_u64(
                update.max_uses.flatten(),
                "max_uses",
            )?)
            .bind(try_optional_i64_from_u64(
                update.max_uses_per_user,
                "max_uses_per_user",
            )?)
            .bind(update.min_order_amount.is_some())
            .bind(try_optional_i64_from_u64(
                update.min_order_amount.flatten(),
                "min_order_amount",
            )?)
            .bind(update.max_discount_amount.is_some())
            .bind(try_optional_i64_from_u64(
                update.max_discount_amount.flatten(),
                "max_discount_amount",
            )?)
            .bind(update.status.map(|status| status.as_str()))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Replace the set of products the coupon is limited to.
    pub(crate) async fn replace_scoped_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        products: &[ProductUuid],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_COUPON_PRODUCTS_SQL)
            .bind(coupon)
            .execute(&mut **tx)
            .await?;

        if products.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        query(CREATE_COUPON_PRODUCTS_SQL)
            .bind(coupon)
            .bind(&uuids)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Replace the set of categories the coupon is limited to.
    pub(crate) async fn replace_scoped_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        categories: &[CategoryUuid],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_COUPON_CATEGORIES_SQL)
            .bind(coupon)
            .execute(&mut **tx)
            .await?;

        if categories.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = categories
            .iter()
            .map(|category| category.into_uuid())
            .collect();

        query(CREATE_COUPON_CATEGORIES_SQL)
            .bind(coupon)
            .bind(&uuids)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_SQL)
            .bind(coupon)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock a coupon row so concurrent checkouts using it run one after another.
    pub(crate) async fn lock_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LOCK_COUPON_SQL)
            .bind(coupon)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LOCK_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Take one use if the coupon has any left. Returns the rows updated, so zero means the
    /// global limit is already reached.
    pub(crate) async fn increment_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INCREMENT_USAGE_SQL)
            .bind(coupon)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Give back one use, never going below zero.
    pub(crate) async fn decrement_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_USAGE_SQL)
            .bind(coupon)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Paid orders by `user` that used `coupon`.
    pub(crate) async fn count_user_paid_uses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_PAID_USES_SQL)
            .bind(coupon)
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("discount_kind")?;
        let value = try_get_amount(row, "discount_value")?;

        let discount =
            Discount::from_parts(&kind, value).map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_kind".to_string(),
                source: Box::new(e),
            })?;

        let product_uuids: Vec<Uuid> = row.try_get("product_uuids")?;
        let category_uuids: Vec<Uuid> = row.try_get("category_uuids")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            code: row.try_get("code")?,
            campaign_name: row.try_get("campaign_name")?,
            description: row.try_get("description")?,
            discount,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            max_uses: try_get_optional_amount(row, "max_uses")?,
            max_uses_per_user: try_get_amount(row, "max_uses_per_user")?,
            min_order_amount: try_get_optional_amount(row, "min_order_amount")?,
            max_discount_amount: try_get_optional_amount(row, "max_discount_amount")?,
            scoped_products: product_uuids
                .into_iter()
                .map(ProductUuid::from_uuid)
                .collect(),
            scoped_categories: category_uuids
                .into_iter()
                .map(CategoryUuid::from_uuid)
                .collect(),
            status: try_get_enum(row, "status")?,
            usage_count: try_get_amount(row, "usage_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

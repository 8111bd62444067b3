//! Checkouts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::Value;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    addresses::records::AddressUuid,
    carts::attributes::{SelectedAttribute, SelectedAttributes},
    checkouts::{
        data::CheckoutListQuery,
        records::{
            CheckoutItemRecord, CheckoutItemUuid, CheckoutRecord, CheckoutUuid, CurrentStatus,
            PaymentMethod, PaymentStatus, ProductSnapshot,
        },
        totals::OrderTotals,
    },
    columns::{try_get_amount, try_get_enum, try_i64_from_u64},
    coupons::records::CouponUuid,
    shipping::records::ShippingMethodUuid,
    statuses::records::OrderStatusUuid,
    users::UserUuid,
};

const CREATE_CHECKOUT_SQL: &str = include_str!("../sql/create_checkout.sql");
const CREATE_CHECKOUT_ITEM_SQL: &str = include_str!("../sql/create_checkout_item.sql");
const GET_CHECKOUT_SQL: &str = include_str!("../sql/get_checkout.sql");
const GET_USER_CHECKOUT_SQL: &str = include_str!("../sql/get_user_checkout.sql");
const LOCK_CHECKOUT_SQL: &str = include_str!("../sql/lock_checkout.sql");
const LIST_CHECKOUTS_SQL: &str = include_str!("../sql/list_checkouts.sql");
const COUNT_CHECKOUTS_SQL: &str = include_str!("../sql/count_checkouts.sql");
const LIST_CHECKOUT_ITEMS_SQL: &str = include_str!("../sql/list_checkout_items.sql");
const UPDATE_TOTALS_SQL: &str = include_str!("../sql/update_totals.sql");
const UPDATE_STATUS_SQL: &str = include_str!("../sql/update_status.sql");
const UPDATE_PAYMENT_SQL: &str = include_str!("../sql/update_payment.sql");

/// Header columns of an order that is about to be inserted.
#[derive(Debug, Clone)]
pub(crate) struct PendingCheckout {
    pub uuid: CheckoutUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub billing_address_uuid: AddressUuid,
    pub shipping_address_uuid: AddressUuid,
    pub shipping_method_uuid: ShippingMethodUuid,
    pub coupon_uuid: Option<CouponUuid>,
    pub payment_method: PaymentMethod,
    pub status_uuid: OrderStatusUuid,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// A priced order line with its product snapshot, ready to insert.
#[derive(Debug, Clone)]
pub(crate) struct OrderLine {
    pub product: ProductSnapshot,
    pub unit_price: u64,
    pub quantity: u64,
    pub selected_attributes: SelectedAttributes,
}

impl OrderLine {
    pub(crate) fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// An order header joined with its current status, without lines.
#[derive(Debug, Clone)]
pub(crate) struct CheckoutHeader {
    pub uuid: CheckoutUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub billing_address_uuid: AddressUuid,
    pub shipping_address_uuid: AddressUuid,
    pub shipping_method_uuid: ShippingMethodUuid,
    pub coupon_uuid: Option<CouponUuid>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_details: Option<Value>,
    pub status: CurrentStatus,
    pub last_status_note: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub paid_at: Option<Timestamp>,
    pub canceled_at: Option<Timestamp>,
    pub refunded_at: Option<Timestamp>,
}

impl CheckoutHeader {
    pub(crate) fn into_record(self, items: Vec<CheckoutItemRecord>) -> CheckoutRecord {
        CheckoutRecord {
            uuid: self.uuid,
            order_number: self.order_number,
            user_uuid: self.user_uuid,
            items,
            billing_address_uuid: self.billing_address_uuid,
            shipping_address_uuid: self.shipping_address_uuid,
            shipping_method_uuid: self.shipping_method_uuid,
            coupon_uuid: self.coupon_uuid,
            subtotal: self.totals.subtotal,
            shipping_charge: self.totals.shipping_charge,
            discount: self.totals.discount,
            tax: self.totals.tax,
            total: self.totals.total,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            payment_details: self.payment_details,
            status: self.status,
            last_status_note: self.last_status_note,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            paid_at: self.paid_at,
            canceled_at: self.canceled_at,
            refunded_at: self.refunded_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCheckoutsRepository;

impl PgCheckoutsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: &PendingCheckout,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_CHECKOUT_SQL)
            .bind(checkout.uuid)
            .bind(&checkout.order_number)
            .bind(checkout.user_uuid)
            .bind(checkout.billing_address_uuid)
            .bind(checkout.shipping_address_uuid)
            .bind(checkout.shipping_method_uuid)
            .bind(checkout.coupon_uuid)
            .bind(checkout.payment_method.as_str())
            .bind(checkout.status_uuid)
            .bind(checkout.notes.as_deref())
            .bind(SqlxTimestamp::from(checkout.created_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_checkout_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
        lines: &[OrderLine],
    ) -> Result<(), sqlx::Error> {
        for line in lines {
            query(CREATE_CHECKOUT_ITEM_SQL)
                .bind(CheckoutItemUuid::new())
                .bind(checkout)
                .bind(line.product.product_uuid)
                .bind(&line.product.name)
                .bind(&line.product.sku)
                .bind(line.product.image.as_deref())
                .bind(line.product.category_uuid)
                .bind(try_i64_from_u64(line.unit_price, "unit_price")?)
                .bind(try_i64_from_u64(line.quantity, "quantity")?)
                .bind(try_i64_from_u64(line.line_total(), "line_total")?)
                .bind(Json(line.selected_attributes.as_slice()))
                .execute(&mut **tx)
                .await?;
        }

        debug!(lines = lines.len(), "inserted checkout items");

        Ok(())
    }

    pub(crate) async fn get_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutHeader, sqlx::Error> {
        query_as::<Postgres, CheckoutHeader>(GET_CHECKOUT_SQL)
            .bind(checkout)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutHeader, sqlx::Error> {
        query_as::<Postgres, CheckoutHeader>(GET_USER_CHECKOUT_SQL)
            .bind(checkout)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutHeader, sqlx::Error> {
        query_as::<Postgres, CheckoutHeader>(LOCK_CHECKOUT_SQL)
            .bind(checkout)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_checkouts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        list: &CheckoutListQuery,
    ) -> Result<Vec<CheckoutHeader>, sqlx::Error> {
        let order_by = format!(
            "{column} {direction}, c.uuid {direction}",
            column = list.sort.column(),
            direction = list.direction.keyword(),
        );
        let sql = LIST_CHECKOUTS_SQL.replace("{order_by}", &order_by);

        query_as::<Postgres, CheckoutHeader>(&sql)
            .bind(list.user)
            .bind(try_i64_from_u64(list.limit, "limit")?)
            .bind(try_i64_from_u64(list.offset, "offset")?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_checkouts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserUuid>,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_CHECKOUTS_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }

    pub(crate) async fn list_checkout_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkouts: &[CheckoutUuid],
    ) -> Result<Vec<CheckoutItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = checkouts
            .iter()
            .map(|checkout| checkout.into_uuid())
            .collect();

        query_as::<Postgres, CheckoutItemRecord>(LIST_CHECKOUT_ITEMS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
        totals: &OrderTotals,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_TOTALS_SQL)
            .bind(checkout)
            .bind(try_i64_from_u64(totals.subtotal, "subtotal")?)
            .bind(try_i64_from_u64(totals.shipping_charge, "shipping_charge")?)
            .bind(try_i64_from_u64(totals.discount, "discount")?)
            .bind(try_i64_from_u64(totals.tax, "tax")?)
            .bind(try_i64_from_u64(totals.total, "total")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Move an order to `status`. `cancelled` also stamps `canceled_at`.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
        status: OrderStatusUuid,
        note: Option<&str>,
        cancelled: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_STATUS_SQL)
            .bind(checkout)
            .bind(status)
            .bind(note)
            .bind(cancelled)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
        status: PaymentStatus,
        details: Option<&Value>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PAYMENT_SQL)
            .bind(checkout)
            .bind(status.as_str())
            .bind(details.map(Json))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn try_get_timestamp(row: &PgRow, col: &str) -> Result<Option<Timestamp>, sqlx::Error> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(col)?
        .map(|timestamp| timestamp.to_jiff()))
}

impl<'r> FromRow<'r, PgRow> for CheckoutHeader {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_details: Option<Json<Value>> = row.try_get("payment_details")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            order_number: row.try_get("order_number")?,
            user_uuid: row.try_get("user_uuid")?,
            billing_address_uuid: row.try_get("billing_address_uuid")?,
            shipping_address_uuid: row.try_get("shipping_address_uuid")?,
            shipping_method_uuid: row.try_get("shipping_method_uuid")?,
            coupon_uuid: row.try_get("coupon_uuid")?,
            totals: OrderTotals {
                subtotal: try_get_amount(row, "subtotal")?,
                shipping_charge: try_get_amount(row, "shipping_charge")?,
                discount: try_get_amount(row, "discount")?,
                tax: try_get_amount(row, "tax")?,
                total: try_get_amount(row, "total")?,
            },
            payment_method: try_get_enum(row, "payment_method")?,
            payment_status: try_get_enum(row, "payment_status")?,
            payment_details: payment_details.map(|Json(details)| details),
            status: CurrentStatus {
                uuid: row.try_get("status_uuid")?,
                code: row.try_get("status_code")?,
                title: row.try_get("status_title")?,
                is_terminal: row.try_get("status_is_terminal")?,
            },
            last_status_note: row.try_get("last_status_note")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            paid_at: try_get_timestamp(row, "paid_at")?,
            canceled_at: try_get_timestamp(row, "canceled_at")?,
            refunded_at: try_get_timestamp(row, "refunded_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CheckoutItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(selected): Json<Vec<SelectedAttribute>> = row.try_get("selected_attributes")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            checkout_uuid: row.try_get("checkout_uuid")?,
            product: ProductSnapshot {
                product_uuid: row.try_get("product_uuid")?,
                name: row.try_get("product_name")?,
                sku: row.try_get("product_sku")?,
                image: row.try_get("product_image")?,
                category_uuid: row.try_get("product_category_uuid")?,
            },
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_amount(row, "quantity")?,
            line_total: try_get_amount(row, "line_total")?,
            selected_attributes: SelectedAttributes::new(selected),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

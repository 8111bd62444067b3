//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    carts::{
        attributes::{SelectedAttribute, SelectedAttributes},
        data::NewCartItem,
        records::{CartItemRecord, CartItemUuid, CartSummaryLine},
    },
    columns::{try_get_amount, try_i64_from_u64},
    products::records::ProductUuid,
    users::UserUuid,
};

const LOCK_MATCHING_ITEMS_SQL: &str = include_str!("../sql/lock_matching_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");
const REPRICE_CART_ITEM_SQL: &str = include_str!("../sql/reprice_cart_item.sql");
const LOCK_CART_ITEM_SQL: &str = include_str!("../sql/lock_cart_item.sql");
const SET_WISHLIST_SQL: &str = include_str!("../sql/set_wishlist.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");
const CLEAR_CART_SQL: &str = include_str!("../sql/clear_cart.sql");
const GET_CART_SUMMARY_SQL: &str = include_str!("../sql/get_cart_summary.sql");
const LOCK_CHECKOUT_ITEMS_SQL: &str = include_str!("../sql/lock_checkout_items.sql");
const DEACTIVATE_CART_ITEMS_SQL: &str = include_str!("../sql/deactivate_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the user's active lines for a product on one side (cart or wishlist).
    pub(crate) async fn lock_matching_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        is_wishlist: bool,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(LOCK_MATCHING_ITEMS_SQL)
            .bind(user)
            .bind(product)
            .bind(is_wishlist)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: NewCartItem,
        unit_price: u64,
    ) -> Result<CartItemRecord, sqlx::Error> {
        let line_total = unit_price.saturating_mul(item.quantity);

        query_as::<Postgres, CartItemRecord>(CREATE_CART_ITEM_SQL)
            .bind(item.uuid)
            .bind(user)
            .bind(item.product_uuid)
            .bind(try_i64_from_u64(item.quantity, "quantity")?)
            .bind(try_i64_from_u64(unit_price, "unit_price")?)
            .bind(try_i64_from_u64(line_total, "line_total")?)
            .bind(Json(item.selected_attributes.as_slice()))
            .bind(item.selected_attributes.key())
            .bind(item.is_wishlist)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set a line's quantity and price it at `unit_price`.
    pub(crate) async fn reprice_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CartItemUuid,
        quantity: u64,
        unit_price: u64,
    ) -> Result<CartItemRecord, sqlx::Error> {
        let line_total = unit_price.saturating_mul(quantity);

        query_as::<Postgres, CartItemRecord>(REPRICE_CART_ITEM_SQL)
            .bind(item)
            .bind(try_i64_from_u64(quantity, "quantity")?)
            .bind(try_i64_from_u64(unit_price, "unit_price")?)
            .bind(try_i64_from_u64(line_total, "line_total")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartItemRecord, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(LOCK_CART_ITEM_SQL)
            .bind(item)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CartItemUuid,
        is_wishlist: bool,
    ) -> Result<CartItemRecord, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(SET_WISHLIST_SQL)
            .bind(item)
            .bind(is_wishlist)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        items: &[CartItemUuid],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        let rows_affected = query(DELETE_CART_ITEMS_SQL)
            .bind(&uuids)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        debug!(requested = uuids.len(), rows_affected, "deleted cart items");

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn get_cart_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        is_wishlist: bool,
    ) -> Result<Vec<CartSummaryLine>, sqlx::Error> {
        query_as::<Postgres, CartSummaryLine>(GET_CART_SUMMARY_SQL)
            .bind(user)
            .bind(is_wishlist)
            .fetch_all(&mut **tx)
            .await
    }

    /// Lock the given lines that can be turned into an order: owned by `user`, active and not
    /// on the wishlist. Lines failing any of those checks are absent from the result.
    pub(crate) async fn lock_checkout_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        items: &[CartItemUuid],
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        query_as::<Postgres, CartItemRecord>(LOCK_CHECKOUT_ITEMS_SQL)
            .bind(&uuids)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn deactivate_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[CartItemUuid],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        let rows_affected = query(DEACTIVATE_CART_ITEMS_SQL)
            .bind(&uuids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(selected): Json<Vec<SelectedAttribute>> = row.try_get("selected_attributes")?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            product_uuid: row.try_get("product_uuid")?,
            quantity: try_get_amount(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            line_total: try_get_amount(row, "line_total")?,
            selected_attributes: SelectedAttributes::new(selected),
            is_wishlist: row.try_get("is_wishlist")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartSummaryLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item: CartItemRecord::from_row(row)?,
            product_name: row.try_get("product_name")?,
            product_sku: row.try_get("product_sku")?,
            product_image: row.try_get("product_image")?,
            available_stock: try_get_amount(row, "available_stock")?,
        })
    }
}

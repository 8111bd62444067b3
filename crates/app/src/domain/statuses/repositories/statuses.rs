//! Order Statuses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::statuses::{
    data::NewOrderStatus,
    records::{OrderStatusRecord, OrderStatusUuid},
};

const LIST_STATUSES_SQL: &str = include_str!("../sql/list_statuses.sql");
const GET_STATUS_SQL: &str = include_str!("../sql/get_status.sql");
const FIND_STATUS_BY_CODE_SQL: &str = include_str!("../sql/find_status_by_code.sql");
const CREATE_STATUS_SQL: &str = include_str!("../sql/create_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatusesRepository;

impl PgStatusesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_statuses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderStatusRecord>, sqlx::Error> {
        query_as::<Postgres, OrderStatusRecord>(LIST_STATUSES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: OrderStatusUuid,
    ) -> Result<Option<OrderStatusRecord>, sqlx::Error> {
        query_as::<Postgres, OrderStatusRecord>(GET_STATUS_SQL)
            .bind(status)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_status_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<OrderStatusRecord, sqlx::Error> {
        query_as::<Postgres, OrderStatusRecord>(FIND_STATUS_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: NewOrderStatus,
    ) -> Result<OrderStatusRecord, sqlx::Error> {
        query_as::<Postgres, OrderStatusRecord>(CREATE_STATUS_SQL)
            .bind(OrderStatusUuid::new())
            .bind(&status.code)
            .bind(&status.title)
            .bind(status.position)
            .bind(status.is_terminal)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderStatusRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            code: row.try_get("code")?,
            title: row.try_get("title")?,
            position: row.try_get("position")?,
            is_terminal: row.try_get("is_terminal")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

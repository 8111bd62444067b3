//! Order Status History Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    checkouts::{
        data::StatusChange,
        records::{CheckoutUuid, StatusHistoryRecord, StatusHistoryUuid},
    },
    statuses::records::OrderStatusUuid,
};

const CREATE_STATUS_HISTORY_SQL: &str = include_str!("../sql/create_status_history.sql");
const LIST_STATUS_HISTORY_SQL: &str = include_str!("../sql/list_status_history.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatusHistoryRepository;

impl PgStatusHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_status_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
        status: OrderStatusUuid,
        change: &StatusChange,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_STATUS_HISTORY_SQL)
            .bind(StatusHistoryUuid::new())
            .bind(checkout)
            .bind(status)
            .bind(change.title.as_deref())
            .bind(change.note.as_deref())
            .bind(change.created_by)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// History of an order, newest entry first.
    pub(crate) async fn list_status_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: CheckoutUuid,
    ) -> Result<Vec<StatusHistoryRecord>, sqlx::Error> {
        query_as::<Postgres, StatusHistoryRecord>(LIST_STATUS_HISTORY_SQL)
            .bind(checkout)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StatusHistoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            checkout_uuid: row.try_get("checkout_uuid")?,
            status_uuid: row.try_get("status_uuid")?,
            status_code: row.try_get("status_code")?,
            status_title: row.try_get("status_title")?,
            title: row.try_get("title")?,
            note: row.try_get("note")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

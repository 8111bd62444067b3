//! Well-known status lookup.

use std::fmt::Debug;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::domain::statuses::{
    records::{OrderStatusRecord, WellKnownStatus},
    repositories::PgStatusesRepository,
};

/// Resolves a [`WellKnownStatus`] to the stored record inside the caller's transaction.
#[async_trait]
pub trait StatusResolver: Debug + Send + Sync {
    async fn resolve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: WellKnownStatus,
    ) -> Result<OrderStatusRecord, sqlx::Error>;
}

#[async_trait]
impl StatusResolver for PgStatusesRepository {
    async fn resolve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: WellKnownStatus,
    ) -> Result<OrderStatusRecord, sqlx::Error> {
        self.find_status_by_code(tx, status.code()).await
    }
}

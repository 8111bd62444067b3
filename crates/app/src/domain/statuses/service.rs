//! Order statuses service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::statuses::{
        data::NewOrderStatus, errors::StatusesServiceError, records::OrderStatusRecord,
        repositories::PgStatusesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgStatusesService {
    db: Db,
    repository: PgStatusesRepository,
}

impl PgStatusesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgStatusesRepository::new(),
        }
    }
}

#[async_trait]
impl StatusesService for PgStatusesService {
    #[tracing::instrument(name = "statuses.service.list_statuses", skip(self), err)]
    async fn list_statuses(&self) -> Result<Vec<OrderStatusRecord>, StatusesServiceError> {
        let mut tx = self.db.begin().await?;

        let statuses = self.repository.list_statuses(&mut tx).await?;

        tx.commit().await?;

        Ok(statuses)
    }

    #[tracing::instrument(
        name = "statuses.service.create_status",
        skip(self, status),
        fields(code = %status.code),
        err
    )]
    async fn create_status(
        &self,
        status: NewOrderStatus,
    ) -> Result<OrderStatusRecord, StatusesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_status(&mut tx, status).await?;

        tx.commit().await?;

        info!(status_uuid = %created.uuid, code = %created.code, "created order status");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait StatusesService: Send + Sync {
    /// All statuses in workflow order.
    async fn list_statuses(&self) -> Result<Vec<OrderStatusRecord>, StatusesServiceError>;

    /// Adds an admin-defined status to the workflow.
    async fn create_status(
        &self,
        status: NewOrderStatus,
    ) -> Result<OrderStatusRecord, StatusesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::statuses::{StatusResolver, records::WellKnownStatus},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn seeded_statuses_are_listed_in_workflow_order() -> TestResult {
        let ctx = TestContext::new().await;

        let codes: Vec<String> = ctx
            .statuses
            .list_statuses()
            .await?
            .into_iter()
            .map(|status| status.code)
            .collect();

        assert_eq!(
            codes,
            ["pending", "processing", "shipped", "delivered", "cancelled"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn created_status_slots_into_workflow() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .statuses
            .create_status(NewOrderStatus {
                code: "packed".to_string(),
                title: "Packed".to_string(),
                position: 25,
                is_terminal: false,
            })
            .await?;

        let statuses = ctx.statuses.list_statuses().await?;
        let position = statuses.iter().position(|status| status.uuid == created.uuid);

        assert_eq!(position, Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_code_returns_already_exists() {
        let ctx = TestContext::new().await;

        let result = ctx
            .statuses
            .create_status(NewOrderStatus {
                code: "pending".to_string(),
                title: "Pending again".to_string(),
                position: 11,
                is_terminal: false,
            })
            .await;

        assert!(
            matches!(result, Err(StatusesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );
    }

    #[tokio::test]
    async fn resolver_finds_terminal_statuses() -> TestResult {
        let ctx = TestContext::new().await;
        let resolver = PgStatusesRepository::new();

        let mut tx = ctx.db.begin_test_transaction().await;

        let cancelled = resolver.resolve(&mut tx, WellKnownStatus::Cancelled).await?;
        let pending = resolver.resolve(&mut tx, WellKnownStatus::Pending).await?;

        assert!(cancelled.is_terminal);
        assert!(cancelled.is(WellKnownStatus::Cancelled));
        assert!(!pending.is_terminal);

        Ok(())
    }
}

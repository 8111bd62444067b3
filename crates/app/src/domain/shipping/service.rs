//! Shipping service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::shipping::{
        data::NewShippingMethod, errors::ShippingServiceError, records::ShippingMethodRecord,
        repositories::PgShippingMethodsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgShippingService {
    db: Db,
    repository: PgShippingMethodsRepository,
}

impl PgShippingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgShippingMethodsRepository::new(),
        }
    }
}

#[async_trait]
impl ShippingService for PgShippingService {
    #[tracing::instrument(
        name = "shipping.service.create_shipping_method",
        skip(self, method),
        fields(shipping_method_uuid = %method.uuid, charge = method.charge),
        err
    )]
    async fn create_shipping_method(
        &self,
        method: NewShippingMethod,
    ) -> Result<ShippingMethodRecord, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_shipping_method(&mut tx, method)
            .await?;

        tx.commit().await?;

        info!(shipping_method_uuid = %created.uuid, "created shipping method");

        Ok(created)
    }

    #[tracing::instrument(name = "shipping.service.list_shipping_methods", skip(self), err)]
    async fn list_shipping_methods(
        &self,
        active_only: bool,
    ) -> Result<Vec<ShippingMethodRecord>, ShippingServiceError> {
        let mut tx = self.db.begin().await?;

        let methods = self
            .repository
            .list_shipping_methods(&mut tx, active_only)
            .await?;

        tx.commit().await?;

        Ok(methods)
    }
}

#[automock]
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Creates a shipping method with a flat charge.
    async fn create_shipping_method(
        &self,
        method: NewShippingMethod,
    ) -> Result<ShippingMethodRecord, ShippingServiceError>;

    /// Lists shipping methods, cheapest first.
    async fn list_shipping_methods(
        &self,
        active_only: bool,
    ) -> Result<Vec<ShippingMethodRecord>, ShippingServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::shipping::records::ShippingMethodUuid, test::TestContext};

    use super::*;

    fn method(name: &str, charge: u64, is_active: bool) -> NewShippingMethod {
        NewShippingMethod {
            uuid: ShippingMethodUuid::new(),
            name: name.to_string(),
            charge,
            is_active,
        }
    }

    #[tokio::test]
    async fn inactive_methods_are_hidden_when_requested() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping
            .create_shipping_method(method("Express", 12_00, true))
            .await?;
        ctx.shipping
            .create_shipping_method(method("Standard", 5_00, true))
            .await?;
        ctx.shipping
            .create_shipping_method(method("Pigeon", 1_00, false))
            .await?;

        let active: Vec<String> = ctx
            .shipping
            .list_shipping_methods(true)
            .await?
            .into_iter()
            .map(|method| method.name)
            .collect();

        assert_eq!(active, ["Standard", "Express"]);
        assert_eq!(ctx.shipping.list_shipping_methods(false).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping
            .create_shipping_method(method("Standard", 5_00, true))
            .await?;

        let result = ctx
            .shipping
            .create_shipping_method(method("Standard", 6_00, true))
            .await;

        assert!(
            matches!(result, Err(ShippingServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}

//! Get Own Checkout Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkouts::{errors::into_status_error, models::CheckoutResponse},
    extensions::*,
    state::State,
};

/// Get Own Checkout Handler
///
/// Orders belonging to someone else are reported as not found.
#[endpoint(
    tags("checkout"),
    summary = "Get Own Order",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .checkouts
        .get_user_checkout(user, checkout.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::checkouts::{
        CheckoutsServiceError, MockCheckoutsService, records::CheckoutUuid,
    };

    use crate::{
        checkouts::models::fixtures::make_checkout,
        test_helpers::{TEST_USER_UUID, checkouts_service},
    };

    use super::*;

    fn make_service(checkouts: MockCheckoutsService) -> Service {
        checkouts_service(
            checkouts,
            Router::with_path("user/checkout/{checkout}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_own_order_returns_200() -> TestResult {
        let uuid = CheckoutUuid::new();

        let mut checkouts = MockCheckoutsService::new();

        checkouts
            .expect_get_user_checkout()
            .once()
            .withf(move |user, checkout| *user == TEST_USER_UUID && *checkout == uuid)
            .return_once(move |_, _| Ok(make_checkout(uuid)));

        let mut res = TestClient::get(format!("http://example.com/user/checkout/{uuid}"))
            .send(&make_service(checkouts))
            .await;

        let order: CheckoutResponse = res.take_json().await?;

        assert_eq!(order.order_number, "ORD-1700000000123-DEADBEEF");

        Ok(())
    }

    #[tokio::test]
    async fn test_someone_elses_order_returns_404() -> TestResult {
        let mut checkouts = MockCheckoutsService::new();

        checkouts
            .expect_get_user_checkout()
            .once()
            .return_once(|_, _| Err(CheckoutsServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/user/checkout/{}",
            Uuid::now_v7()
        ))
        .send(&make_service(checkouts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}

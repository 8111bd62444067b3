//! Update Payment Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use storefront_app::domain::checkouts::data::PaymentUpdate;

use crate::{
    checkouts::{
        errors::into_status_error,
        models::{CheckoutResponse, PaymentStatusBody},
    },
    extensions::*,
    state::State,
};

/// Update Payment Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePaymentRequest {
    pub status: PaymentStatusBody,

    /// Provider payload to keep with the order
    #[serde(default)]
    pub details: Option<Value>,
}

impl From<UpdatePaymentRequest> for PaymentUpdate {
    fn from(request: UpdatePaymentRequest) -> Self {
        PaymentUpdate {
            status: request.status.into(),
            details: request.details,
        }
    }
}

/// Update Payment Status Handler
///
/// Records the outcome reported by the payment provider.
#[endpoint(
    tags("admin"),
    summary = "Update Payment Status",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Payment status cannot change this way"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkouts.update_payment",
    skip(checkout, json, depot),
    fields(checkout_uuid = tracing::field::Empty, payment_status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    json: JsonBody<UpdatePaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let checkout = checkout.into_inner();
    let update: PaymentUpdate = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("checkout_uuid", tracing::field::display(checkout));
    span.record("payment_status", update.status.as_str());

    let order = state
        .app
        .checkouts
        .update_payment_status(checkout.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::checkouts::{
        CheckoutsServiceError, MockCheckoutsService,
        records::{CheckoutUuid, PaymentStatus},
    };

    use crate::{
        checkouts::models::fixtures::make_checkout, test_helpers::admin_checkouts_service,
    };

    use super::*;

    fn make_service(checkouts: MockCheckoutsService) -> Service {
        admin_checkouts_service(
            checkouts,
            Router::with_path("admin/checkout/{checkout}/payment").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_mark_paid_forwards_details() -> TestResult {
        let uuid = CheckoutUuid::new();

        let mut checkouts = MockCheckoutsService::new();

        checkouts
            .expect_update_payment_status()
            .once()
            .withf(move |checkout, update| {
                *checkout == uuid
                    && update.status == PaymentStatus::Paid
                    && update.details == Some(json!({ "reference": "pi_123" }))
            })
            .return_once(move |_, _| {
                let mut order = make_checkout(uuid);
                order.payment_status = PaymentStatus::Paid;
                Ok(order)
            });

        let mut res = TestClient::patch(format!(
            "http://example.com/admin/checkout/{uuid}/payment"
        ))
        .json(&json!({ "status": "paid", "details": { "reference": "pi_123" } }))
        .send(&make_service(checkouts))
        .await;

        let order: CheckoutResponse = res.take_json().await?;

        assert_eq!(order.payment_status, PaymentStatusBody::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn test_refund_of_unpaid_order_returns_409() -> TestResult {
        let mut checkouts = MockCheckoutsService::new();

        checkouts
            .expect_update_payment_status()
            .once()
            .return_once(|_, _| {
                Err(CheckoutsServiceError::InvalidTransition(
                    "Payment status cannot change this way",
                ))
            });

        let res = TestClient::patch(format!(
            "http://example.com/admin/checkout/{}/payment",
            Uuid::now_v7()
        ))
        .json(&json!({ "status": "refunded" }))
        .send(&make_service(checkouts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_status_returns_400() -> TestResult {
        let mut checkouts = MockCheckoutsService::new();

        checkouts.expect_update_payment_status().never();

        let res = TestClient::patch(format!(
            "http://example.com/admin/checkout/{}/payment",
            Uuid::now_v7()
        ))
        .json(&json!({ "status": "lost" }))
        .send(&make_service(checkouts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

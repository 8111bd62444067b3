//! Cancel Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    checkouts::{errors::into_status_error, models::CheckoutResponse},
    extensions::*,
    state::State,
};

/// Cancel Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelCheckoutRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Cancel Checkout Handler
///
/// Cancelling an already cancelled order returns it unchanged.
#[endpoint(
    tags("admin"),
    summary = "Cancel Order",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order can no longer be cancelled"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkouts.cancel",
    skip(checkout, json, depot),
    fields(checkout_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    json: JsonBody<CancelCheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let checkout = checkout.into_inner();

    tracing::Span::current().record("checkout_uuid", tracing::field::display(checkout));

    let order = state
        .app
        .checkouts
        .cancel(checkout.into(), json.into_inner().reason)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

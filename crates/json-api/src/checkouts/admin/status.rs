//! Update Checkout Status Handler

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

use storefront_app::domain::checkouts::data::StatusChange;

use crate::{
    checkouts::{errors::into_status_error, models::CheckoutResponse},
    extensions::*,
    state::State,
};

/// Update Checkout Status Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest {
    /// Headline for the history entry
    #[serde(default)]
    pub title: Option<String>,

    /// Free-text note, also kept as the order's latest status note
    #[serde(default)]
    pub note: Option<String>,
}

/// Update Checkout Status Handler
///
/// Moves an order that is not yet delivered or cancelled to `status`.
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order status not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is already in a final status"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkouts.update_status",
    skip(checkout, status, json, depot),
    fields(
        checkout_uuid = tracing::field::Empty,
        status_uuid = tracing::field::Empty,
        admin_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    status: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.user_uuid_or_401()?;
    let checkout = checkout.into_inner();
    let status = status.into_inner();
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("checkout_uuid", tracing::field::display(checkout));
    span.record("status_uuid", tracing::field::display(status));
    span.record("admin_uuid", tracing::field::display(admin));

    let change = StatusChange {
        title: request.title,
        note: request.note,
        created_by: Some(admin),
    };

    let order = state
        .app
        .checkouts
        .update_status(checkout.into(), status.into(), change)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

//! Create Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::checkouts::{data::NewCheckout, records::CheckoutUuid};

use crate::{
    checkouts::{
        errors::into_status_error,
        models::{CheckoutDetailsBody, CheckoutItemBody, CheckoutResponse},
    },
    extensions::*,
    observability::record_checkout_created,
    state::State,
};

/// Create Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCheckoutRequest {
    /// Id for the new order; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub items: Vec<CheckoutItemBody>,

    #[serde(flatten)]
    pub details: CheckoutDetailsBody,
}

impl From<CreateCheckoutRequest> for NewCheckout {
    fn from(request: CreateCheckoutRequest) -> Self {
        NewCheckout {
            uuid: request
                .uuid
                .map_or_else(CheckoutUuid::new, CheckoutUuid::from_uuid),
            items: request.items.into_iter().map(Into::into).collect(),
            details: request.details.into(),
        }
    }
}

/// Create Checkout Handler
///
/// Places an order for the given products at their current price.
#[endpoint(
    tags("checkout"),
    summary = "Place Order",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid items, address, shipping method or coupon"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Coupon used up or order already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkouts.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        checkout_uuid = tracing::field::Empty,
        items_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let checkout: NewCheckout = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("checkout_uuid", tracing::field::display(checkout.uuid));
    span.record("items_count", checkout.items.len());

    let order = state
        .app
        .checkouts
        .create_checkout(user, checkout)
        .await
        .map_err(into_status_error)?;

    record_checkout_created("direct");

    res.add_header(LOCATION, format!("/user/checkout/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

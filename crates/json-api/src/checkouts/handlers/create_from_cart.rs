//! Create Checkout From Cart Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::records::CartItemUuid,
    checkouts::{data::CartCheckout, records::CheckoutUuid},
};

use crate::{
    checkouts::{
        errors::into_status_error,
        models::{CheckoutDetailsBody, CheckoutResponse},
    },
    extensions::*,
    observability::record_checkout_created,
    state::State,
};

/// Create Checkout From Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCartCheckoutRequest {
    /// Id for the new order; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,

    /// Cart lines to order
    pub cart_items: Vec<Uuid>,

    #[serde(flatten)]
    pub details: CheckoutDetailsBody,
}

impl From<CreateCartCheckoutRequest> for CartCheckout {
    fn from(request: CreateCartCheckoutRequest) -> Self {
        CartCheckout {
            uuid: request
                .uuid
                .map_or_else(CheckoutUuid::new, CheckoutUuid::from_uuid),
            cart_items: request
                .cart_items
                .into_iter()
                .map(CartItemUuid::from_uuid)
                .collect(),
            details: request.details.into(),
        }
    }
}

/// Create Checkout From Cart Handler
///
/// Orders the chosen cart lines at their cart price and takes them out of the cart.
#[endpoint(
    tags("checkout"),
    summary = "Place Order From Cart",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "No active cart items, or invalid address, shipping method or coupon"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Coupon used up or order already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkouts.create_from_cart",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        checkout_uuid = tracing::field::Empty,
        cart_items_count = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartCheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let checkout: CartCheckout = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("checkout_uuid", tracing::field::display(checkout.uuid));
    span.record("cart_items_count", checkout.cart_items.len());

    let order = state
        .app
        .checkouts
        .create_checkout_from_cart(user, checkout)
        .await
        .map_err(into_status_error)?;

    record_checkout_created("cart");

    res.add_header(LOCATION, format!("/user/checkout/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

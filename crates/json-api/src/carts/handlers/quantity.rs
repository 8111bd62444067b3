//! Update Cart Item Quantity Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartItemResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Quantity Handler
///
/// Replaces the quantity and reprices the line at the product's current price.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item Quantity",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.update_quantity",
    skip(line, quantity, depot),
    fields(cart_item_uuid = tracing::field::Empty, quantity = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    quantity: QueryParam<u64, true>,
    depot: &mut Depot,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let line = line.into_inner();
    let quantity = quantity.into_inner();

    let span = tracing::Span::current();

    span.record("cart_item_uuid", tracing::field::display(line));
    span.record("quantity", quantity);

    let item = state
        .app
        .carts
        .update_quantity(user, line.into(), quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(item.into()))
}

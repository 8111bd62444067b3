//! Get Checkout Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkouts::{errors::into_status_error, models::CheckoutResponse},
    extensions::*,
    state::State,
};

/// Get Checkout Handler
#[endpoint(
    tags("admin"),
    summary = "Get Order",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .checkouts
        .get_checkout(checkout.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

//! Checkout Status History Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkouts::{errors::into_status_error, models::StatusHistoryResponse},
    extensions::*,
    state::State,
};

/// Checkout Status History Handler
///
/// Returns the order's status changes, newest first.
#[endpoint(
    tags("admin"),
    summary = "Order Status History",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<StatusHistoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let history = state
        .app
        .checkouts
        .status_history(checkout.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(history.into_iter().map(Into::into).collect()))
}

//! Cart Summary Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    carts::{errors::into_status_error, models::CartSummaryResponse},
    extensions::*,
    state::State,
};

/// Cart Summary Handler
///
/// Returns the active cart lines, or the wishlist when `wishlist=true`.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(
    wishlist: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<CartSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let summary = state
        .app
        .carts
        .get_summary(user, wishlist.into_inner().unwrap_or(false))
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

//! Toggle Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Toggle Wishlist Handler
///
/// Moves a line from the cart to the wishlist or back.
#[endpoint(
    tags("cart"),
    summary = "Toggle Wishlist",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Line moved"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::CONFLICT, description = "Same selection already in the other list"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let item = state
        .app
        .carts
        .toggle_wishlist(user, line.into_inner().into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(cart_item_uuid = %item.uuid, is_wishlist = item.is_wishlist, "toggled wishlist");

    Ok(StatusCode::NO_CONTENT)
}

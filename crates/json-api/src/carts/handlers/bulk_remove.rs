//! Bulk Remove Cart Items Handler

use std::sync::Arc;

use salvo::prelude::*;

use storefront_app::domain::carts::records::CartItemUuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Bulk Remove Cart Items Handler
///
/// Takes the lines to remove as `cartIds=a,b,c`.
#[endpoint(
    tags("cart"),
    summary = "Remove Several Cart Items",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart items removed"),
        (status_code = StatusCode::NOT_FOUND, description = "None of the cart items were found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let raw = req
        .query::<String>("cartIds")
        .ok_or_else(|| StatusError::bad_request().brief("missing \"cartIds\" query parameter"))?;

    let items: Vec<CartItemUuid> = parse_uuid_list(&raw, "cartIds")?
        .into_iter()
        .map(CartItemUuid::from_uuid)
        .collect();

    let removed = state
        .app
        .carts
        .remove_items(user, items)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %user, removed, "removed cart items");

    Ok(StatusCode::NO_CONTENT)
}

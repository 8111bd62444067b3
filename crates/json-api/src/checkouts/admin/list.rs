//! List Checkouts Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkouts::{errors::into_status_error, models::CheckoutPageResponse, paging::list_query},
    extensions::*,
    state::State,
};

/// List Checkouts Handler
///
/// `sort` is one of `createdAt`, `total` or `orderNumber`. `limit` is capped at 100.
#[endpoint(
    tags("admin"),
    summary = "List Orders",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(
    user: QueryParam<Uuid, false>,
    sort: QueryParam<String, false>,
    direction: QueryParam<String, false>,
    limit: QueryParam<u64, false>,
    offset: QueryParam<u64, false>,
    depot: &mut Depot,
) -> Result<Json<CheckoutPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let mut query = list_query(
        sort.into_inner(),
        direction.into_inner(),
        limit.into_inner(),
        offset.into_inner(),
    )?;

    if let Some(user) = user.into_inner() {
        query = query.for_user(user.into());
    }

    let page = state
        .app
        .checkouts
        .list_checkouts(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

//! List Own Checkouts Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    checkouts::{errors::into_status_error, models::CheckoutPageResponse, paging::list_query},
    extensions::*,
    state::State,
};

/// List Own Checkouts Handler
///
/// The caller's orders only. Sorting and paging work as on the admin listing.
#[endpoint(
    tags("checkout"),
    summary = "List Own Orders",
    security(("user_uuid" = []))
)]
pub(crate) async fn handler(
    sort: QueryParam<String, false>,
    direction: QueryParam<String, false>,
    limit: QueryParam<u64, false>,
    offset: QueryParam<u64, false>,
    depot: &mut Depot,
) -> Result<Json<CheckoutPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let query = list_query(
        sort.into_inner(),
        direction.into_inner(),
        limit.into_inner(),
        offset.into_inner(),
    )?
    .for_user(user);

    let page = state
        .app
        .checkouts
        .list_checkouts(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

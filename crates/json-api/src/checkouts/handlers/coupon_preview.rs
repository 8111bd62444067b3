//! Preview Coupon On Own Checkout Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkouts::{errors::into_status_error, models::CouponPreviewResponse},
    extensions::*,
    state::State,
};

/// Preview Coupon On Own Checkout Handler
///
/// What the caller's order would cost with `coupon`. Orders belonging to someone else are
/// reported as not found.
#[endpoint(
    tags("checkout"),
    summary = "Preview Coupon On Own Order",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Preview computed"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or coupon not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Coupon does not apply to this order"),
        (status_code = StatusCode::CONFLICT, description = "Coupon used up"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    checkout: PathParam<Uuid>,
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponPreviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let preview = state
        .app
        .checkouts
        .preview_user_coupon(
            user,
            checkout.into_inner().into(),
            coupon.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(preview.into()))
}

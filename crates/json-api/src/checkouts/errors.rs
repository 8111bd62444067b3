//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::checkouts::CheckoutsServiceError;

use crate::observability::record_coupon_rejection;

pub(crate) fn into_status_error(error: CheckoutsServiceError) -> StatusError {
    match error {
        CheckoutsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Order already exists")
        }
        CheckoutsServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        CheckoutsServiceError::CouponNotFound => {
            StatusError::not_found().brief("Coupon not found")
        }
        CheckoutsServiceError::CouponRejected(rejection) => {
            record_coupon_rejection(rejection.reason());

            if rejection.is_exhausted() {
                StatusError::conflict().brief(rejection.to_string())
            } else {
                StatusError::bad_request().brief(rejection.to_string())
            }
        }
        CheckoutsServiceError::InvalidTransition(reason) => StatusError::conflict().brief(reason),
        CheckoutsServiceError::InvalidReference(reason)
        | CheckoutsServiceError::InvalidData(reason) => StatusError::bad_request().brief(reason),
        error @ (CheckoutsServiceError::MissingRequiredData
        | CheckoutsServiceError::NoActiveCartItems) => {
            StatusError::bad_request().brief(error.to_string())
        }
        CheckoutsServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

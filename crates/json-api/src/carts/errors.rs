//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Item already exists in the other list")
        }
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductUnavailable => {
            StatusError::not_found().brief("Product not found or unavailable")
        }
        CartsServiceError::EmptyCart => StatusError::not_found().brief("Cart is already empty"),
        error @ (CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData
        | CartsServiceError::QuantityExceedsStock
        | CartsServiceError::InvalidAttributes) => {
            StatusError::bad_request().brief(error.to_string())
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

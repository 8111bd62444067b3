//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::dashboard::DashboardServiceError;

pub(crate) fn into_status_error(error: DashboardServiceError) -> StatusError {
    match error {
        DashboardServiceError::Window(source) => {
            error!("failed to compute reporting windows: {source}");

            StatusError::internal_server_error()
        }
        DashboardServiceError::Sql(source) => {
            error!("dashboard storage error: {source}");

            StatusError::internal_server_error()
        }
        DashboardServiceError::NotFound => StatusError::not_found(),
        error @ (DashboardServiceError::AlreadyExists
        | DashboardServiceError::InvalidReference
        | DashboardServiceError::MissingRequiredData
        | DashboardServiceError::InvalidData) => {
            StatusError::bad_request().brief(error.to_string())
        }
    }
}

//! Checkouts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::coupons::CouponRejection;

#[derive(Debug, Error)]
pub enum CheckoutsServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("{0}")]
    InvalidReference(&'static str),

    #[error("missing required data")]
    MissingRequiredData,

    #[error("{0}")]
    InvalidData(&'static str),

    #[error("No active cart items found")]
    NoActiveCartItems,

    #[error("Coupon not found")]
    CouponNotFound,

    #[error(transparent)]
    CouponRejected(CouponRejection),

    #[error("{0}")]
    InvalidTransition(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => {
                Self::InvalidReference("related resource not found")
            }
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData("invalid order data"),
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<CouponRejection> for CheckoutsServiceError {
    fn from(rejection: CouponRejection) -> Self {
        Self::CouponRejected(rejection)
    }
}

//! Caller identity.

use std::{convert::Infallible, str::FromStr};

use salvo::http::HeaderMap;
use uuid::Uuid;

use storefront_app::domain::users::UserUuid;

pub(crate) const USER_UUID_HEADER: &str = "x-user-uuid";
pub(crate) const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Customer,
    Admin,
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("admin") {
            Ok(Self::Admin)
        } else {
            Ok(Self::Customer)
        }
    }
}

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) user: UserUuid,
    pub(crate) role: Role,
}

impl Identity {
    /// Read the identity headers. `None` when the user header is missing or not a uuid.
    pub(crate) fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let user = headers
            .get(USER_UUID_HEADER)?
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())?;

        let role = headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or(Role::Customer);

        Some(Self {
            user: UserUuid::from_uuid(user),
            role,
        })
    }

    pub(crate) fn is_admin(self) -> bool {
        self.role == Role::Admin
    }
}

//! Users
//!
//! Shoppers and admins are authenticated upstream. Only their identifier reaches this crate.

use crate::uuids::TypedUuid;

/// Marker for identifiers issued by the identity provider.
#[derive(Debug)]
pub enum User {}

/// User UUID
pub type UserUuid = TypedUuid<User>;

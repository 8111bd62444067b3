//! Authentication
//!
//! Users are authenticated upstream; the gateway forwards who they are in `x-user-uuid` and
//! `x-user-role`.

mod identity;
pub(crate) mod middleware;

pub(crate) use identity::*;

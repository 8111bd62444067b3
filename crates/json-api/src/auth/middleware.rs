//! Auth middleware.

use salvo::prelude::*;
use tracing::warn;

use crate::{auth::Identity, extensions::*};

/// Require a valid `x-user-uuid` and put the caller's identity in the depot.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(identity) = Identity::from_headers(req.headers()) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid x-user-uuid header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

/// Only let admins through. Runs after [`handler`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let identity = match depot.identity_or_401() {
        Ok(identity) => identity,
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    if !identity.is_admin() {
        warn!(user_uuid = %identity.user, path = %req.uri().path(), "non-admin denied");

        res.render(StatusError::forbidden().brief("Admin role required"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

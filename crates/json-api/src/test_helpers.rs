//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    context::AppContext,
    domain::{
        addresses::MockAddressesService, carts::MockCartsService,
        checkouts::MockCheckoutsService, coupons::MockCouponsService,
        dashboard::MockDashboardService, products::MockProductsService,
        shipping::MockShippingService, statuses::MockStatusesService, users::UserUuid,
    },
};

use crate::{
    auth::{Identity, Role},
    extensions::*,
    state::State,
};

pub(crate) const TEST_USER_UUID: UserUuid =
    UserUuid::from_uuid(Uuid::from_u128(0x0192_a5a0_0000_7000_8000_0000_0000_0001));

/// App context where every service is a mock with no expectations, so any call fails the test.
fn strict_app() -> AppContext {
    AppContext {
        products: Arc::new(MockProductsService::new()),
        statuses: Arc::new(MockStatusesService::new()),
        shipping: Arc::new(MockShippingService::new()),
        addresses: Arc::new(MockAddressesService::new()),
        carts: Arc::new(MockCartsService::new()),
        coupons: Arc::new(MockCouponsService::new()),
        checkouts: Arc::new(MockCheckoutsService::new()),
        dashboard: Arc::new(MockDashboardService::new()),
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(Identity {
        user: TEST_USER_UUID,
        role: Role::Customer,
    });

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(Identity {
        user: TEST_USER_UUID,
        role: Role::Admin,
    });

    ctrl.call_next(req, depot, res).await;
}

/// Injected state for full-router tests, with carts and dashboard supplied by the caller.
pub(crate) fn app_with(carts: MockCartsService, dashboard: MockDashboardService) -> Arc<State> {
    State::new(AppContext {
        carts: Arc::new(carts),
        dashboard: Arc::new(dashboard),
        ..strict_app()
    })
}

fn service(app: AppContext, identity: impl Handler, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::new(app)))
            .hoop(identity)
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    let app = AppContext {
        carts: Arc::new(carts),
        ..strict_app()
    };

    service(app, inject_customer, route)
}

pub(crate) fn checkouts_service(checkouts: MockCheckoutsService, route: Router) -> Service {
    let app = AppContext {
        checkouts: Arc::new(checkouts),
        ..strict_app()
    };

    service(app, inject_customer, route)
}

pub(crate) fn admin_checkouts_service(checkouts: MockCheckoutsService, route: Router) -> Service {
    let app = AppContext {
        checkouts: Arc::new(checkouts),
        ..strict_app()
    };

    service(app, inject_admin, route)
}

pub(crate) fn dashboard_service(dashboard: MockDashboardService, route: Router) -> Service {
    let app = AppContext {
        dashboard: Arc::new(dashboard),
        ..strict_app()
    };

    service(app, inject_admin, route)
}

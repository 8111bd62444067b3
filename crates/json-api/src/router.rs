//! App Router

use salvo::Router;

use crate::{auth, carts, checkouts, dashboard};

/// Every authenticated route. `/admin` additionally requires the admin role.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(cart_router())
        .push(
            Router::with_path("user/checkout")
                .get(checkouts::handlers::list::handler)
                .post(checkouts::handlers::create::handler)
                .push(Router::with_path("cart").post(checkouts::handlers::create_from_cart::handler))
                .push(
                    Router::with_path("{checkout}")
                        .get(checkouts::handlers::get::handler)
                        .push(
                            Router::with_path("coupon/{coupon}")
                                .get(checkouts::handlers::coupon_preview::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("admin")
                .hoop(auth::middleware::require_admin)
                .push(admin_checkout_router()),
        )
}

fn cart_router() -> Router {
    Router::with_path("cart")
        .get(carts::handlers::summary::handler)
        .post(carts::handlers::add::handler)
        .delete(carts::handlers::clear::handler)
        .push(Router::with_path("bulk").delete(carts::handlers::bulk_remove::handler))
        .push(
            Router::with_path("{line}")
                .delete(carts::handlers::remove::handler)
                .push(Router::with_path("quantity").patch(carts::handlers::quantity::handler))
                .push(Router::with_path("wishlist").patch(carts::handlers::wishlist::handler)),
        )
}

fn admin_checkout_router() -> Router {
    Router::with_path("checkout")
        .get(checkouts::admin::list::handler)
        .push(Router::with_path("stats").get(dashboard::stats::handler))
        .push(
            Router::with_path("{checkout}")
                .get(checkouts::admin::get::handler)
                .push(Router::with_path("status/{status}").patch(checkouts::admin::status::handler))
                .push(Router::with_path("payment").patch(checkouts::admin::payment::handler))
                .push(Router::with_path("cancel").patch(checkouts::admin::cancel::handler))
                .push(Router::with_path("history").get(checkouts::admin::history::handler))
                .push(
                    Router::with_path("coupon/{coupon}")
                        .get(checkouts::admin::coupon_preview::handler),
                ),
        )
}

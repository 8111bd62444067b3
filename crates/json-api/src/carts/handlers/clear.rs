//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
///
/// Removes every active cart line. The wishlist is left alone.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Cart cleared"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart is already empty"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let removed = state
        .app
        .carts
        .clear_cart(user)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %user, removed, "cleared cart");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::carts_service;

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").delete(handler))
    }

    #[tokio::test]
    async fn test_clear_returns_204() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_clear_cart().once().return_once(|_| Ok(3));

        let res = TestClient::delete("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_empty_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::EmptyCart));

        let res = TestClient::delete("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}

//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::{data::NewCartItem, records::CartItemUuid};

use crate::{
    carts::{
        errors::into_status_error,
        models::{CartItemResponse, SelectedAttributeBody, into_selected_attributes},
    },
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartItemRequest {
    /// Id for the line if a new one has to be created
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub product_uuid: Uuid,

    pub quantity: u64,

    #[serde(default)]
    pub selected_attributes: Vec<SelectedAttributeBody>,

    /// Add to the wishlist instead of the cart
    #[serde(default)]
    pub is_wishlist: bool,
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            uuid: request
                .uuid
                .map_or_else(CartItemUuid::new, CartItemUuid::from_uuid),
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
            selected_attributes: into_selected_attributes(request.selected_attributes),
            is_wishlist: request.is_wishlist,
        }
    }
}

/// Add Cart Item Handler
///
/// Adding a selection that is already in the list increases that line's quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("user_uuid" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart line created or merged"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found or unavailable"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Concurrent add of the same line"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.add",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        cart_item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let item: NewCartItem = json.into_inner().into();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("product_uuid", tracing::field::display(item.product_uuid));

    let line = state
        .app
        .carts
        .add_item(user, item)
        .await
        .map_err(into_status_error)?;

    span.record("cart_item_uuid", tracing::field::display(line.uuid));

    res.status_code(StatusCode::CREATED);

    Ok(Json(line.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::{
        carts::models::fixtures::make_cart_item,
        test_helpers::{TEST_USER_UUID, carts_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_returns_201_with_line() -> TestResult {
        let line = CartItemUuid::new();
        let product = Uuid::now_v7();
        let attribute = Uuid::now_v7();
        let value = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |user, item| {
                *user == TEST_USER_UUID
                    && item.uuid == line
                    && item.product_uuid.into_uuid() == product
                    && item.quantity == 2
                    && item.selected_attributes.len() == 1
                    && !item.is_wishlist
            })
            .return_once(move |_, _| Ok(make_cart_item(line, 2)));

        let mut res = TestClient::post("http://example.com/cart")
            .json(&json!({
                "uuid": line.into_uuid(),
                "productUuid": product,
                "quantity": 2,
                "selectedAttributes": [{ "attributeUuid": attribute, "valueUuid": value }],
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: CartItemResponse = res.take_json().await?;

        assert_eq!(body.uuid, line.into_uuid());
        assert_eq!(body.quantity, 2);
        assert_eq!(body.line_total, 500);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_unavailable_product_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductUnavailable));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productUuid": Uuid::now_v7(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_beyond_stock_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::QuantityExceedsStock));

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productUuid": Uuid::now_v7(), "quantity": 99 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_malformed_body_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let res = TestClient::post("http://example.com/cart")
            .json(&json!({ "productUuid": "nope" }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

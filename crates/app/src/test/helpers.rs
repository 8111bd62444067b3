//! Test Helpers

use jiff::{SignedDuration, Timestamp};

use crate::{
    domain::{
        addresses::{
            AddressesService, AddressesServiceError,
            data::NewAddress,
            records::{AddressRecord, AddressUuid},
        },
        carts::{
            attributes::{SelectedAttribute, SelectedAttributes},
            data::NewCartItem,
            records::CartItemUuid,
        },
        checkouts::{
            data::{CheckoutDetails, NewCheckout, NewCheckoutItem},
            records::{CheckoutUuid, PaymentMethod},
        },
        coupons::{
            data::NewCoupon,
            records::{CouponStatus, CouponUuid, Discount},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::{NewAttribute, NewAttributeValue, NewProduct},
            records::{
                AttributeRecord, AttributeUuid, AttributeValueUuid, ProductRecord, ProductStatus,
                ProductUuid, StockStatus,
            },
        },
        shipping::{
            ShippingService, ShippingServiceError,
            data::NewShippingMethod,
            records::{ShippingMethodRecord, ShippingMethodUuid},
        },
        statuses::{
            StatusesService, StatusesServiceError,
            records::{OrderStatusUuid, WellKnownStatus},
        },
        users::UserUuid,
    },
    test::TestContext,
};

pub(crate) fn new_product(sku: &str, price: u64, total_stock: u64) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: format!("Product {sku}"),
        sku: sku.to_string(),
        price,
        discount_price: None,
        total_stock,
        stock_status: StockStatus::InStock,
        status: ProductStatus::Active,
        category_uuid: None,
        feature_image: None,
        attributes: Vec::new(),
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    sku: &str,
    price: u64,
    total_stock: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(new_product(sku, price, total_stock))
        .await
}

/// A product offering a size and a colour, returned with one selectable value of each.
pub(crate) async fn create_sized_product(
    ctx: &TestContext,
    sku: &str,
    price: u64,
    total_stock: u64,
) -> Result<(ProductRecord, SelectedAttribute, SelectedAttribute), ProductsServiceError> {
    let size = ctx
        .products
        .create_attribute(NewAttribute {
            uuid: AttributeUuid::new(),
            name: format!("{sku} size"),
            values: vec![
                NewAttributeValue {
                    uuid: AttributeValueUuid::new(),
                    value: "M".to_string(),
                },
                NewAttributeValue {
                    uuid: AttributeValueUuid::new(),
                    value: "L".to_string(),
                },
            ],
        })
        .await?;

    let colour = ctx
        .products
        .create_attribute(NewAttribute {
            uuid: AttributeUuid::new(),
            name: format!("{sku} colour"),
            values: vec![NewAttributeValue {
                uuid: AttributeValueUuid::new(),
                value: "Red".to_string(),
            }],
        })
        .await?;

    let mut product = new_product(sku, price, total_stock);
    product.attributes = vec![size.uuid, colour.uuid];

    let product = ctx.products.create_product(product).await?;

    let selected = |attribute: &AttributeRecord| {
        attribute
            .values
            .first()
            .map(|value| SelectedAttribute {
                attribute_uuid: attribute.uuid,
                value_uuid: value.uuid,
            })
            .ok_or(ProductsServiceError::MissingRequiredData)
    };

    Ok((product, selected(&size)?, selected(&colour)?))
}

pub(crate) fn new_cart_item(product: ProductUuid, quantity: u64) -> NewCartItem {
    NewCartItem {
        uuid: CartItemUuid::new(),
        product_uuid: product,
        quantity,
        selected_attributes: SelectedAttributes::default(),
        is_wishlist: false,
    }
}

pub(crate) fn new_address(label: &str) -> NewAddress {
    NewAddress {
        uuid: AddressUuid::new(),
        full_name: format!("{label} Resident"),
        phone_number: "+44 20 7946 0000".to_string(),
        line_1: format!("1 {label} Street"),
        region: "London".to_string(),
        ..NewAddress::default()
    }
}

pub(crate) async fn create_address(
    ctx: &TestContext,
    user: UserUuid,
    label: &str,
) -> Result<AddressRecord, AddressesServiceError> {
    ctx.addresses.create_address(user, new_address(label)).await
}

pub(crate) async fn create_shipping_method(
    ctx: &TestContext,
    charge: u64,
) -> Result<ShippingMethodRecord, ShippingServiceError> {
    ctx.shipping
        .create_shipping_method(NewShippingMethod {
            uuid: ShippingMethodUuid::new(),
            name: format!("Courier {charge}"),
            charge,
            is_active: true,
        })
        .await
}

/// A coupon valid from a day ago until a day from now, once per user, no limits.
pub(crate) fn new_coupon(code: &str, discount: Discount) -> NewCoupon {
    let now = Timestamp::now();

    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        campaign_name: format!("{code} campaign"),
        description: None,
        discount,
        starts_at: now - SignedDuration::from_hours(24),
        ends_at: now + SignedDuration::from_hours(24),
        max_uses: None,
        max_uses_per_user: 1,
        min_order_amount: None,
        max_discount_amount: None,
        status: CouponStatus::Active,
        scoped_products: Vec::new(),
        scoped_categories: Vec::new(),
    }
}

pub(crate) fn new_checkout_item(product: ProductUuid, quantity: u64) -> NewCheckoutItem {
    NewCheckoutItem {
        product_uuid: product,
        quantity,
        selected_attributes: SelectedAttributes::default(),
    }
}

pub(crate) fn checkout_details(
    shipping_address: AddressUuid,
    shipping_method: ShippingMethodUuid,
) -> CheckoutDetails {
    CheckoutDetails {
        billing_address: None,
        shipping_address,
        shipping_method,
        payment_method: PaymentMethod::Card,
        coupon_code: None,
        notes: None,
    }
}

pub(crate) fn new_checkout(items: Vec<NewCheckoutItem>, details: CheckoutDetails) -> NewCheckout {
    NewCheckout {
        uuid: CheckoutUuid::new(),
        items,
        details,
    }
}

pub(crate) async fn status_uuid(
    ctx: &TestContext,
    status: WellKnownStatus,
) -> Result<OrderStatusUuid, StatusesServiceError> {
    ctx.statuses
        .list_statuses()
        .await?
        .into_iter()
        .find(|record| record.is(status))
        .map(|record| record.uuid)
        .ok_or(StatusesServiceError::NotFound)
}

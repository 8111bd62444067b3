//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{Span, debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            attributes::{SelectedAttributes, attributes_equal},
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartSummary},
            repositories::PgCartItemsRepository,
        },
        products::{
            records::{AttributeValueUuid, ProductRecord, ProductUuid},
            repositories::{PgAttributesRepository, PgProductsRepository},
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    items: PgCartItemsRepository,
    products: PgProductsRepository,
    attributes: PgAttributesRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items: PgCartItemsRepository::new(),
            products: PgProductsRepository::new(),
            attributes: PgAttributesRepository::new(),
        }
    }

    async fn purchasable_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, CartsServiceError> {
        self.products
            .get_products(tx, &[product])
            .await?
            .into_iter()
            .find(ProductRecord::is_available)
            .ok_or(CartsServiceError::ProductUnavailable)
    }

    /// Every selected value must exist, belong to the attribute it was selected for, and that
    /// attribute must be one the product offers.
    async fn validate_attributes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &ProductRecord,
        selected: &SelectedAttributes,
    ) -> Result<(), CartsServiceError> {
        if selected.is_empty() {
            return Ok(());
        }

        if selected.has_repeated_attribute() {
            return Err(CartsServiceError::InvalidAttributes);
        }

        let value_uuids: Vec<AttributeValueUuid> =
            selected.iter().map(|selected| selected.value_uuid).collect();

        let values: FxHashMap<_, _> = self
            .attributes
            .find_attribute_values(tx, &value_uuids)
            .await?
            .into_iter()
            .map(|value| (value.uuid, value.attribute_uuid))
            .collect();

        let valid = selected.iter().all(|selected| {
            values.get(&selected.value_uuid) == Some(&selected.attribute_uuid)
                && product.has_attribute(selected.attribute_uuid)
        });

        if valid {
            Ok(())
        } else {
            Err(CartsServiceError::InvalidAttributes)
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity,
            is_wishlist = item.is_wishlist,
            merged = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let product = self.purchasable_product(&mut tx, item.product_uuid).await?;

        if item.quantity > product.total_stock {
            return Err(CartsServiceError::QuantityExceedsStock);
        }

        self.validate_attributes(&mut tx, &product, &item.selected_attributes)
            .await?;

        let existing = self
            .items
            .lock_matching_items(&mut tx, user, item.product_uuid, item.is_wishlist)
            .await?
            .into_iter()
            .find(|line| {
                attributes_equal(
                    line.selected_attributes.as_slice(),
                    item.selected_attributes.as_slice(),
                )
            });

        Span::current().record("merged", existing.is_some());

        let line = match existing {
            Some(line) => {
                let quantity = line.quantity.saturating_add(item.quantity);

                if quantity > product.total_stock {
                    return Err(CartsServiceError::QuantityExceedsStock);
                }

                debug!(cart_item_uuid = %line.uuid, quantity, "merging into existing cart line");

                self.items
                    .reprice_cart_item(&mut tx, line.uuid, quantity, product.effective_price())
                    .await?
            }
            None => {
                self.items
                    .create_cart_item(&mut tx, user, item, product.effective_price())
                    .await?
            }
        };

        tx.commit().await?;

        info!(cart_item_uuid = %line.uuid, quantity = line.quantity, "added item to cart");

        Ok(line)
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn update_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u64,
    ) -> Result<CartItemRecord, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let line = self.items.lock_cart_item(&mut tx, user, item).await?;

        let product = self
            .products
            .get_products(&mut tx, &[line.product_uuid])
            .await?
            .into_iter()
            .next()
            .ok_or(CartsServiceError::ProductUnavailable)?;

        if quantity > product.total_stock {
            return Err(CartsServiceError::QuantityExceedsStock);
        }

        let line = self
            .items
            .reprice_cart_item(&mut tx, item, quantity, product.effective_price())
            .await?;

        tx.commit().await?;

        Ok(line)
    }

    #[tracing::instrument(
        name = "carts.service.toggle_wishlist",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn toggle_wishlist(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartItemRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let line = self.items.lock_cart_item(&mut tx, user, item).await?;

        let line = self
            .items
            .set_wishlist(&mut tx, item, !line.is_wishlist)
            .await?;

        tx.commit().await?;

        Ok(line)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.items.delete_cart_item(&mut tx, user, item).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.remove_items",
        skip(self, items),
        fields(user_uuid = %user, requested = items.len()),
        err
    )]
    async fn remove_items(
        &self,
        user: UserUuid,
        items: Vec<CartItemUuid>,
    ) -> Result<u64, CartsServiceError> {
        if items.is_empty() {
            return Err(CartsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let rows_affected = self.items.delete_cart_items(&mut tx, user, &items).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(rows_affected)
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self), fields(user_uuid = %user), err)]
    async fn clear_cart(&self, user: UserUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.items.clear_cart(&mut tx, user).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::EmptyCart);
        }

        tx.commit().await?;

        info!(rows_affected, "cleared cart");

        Ok(rows_affected)
    }

    #[tracing::instrument(name = "carts.service.get_summary", skip(self), fields(user_uuid = %user), err)]
    async fn get_summary(
        &self,
        user: UserUuid,
        is_wishlist: bool,
    ) -> Result<CartSummary, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let lines = self
            .items
            .get_cart_summary(&mut tx, user, is_wishlist)
            .await?;

        tx.commit().await?;

        Ok(CartSummary::from_lines(lines))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a product to the cart or wishlist, merging into an existing line with the same
    /// attribute selection.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Replace a line's quantity, repricing it at the product's current price.
    async fn update_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u64,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Move a line between the cart and the wishlist.
    async fn toggle_wishlist(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartItemRecord, CartsServiceError>;

    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<(), CartsServiceError>;

    /// Remove several lines at once, returning how many were removed.
    async fn remove_items(
        &self,
        user: UserUuid,
        items: Vec<CartItemUuid>,
    ) -> Result<u64, CartsServiceError>;

    /// Remove every active cart line, leaving the wishlist alone.
    async fn clear_cart(&self, user: UserUuid) -> Result<u64, CartsServiceError>;

    /// Active lines newest first, with item count and subtotal.
    async fn get_summary(
        &self,
        user: UserUuid,
        is_wishlist: bool,
    ) -> Result<CartSummary, CartsServiceError>;
}

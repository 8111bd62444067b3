//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        data::{NewAttribute, NewCategory, NewProduct},
        records::{AttributeRecord, CategoryRecord, ProductRecord, ProductUuid, StockStatus},
        repositories::{PgAttributesRepository, PgCategoriesRepository, PgProductsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    products: PgProductsRepository,
    categories: PgCategoriesRepository,
    attributes: PgAttributesRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            products: PgProductsRepository::new(),
            categories: PgCategoriesRepository::new(),
            attributes: PgAttributesRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(
        name = "products.service.create_category",
        skip(self, category),
        fields(category_uuid = %category.uuid),
        err
    )]
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.categories.create_category(&mut tx, category).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.create_attribute",
        skip(self, attribute),
        fields(attribute_uuid = %attribute.uuid, value_count = attribute.values.len()),
        err
    )]
    async fn create_attribute(
        &self,
        attribute: NewAttribute,
    ) -> Result<AttributeRecord, ProductsServiceError> {
        if attribute.values.is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.attributes.create_attribute(&mut tx, attribute).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, sku = %product.sku),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product
            .discount_price
            .is_some_and(|discount_price| discount_price > product.price)
        {
            return Err(ProductsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.products.create_product(&mut tx, product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    #[tracing::instrument(name = "products.service.get_product", skip(self), err)]
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.products.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(name = "products.service.set_stock", skip(self), err)]
    async fn set_stock(
        &self,
        product: ProductUuid,
        total_stock: u64,
        stock_status: StockStatus,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .products
            .set_stock(&mut tx, product, total_stock, stock_status)
            .await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Creates a category products and coupons can refer to.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, ProductsServiceError>;

    /// Creates an attribute together with its selectable values.
    async fn create_attribute(
        &self,
        attribute: NewAttribute,
    ) -> Result<AttributeRecord, ProductsServiceError>;

    /// Creates a product and links its attributes.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Replace the stock level and availability of a product.
    async fn set_stock(
        &self,
        product: ProductUuid,
        total_stock: u64,
        stock_status: StockStatus,
    ) -> Result<(), ProductsServiceError>;
}

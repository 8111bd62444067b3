//! Checkouts service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::{FxHashMap, FxHashSet};
use sqlx::{Postgres, Transaction};
use tracing::{Span, debug, info};

use crate::{
    database::Db,
    domain::{
        addresses::{records::DefaultKind, repositories::PgAddressesRepository},
        carts::repositories::PgCartItemsRepository,
        checkouts::{
            data::{
                CartCheckout, CheckoutDetails, CheckoutListQuery, NewCheckout, PaymentUpdate,
                StatusChange,
            },
            errors::CheckoutsServiceError,
            records::{
                CheckoutItemRecord, CheckoutPage, CheckoutRecord, CheckoutUuid, CouponPreview,
                PaymentStatus, ProductSnapshot, StatusHistoryRecord,
            },
            repositories::{
                CheckoutHeader, OrderLine, PendingCheckout, PgCheckoutsRepository,
                PgStatusHistoryRepository,
            },
            totals::{compute_totals, order_number},
        },
        coupons::{
            CouponRejection,
            evaluator::{
                EvaluationContext, EvaluationLine, applied_discount, order_total, subtotal,
                validate,
            },
            records::{CouponRecord, CouponUuid},
            repositories::PgCouponsRepository,
        },
        products::{
            records::{ProductRecord, ProductUuid},
            repositories::PgProductsRepository,
        },
        shipping::repositories::PgShippingMethodsRepository,
        statuses::{
            StatusResolver,
            records::{OrderStatusUuid, WellKnownStatus},
            repositories::PgStatusesRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCheckoutsService {
    db: Db,
    checkouts: PgCheckoutsRepository,
    history: PgStatusHistoryRepository,
    cart_items: PgCartItemsRepository,
    products: PgProductsRepository,
    addresses: PgAddressesRepository,
    shipping_methods: PgShippingMethodsRepository,
    coupons: PgCouponsRepository,
    statuses: PgStatusesRepository,
    resolver: Arc<dyn StatusResolver>,
}

impl PgCheckoutsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_resolver(db, Arc::new(PgStatusesRepository::new()))
    }

    /// Build the service with a custom lookup for the well-known workflow statuses.
    #[must_use]
    pub fn with_resolver(db: Db, resolver: Arc<dyn StatusResolver>) -> Self {
        Self {
            db,
            checkouts: PgCheckoutsRepository::new(),
            history: PgStatusHistoryRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            products: PgProductsRepository::new(),
            addresses: PgAddressesRepository::new(),
            shipping_methods: PgShippingMethodsRepository::new(),
            coupons: PgCouponsRepository::new(),
            statuses: PgStatusesRepository::new(),
            resolver,
        }
    }

    /// Load products for `uuids`, failing when any of them is missing.
    async fn resolve_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuids: &[ProductUuid],
    ) -> Result<FxHashMap<ProductUuid, ProductRecord>, CheckoutsServiceError> {
        let unique: Vec<ProductUuid> = uuids
            .iter()
            .copied()
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .products
            .get_products(tx, &unique)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        if products.len() != unique.len() {
            return Err(CheckoutsServiceError::InvalidReference(
                "Some products not found",
            ));
        }

        Ok(products)
    }

    /// Resolve everything around the lines, insert the order, check the coupon and persist
    /// totals. Any error leaves the caller's transaction to be dropped.
    async fn place_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        checkout: CheckoutUuid,
        lines: &[OrderLine],
        details: CheckoutDetails,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let shipping_address = self
            .addresses
            .find_address(tx, user, details.shipping_address)
            .await?
            .ok_or(CheckoutsServiceError::InvalidReference(
                "Shipping address not found",
            ))?;

        let billing_address = match details.billing_address {
            Some(billing) => self
                .addresses
                .find_address(tx, user, billing)
                .await?
                .ok_or(CheckoutsServiceError::InvalidReference(
                    "Billing address not found",
                ))?,
            None => self
                .addresses
                .get_default_address(tx, user, DefaultKind::Billing)
                .await?
                .ok_or(CheckoutsServiceError::InvalidReference(
                    "No billing address available",
                ))?,
        };

        let shipping_method = self
            .shipping_methods
            .get_active_shipping_method(tx, details.shipping_method)
            .await?
            .ok_or(CheckoutsServiceError::InvalidReference(
                "Shipping method not found",
            ))?;

        let coupon = match details.coupon_code.as_deref() {
            Some(code) => Some(
                self.coupons
                    .lock_coupon_by_code(tx, code)
                    .await?
                    .ok_or(CheckoutsServiceError::CouponNotFound)?,
            ),
            None => None,
        };

        let pending = self.resolver.resolve(tx, WellKnownStatus::Pending).await?;
        let created_at = Timestamp::now();

        self.checkouts
            .create_checkout(
                tx,
                &PendingCheckout {
                    uuid: checkout,
                    order_number: order_number(checkout, created_at),
                    user_uuid: user,
                    billing_address_uuid: billing_address.uuid,
                    shipping_address_uuid: shipping_address.uuid,
                    shipping_method_uuid: shipping_method.uuid,
                    coupon_uuid: coupon.as_ref().map(|coupon| coupon.uuid),
                    payment_method: details.payment_method,
                    status_uuid: pending.uuid,
                    notes: details.notes,
                    created_at,
                },
            )
            .await?;

        self.checkouts
            .create_checkout_items(tx, checkout, lines)
            .await?;

        let evaluation_lines = evaluation_lines(lines);

        if let Some(coupon) = &coupon {
            self.check_coupon(tx, coupon, user, &evaluation_lines).await?;
        }

        let totals = compute_totals(&evaluation_lines, shipping_method.charge, coupon.as_ref());

        self.checkouts.update_totals(tx, checkout, &totals).await?;

        Span::current().record("total", totals.total);

        let header = self.checkouts.get_checkout(tx, checkout).await?;

        self.load(tx, header).await
    }

    async fn check_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &CouponRecord,
        user: UserUuid,
        lines: &[EvaluationLine],
    ) -> Result<(), CheckoutsServiceError> {
        let prior_paid_uses = self
            .coupons
            .count_user_paid_uses(tx, coupon.uuid, user)
            .await?;

        let ctx = EvaluationContext {
            lines,
            prior_paid_uses,
            now: Timestamp::now(),
        };

        validate(coupon, &ctx).inspect_err(|rejection| {
            info!(
                coupon_uuid = %coupon.uuid,
                reason = rejection.reason(),
                "coupon rejected"
            );
        })?;

        Ok(())
    }

    /// Price `header`'s lines with `coupon` without touching the order.
    async fn preview(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        header: CheckoutHeader,
        coupon: CouponUuid,
    ) -> Result<CouponPreview, CheckoutsServiceError> {
        let record = self.load(tx, header).await?;

        let coupon = self
            .coupons
            .get_coupon(tx, coupon)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CheckoutsServiceError::CouponNotFound,
                error => error.into(),
            })?;

        let lines = item_evaluation_lines(&record.items);

        self.check_coupon(tx, &coupon, record.user_uuid, &lines)
            .await?;

        let subtotal = subtotal(&lines);
        let discount = applied_discount(&coupon, subtotal, record.shipping_charge);

        Ok(CouponPreview {
            total: subtotal.saturating_add(record.shipping_charge),
            discounted_total: order_total(subtotal, record.shipping_charge, discount),
        })
    }

    /// Count one use of `coupon` by `user`, rechecking both limits under the coupon lock.
    async fn claim_coupon_use(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: UserUuid,
    ) -> Result<(), CheckoutsServiceError> {
        let record = self
            .coupons
            .lock_coupon(tx, coupon)
            .await?
            .ok_or(CheckoutsServiceError::CouponNotFound)?;

        let paid_uses = self.coupons.count_user_paid_uses(tx, coupon, user).await?;

        let rejection = if paid_uses >= record.max_uses_per_user {
            Some(CouponRejection::PerUserLimitReached)
        } else if self.coupons.increment_usage(tx, coupon).await? == 0 {
            Some(CouponRejection::UsageLimitReached)
        } else {
            None
        };

        if let Some(rejection) = rejection {
            info!(
                coupon_uuid = %coupon,
                reason = rejection.reason(),
                "coupon use refused at payment"
            );

            return Err(rejection.into());
        }

        debug!(coupon_uuid = %coupon, "counted coupon use");

        Ok(())
    }

    async fn load(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        header: CheckoutHeader,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let items = self
            .checkouts
            .list_checkout_items(tx, &[header.uuid])
            .await?;

        Ok(header.into_record(items))
    }
}

fn evaluation_lines(lines: &[OrderLine]) -> Vec<EvaluationLine> {
    lines
        .iter()
        .map(|line| EvaluationLine {
            product_uuid: line.product.product_uuid,
            category_uuid: line.product.category_uuid,
            unit_price: line.unit_price,
            quantity: line.quantity,
        })
        .collect()
}

fn item_evaluation_lines(items: &[CheckoutItemRecord]) -> Vec<EvaluationLine> {
    items
        .iter()
        .map(|item| EvaluationLine {
            product_uuid: item.product.product_uuid,
            category_uuid: item.product.category_uuid,
            unit_price: item.unit_price,
            quantity: item.quantity,
        })
        .collect()
}

fn snapshot(product: &ProductRecord) -> ProductSnapshot {
    ProductSnapshot {
        product_uuid: product.uuid,
        name: product.name.clone(),
        sku: product.sku.clone(),
        image: product.feature_image.clone(),
        category_uuid: product.category_uuid,
    }
}

#[async_trait]
impl CheckoutsService for PgCheckoutsService {
    #[tracing::instrument(
        name = "checkouts.service.create_checkout",
        skip(self, checkout),
        fields(
            user_uuid = %user,
            checkout_uuid = %checkout.uuid,
            lines = checkout.items.len(),
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_checkout(
        &self,
        user: UserUuid,
        checkout: NewCheckout,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        if checkout.items.is_empty() {
            return Err(CheckoutsServiceError::InvalidData(
                "An order needs at least one item",
            ));
        }

        if checkout.items.iter().any(|item| item.quantity == 0) {
            return Err(CheckoutsServiceError::InvalidData(
                "Item quantities must be greater than zero",
            ));
        }

        let mut tx = self.db.begin().await?;

        let product_uuids: Vec<ProductUuid> = checkout
            .items
            .iter()
            .map(|item| item.product_uuid)
            .collect();

        let products = self.resolve_products(&mut tx, &product_uuids).await?;

        let mut lines = Vec::with_capacity(checkout.items.len());

        for item in checkout.items {
            let product = products
                .get(&item.product_uuid)
                .ok_or(CheckoutsServiceError::InvalidReference(
                    "Some products not found",
                ))?;

            lines.push(OrderLine {
                product: snapshot(product),
                unit_price: product.effective_price(),
                quantity: item.quantity,
                selected_attributes: item.selected_attributes,
            });
        }

        let record = self
            .place_order(&mut tx, user, checkout.uuid, &lines, checkout.details)
            .await?;

        tx.commit().await?;

        info!(
            checkout_uuid = %record.uuid,
            order_number = %record.order_number,
            total = record.total,
            "created checkout"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.create_checkout_from_cart",
        skip(self, checkout),
        fields(
            user_uuid = %user,
            checkout_uuid = %checkout.uuid,
            requested = checkout.cart_items.len(),
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_checkout_from_cart(
        &self,
        user: UserUuid,
        checkout: CartCheckout,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        if checkout.cart_items.is_empty() {
            return Err(CheckoutsServiceError::NoActiveCartItems);
        }

        let mut tx = self.db.begin().await?;

        let cart_lines = self
            .cart_items
            .lock_checkout_items(&mut tx, user, &checkout.cart_items)
            .await?;

        if cart_lines.is_empty() {
            return Err(CheckoutsServiceError::NoActiveCartItems);
        }

        let requested = checkout.cart_items.len();
        let locked = cart_lines.len();

        if locked < requested {
            debug!(
                requested,
                locked,
                skipped = requested - locked,
                "skipped cart lines that are not active in the user's cart"
            );
        } else {
            debug!(lines = locked, "locked cart lines for checkout");
        }

        let product_uuids: Vec<ProductUuid> =
            cart_lines.iter().map(|line| line.product_uuid).collect();

        let products = self.resolve_products(&mut tx, &product_uuids).await?;

        let mut lines = Vec::with_capacity(cart_lines.len());
        let mut consumed = Vec::with_capacity(cart_lines.len());

        for cart_line in cart_lines {
            let product = products
                .get(&cart_line.product_uuid)
                .ok_or(CheckoutsServiceError::InvalidReference(
                    "Some products not found",
                ))?;

            consumed.push(cart_line.uuid);
            lines.push(OrderLine {
                product: snapshot(product),
                unit_price: cart_line.unit_price,
                quantity: cart_line.quantity,
                selected_attributes: cart_line.selected_attributes,
            });
        }

        let record = self
            .place_order(&mut tx, user, checkout.uuid, &lines, checkout.details)
            .await?;

        let deactivated = self
            .cart_items
            .deactivate_cart_items(&mut tx, &consumed)
            .await?;

        tx.commit().await?;

        info!(
            checkout_uuid = %record.uuid,
            order_number = %record.order_number,
            total = record.total,
            deactivated,
            "created checkout from cart"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.get_checkout",
        skip(self),
        fields(checkout_uuid = %checkout),
        err
    )]
    async fn get_checkout(
        &self,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self.checkouts.get_checkout(&mut tx, checkout).await?;
        let record = self.load(&mut tx, header).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.get_user_checkout",
        skip(self),
        fields(user_uuid = %user, checkout_uuid = %checkout),
        err
    )]
    async fn get_user_checkout(
        &self,
        user: UserUuid,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self
            .checkouts
            .get_user_checkout(&mut tx, user, checkout)
            .await?;
        let record = self.load(&mut tx, header).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.list_checkouts",
        skip(self, list),
        fields(limit = list.limit, offset = list.offset, total = tracing::field::Empty),
        err
    )]
    async fn list_checkouts(
        &self,
        list: CheckoutListQuery,
    ) -> Result<CheckoutPage, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let headers = self.checkouts.list_checkouts(&mut tx, &list).await?;
        let total = self.checkouts.count_checkouts(&mut tx, list.user).await?;

        let uuids: Vec<CheckoutUuid> = headers.iter().map(|header| header.uuid).collect();

        let mut items: FxHashMap<CheckoutUuid, Vec<CheckoutItemRecord>> = FxHashMap::default();

        for item in self.checkouts.list_checkout_items(&mut tx, &uuids).await? {
            items.entry(item.checkout_uuid).or_default().push(item);
        }

        tx.commit().await?;

        Span::current().record("total", total);

        let checkouts = headers
            .into_iter()
            .map(|header| {
                let lines = items.remove(&header.uuid).unwrap_or_default();

                header.into_record(lines)
            })
            .collect();

        Ok(CheckoutPage { checkouts, total })
    }

    #[tracing::instrument(
        name = "checkouts.service.update_status",
        skip(self, change),
        fields(checkout_uuid = %checkout, status_uuid = %status),
        err
    )]
    async fn update_status(
        &self,
        checkout: CheckoutUuid,
        status: OrderStatusUuid,
        change: StatusChange,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self.checkouts.lock_checkout(&mut tx, checkout).await?;

        let target = self
            .statuses
            .find_status(&mut tx, status)
            .await?
            .ok_or(CheckoutsServiceError::InvalidReference(
                "Order status not found",
            ))?;

        if header.status.is_terminal {
            return Err(CheckoutsServiceError::InvalidTransition(
                "Order is already in a final status",
            ));
        }

        let previous = header.status.code;

        self.history
            .create_status_history(&mut tx, checkout, target.uuid, &change)
            .await?;

        self.checkouts
            .update_status(
                &mut tx,
                checkout,
                target.uuid,
                change.note.as_deref(),
                target.is(WellKnownStatus::Cancelled),
            )
            .await?;

        let header = self.checkouts.get_checkout(&mut tx, checkout).await?;
        let record = self.load(&mut tx, header).await?;

        tx.commit().await?;

        info!(
            checkout_uuid = %checkout,
            from = %previous,
            to = %target.code,
            "updated order status"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.update_payment_status",
        skip(self, update),
        fields(checkout_uuid = %checkout, payment_status = %update.status),
        err
    )]
    async fn update_payment_status(
        &self,
        checkout: CheckoutUuid,
        update: PaymentUpdate,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self.checkouts.lock_checkout(&mut tx, checkout).await?;
        let current = header.payment_status;

        if !current.can_transition_to(update.status) {
            return Err(CheckoutsServiceError::InvalidTransition(
                "Payment status cannot change this way",
            ));
        }

        if let Some(coupon) = header.coupon_uuid {
            match (current, update.status) {
                (previous, PaymentStatus::Paid) if previous != PaymentStatus::Paid => {
                    self.claim_coupon_use(&mut tx, coupon, header.user_uuid)
                        .await?;
                }
                (PaymentStatus::Paid, PaymentStatus::Refunded) => {
                    self.coupons.decrement_usage(&mut tx, coupon).await?;

                    debug!(coupon_uuid = %coupon, "released coupon use");
                }
                _ => {}
            }
        }

        self.checkouts
            .update_payment(&mut tx, checkout, update.status, update.details.as_ref())
            .await?;

        let header = self.checkouts.get_checkout(&mut tx, checkout).await?;
        let record = self.load(&mut tx, header).await?;

        tx.commit().await?;

        info!(
            checkout_uuid = %checkout,
            from = %current,
            to = %update.status,
            "updated payment status"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.cancel",
        skip(self, reason),
        fields(checkout_uuid = %checkout, already_cancelled = tracing::field::Empty),
        err
    )]
    async fn cancel(
        &self,
        checkout: CheckoutUuid,
        reason: Option<String>,
    ) -> Result<CheckoutRecord, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self.checkouts.lock_checkout(&mut tx, checkout).await?;

        let already_cancelled = header.status.is(WellKnownStatus::Cancelled);

        Span::current().record("already_cancelled", already_cancelled);

        if already_cancelled {
            let record = self.load(&mut tx, header).await?;

            tx.commit().await?;

            return Ok(record);
        }

        if header.status.is_terminal {
            return Err(CheckoutsServiceError::InvalidTransition(
                "Order can no longer be cancelled",
            ));
        }

        let cancelled = self
            .resolver
            .resolve(&mut tx, WellKnownStatus::Cancelled)
            .await?;

        let change = StatusChange {
            title: None,
            note: reason,
            created_by: None,
        };

        self.history
            .create_status_history(&mut tx, checkout, cancelled.uuid, &change)
            .await?;

        self.checkouts
            .update_status(
                &mut tx,
                checkout,
                cancelled.uuid,
                change.note.as_deref(),
                true,
            )
            .await?;

        let header = self.checkouts.get_checkout(&mut tx, checkout).await?;
        let record = self.load(&mut tx, header).await?;

        tx.commit().await?;

        info!(checkout_uuid = %checkout, "cancelled order");

        Ok(record)
    }

    #[tracing::instrument(
        name = "checkouts.service.preview_coupon",
        skip(self),
        fields(checkout_uuid = %checkout, coupon_uuid = %coupon),
        err
    )]
    async fn preview_coupon(
        &self,
        checkout: CheckoutUuid,
        coupon: CouponUuid,
    ) -> Result<CouponPreview, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self.checkouts.get_checkout(&mut tx, checkout).await?;
        let preview = self.preview(&mut tx, header, coupon).await?;

        tx.commit().await?;

        Ok(preview)
    }

    #[tracing::instrument(
        name = "checkouts.service.preview_user_coupon",
        skip(self),
        fields(user_uuid = %user, checkout_uuid = %checkout, coupon_uuid = %coupon),
        err
    )]
    async fn preview_user_coupon(
        &self,
        user: UserUuid,
        checkout: CheckoutUuid,
        coupon: CouponUuid,
    ) -> Result<CouponPreview, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let header = self
            .checkouts
            .get_user_checkout(&mut tx, user, checkout)
            .await?;
        let preview = self.preview(&mut tx, header, coupon).await?;

        tx.commit().await?;

        Ok(preview)
    }

    #[tracing::instrument(
        name = "checkouts.service.status_history",
        skip(self),
        fields(checkout_uuid = %checkout),
        err
    )]
    async fn status_history(
        &self,
        checkout: CheckoutUuid,
    ) -> Result<Vec<StatusHistoryRecord>, CheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        self.checkouts.get_checkout(&mut tx, checkout).await?;

        let history = self.history.list_status_history(&mut tx, checkout).await?;

        tx.commit().await?;

        Ok(history)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutsService: Send + Sync {
    /// Place an order for an explicit list of products, priced at their current effective price.
    async fn create_checkout(
        &self,
        user: UserUuid,
        checkout: NewCheckout,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    /// Place an order from active cart lines at their cart price, retiring the consumed lines.
    async fn create_checkout_from_cart(
        &self,
        user: UserUuid,
        checkout: CartCheckout,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    async fn get_checkout(
        &self,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    /// Fetch an order only if it belongs to `user`.
    async fn get_user_checkout(
        &self,
        user: UserUuid,
        checkout: CheckoutUuid,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    async fn list_checkouts(
        &self,
        list: CheckoutListQuery,
    ) -> Result<CheckoutPage, CheckoutsServiceError>;

    /// Move a non-final order to another workflow status, appending to its history.
    async fn update_status(
        &self,
        checkout: CheckoutUuid,
        status: OrderStatusUuid,
        change: StatusChange,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    /// Record a payment outcome and keep the coupon's usage count in step with it.
    async fn update_payment_status(
        &self,
        checkout: CheckoutUuid,
        update: PaymentUpdate,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    /// Cancel an order. Cancelling twice returns the order unchanged.
    async fn cancel(
        &self,
        checkout: CheckoutUuid,
        reason: Option<String>,
    ) -> Result<CheckoutRecord, CheckoutsServiceError>;

    /// What the order would cost with `coupon`, without changing it.
    async fn preview_coupon(
        &self,
        checkout: CheckoutUuid,
        coupon: CouponUuid,
    ) -> Result<CouponPreview, CheckoutsServiceError>;

    /// Same as [`CheckoutsService::preview_coupon`], for an order owned by `user`.
    async fn preview_user_coupon(
        &self,
        user: UserUuid,
        checkout: CheckoutUuid,
        coupon: CouponUuid,
    ) -> Result<CouponPreview, CheckoutsServiceError>;

    /// Status changes of an order, newest first.
    async fn status_history(
        &self,
        checkout: CheckoutUuid,
    ) -> Result<Vec<StatusHistoryRecord>, CheckoutsServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::{
            addresses::AddressesService,
            carts::CartsService,
            checkouts::{
                data::{CheckoutSort, SortDirection},
                records::PaymentMethod,
            },
            coupons::{CouponRejection, CouponsService, records::Discount},
        },
        test::{
            TestContext,
            helpers::{
                checkout_details, create_address, create_product, create_shipping_method,
                new_cart_item, new_checkout, new_checkout_item, new_coupon, status_uuid,
            },
        },
    };

    use super::*;

    #[tokio::test]
    async fn fixed_coupon_checkout_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-TEN", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        ctx.coupons
            .create_coupon(new_coupon("SAVE3", Discount::Fixed(3)))
            .await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("SAVE3".to_string());

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 3)], details),
            )
            .await?;

        assert_eq!(order.subtotal, 30);
        assert_eq!(order.shipping_charge, 5);
        assert_eq!(order.discount, 3);
        assert_eq!(order.tax, 0);
        assert_eq!(order.total, 32);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::Card);
        assert!(order.status.is(WellKnownStatus::Pending));
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product.sku, "SKU-TEN");
        assert_eq!(order.items[0].line_total, 30);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_coupon_leaves_no_order_behind() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-MIN", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        let mut coupon = new_coupon("BIGSPEND", Discount::Percentage(10));
        coupon.min_order_amount = Some(100);
        ctx.coupons.create_coupon(coupon).await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("BIGSPEND".to_string());

        let result = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 3)], details),
            )
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutsServiceError::CouponRejected(
                    CouponRejection::MinimumOrderNotMet { minimum: 100 }
                ))
            ),
            "expected MinimumOrderNotMet, got {result:?}"
        );

        let page = ctx
            .checkouts
            .list_checkouts(CheckoutListQuery::new().for_user(user))
            .await?;

        assert_eq!(page.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_coupon_code_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-UNK", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("NOPE".to_string());

        let result = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 1)], details),
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutsServiceError::CouponNotFound)),
            "expected CouponNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_is_an_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        let result = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(ProductUuid::new(), 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutsServiceError::InvalidReference("Some products not found"))
            ),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_or_zero_quantity_orders_are_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-ZERO", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        let empty = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(Vec::new(), checkout_details(address.uuid, method.uuid)),
            )
            .await;

        let zero = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 0)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await;

        assert!(matches!(empty, Err(CheckoutsServiceError::InvalidData(_))));
        assert!(matches!(zero, Err(CheckoutsServiceError::InvalidData(_))));

        Ok(())
    }

    #[tokio::test]
    async fn billing_falls_back_to_default_billing_address() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-BILL", 10, 10).await?;
        let home = create_address(&ctx, user, "Home").await?;
        let work = create_address(&ctx, user, "Work").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(work.uuid, method.uuid),
                ),
            )
            .await?;

        assert_eq!(order.shipping_address_uuid, work.uuid);
        assert_eq!(order.billing_address_uuid, home.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn someone_elses_address_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-OTHER", 10, 10).await?;
        let theirs = create_address(&ctx, UserUuid::new(), "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let result = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(theirs.uuid, method.uuid),
                ),
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutsServiceError::InvalidReference(_))),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cart_checkout_retires_only_consumed_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let first = create_product(&ctx, "SKU-CART-1", 12, 10).await?;
        let second = create_product(&ctx, "SKU-CART-2", 7, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 3).await?;

        let bought = ctx
            .carts
            .add_item(user, new_cart_item(first.uuid, 2))
            .await?;
        let kept = ctx
            .carts
            .add_item(user, new_cart_item(second.uuid, 1))
            .await?;

        let order = ctx
            .checkouts
            .create_checkout_from_cart(
                user,
                CartCheckout {
                    uuid: CheckoutUuid::new(),
                    cart_items: vec![bought.uuid],
                    details: checkout_details(address.uuid, method.uuid),
                },
            )
            .await?;

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.subtotal, 24);
        assert_eq!(order.total, 27);

        let summary = ctx.carts.get_summary(user, false).await?;

        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].item.uuid, kept.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn cart_checkout_without_active_lines_fails() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 3).await?;

        let result = ctx
            .checkouts
            .create_checkout_from_cart(
                user,
                CartCheckout {
                    uuid: CheckoutUuid::new(),
                    cart_items: vec![crate::domain::carts::records::CartItemUuid::new()],
                    details: checkout_details(address.uuid, method.uuid),
                },
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutsServiceError::NoActiveCartItems)),
            "expected NoActiveCartItems, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancelling_twice_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-CANCEL", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        let first = ctx
            .checkouts
            .cancel(order.uuid, Some("changed my mind".to_string()))
            .await?;
        let second = ctx.checkouts.cancel(order.uuid, None).await?;

        assert!(first.status.is(WellKnownStatus::Cancelled));
        assert!(first.canceled_at.is_some());
        assert_eq!(first.last_status_note.as_deref(), Some("changed my mind"));
        assert_eq!(first, second);
        assert_eq!(ctx.checkouts.status_history(order.uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn delivered_orders_are_final() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-FINAL", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;
        let processing = status_uuid(&ctx, WellKnownStatus::Processing).await?;
        let delivered = status_uuid(&ctx, WellKnownStatus::Delivered).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        ctx.checkouts
            .update_status(order.uuid, delivered, StatusChange::default())
            .await?;

        let cancel = ctx.checkouts.cancel(order.uuid, None).await;
        let reopen = ctx
            .checkouts
            .update_status(order.uuid, processing, StatusChange::default())
            .await;

        assert!(
            matches!(cancel, Err(CheckoutsServiceError::InvalidTransition(_))),
            "expected InvalidTransition, got {cancel:?}"
        );
        assert!(
            matches!(reopen, Err(CheckoutsServiceError::InvalidTransition(_))),
            "expected InvalidTransition, got {reopen:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn status_history_is_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-HIST", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;
        let processing = status_uuid(&ctx, WellKnownStatus::Processing).await?;
        let shipped = status_uuid(&ctx, WellKnownStatus::Shipped).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        ctx.checkouts
            .update_status(order.uuid, processing, StatusChange::default())
            .await?;

        let updated = ctx
            .checkouts
            .update_status(
                order.uuid,
                shipped,
                StatusChange {
                    title: Some("On its way".to_string()),
                    note: Some("Tracking 123".to_string()),
                    created_by: Some(user),
                },
            )
            .await?;

        assert!(updated.status.is(WellKnownStatus::Shipped));
        assert_eq!(updated.last_status_note.as_deref(), Some("Tracking 123"));

        let history = ctx.checkouts.status_history(order.uuid).await?;
        let codes: Vec<&str> = history.iter().map(|entry| entry.status_code.as_str()).collect();

        assert_eq!(codes, ["shipped", "processing"]);
        assert_eq!(history[0].title.as_deref(), Some("On its way"));

        Ok(())
    }

    #[tokio::test]
    async fn paying_and_refunding_tracks_coupon_usage() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-PAY", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;
        let coupon = ctx
            .coupons
            .create_coupon(new_coupon("PAYME", Discount::Percentage(10)))
            .await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("PAYME".to_string());

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 2)], details),
            )
            .await?;

        let paid = PaymentUpdate {
            status: PaymentStatus::Paid,
            details: Some(json!({ "reference": "txn_1" })),
        };

        let order = ctx
            .checkouts
            .update_payment_status(order.uuid, paid.clone())
            .await?;

        assert!(order.paid_at.is_some());
        assert_eq!(order.payment_details, Some(json!({ "reference": "txn_1" })));
        assert_eq!(ctx.coupons.get_coupon(coupon.uuid).await?.usage_count, 1);

        ctx.checkouts
            .update_payment_status(order.uuid, paid)
            .await?;

        assert_eq!(ctx.coupons.get_coupon(coupon.uuid).await?.usage_count, 1);

        let refunded = ctx
            .checkouts
            .update_payment_status(
                order.uuid,
                PaymentUpdate {
                    status: PaymentStatus::Refunded,
                    details: None,
                },
            )
            .await?;

        assert!(refunded.refunded_at.is_some());
        assert_eq!(ctx.coupons.get_coupon(coupon.uuid).await?.usage_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn refunding_an_unpaid_order_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-REFUND", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        let result = ctx
            .checkouts
            .update_payment_status(
                order.uuid,
                PaymentUpdate {
                    status: PaymentStatus::Refunded,
                    details: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutsServiceError::InvalidTransition(_))),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn paid_use_counts_towards_per_user_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-ONCE", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        ctx.coupons
            .create_coupon(new_coupon("ONCE", Discount::Fixed(1)))
            .await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("ONCE".to_string());

        let first = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 1)], details.clone()),
            )
            .await?;

        ctx.checkouts
            .update_payment_status(
                first.uuid,
                PaymentUpdate {
                    status: PaymentStatus::Paid,
                    details: None,
                },
            )
            .await?;

        let second = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 1)], details),
            )
            .await;

        assert!(
            matches!(
                second,
                Err(CheckoutsServiceError::CouponRejected(
                    CouponRejection::PerUserLimitReached
                ))
            ),
            "expected PerUserLimitReached, got {second:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn payment_cannot_push_coupon_past_per_user_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-TWICE", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let mut coupon = new_coupon("JUSTONE", Discount::Fixed(1));
        coupon.max_uses = Some(1);
        let coupon = ctx.coupons.create_coupon(coupon).await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("JUSTONE".to_string());

        let mut orders = Vec::new();

        for _ in 0..2 {
            orders.push(
                ctx.checkouts
                    .create_checkout(
                        user,
                        new_checkout(vec![new_checkout_item(product.uuid, 1)], details.clone()),
                    )
                    .await?,
            );
        }

        let paid = PaymentUpdate {
            status: PaymentStatus::Paid,
            details: None,
        };

        ctx.checkouts
            .update_payment_status(orders[0].uuid, paid.clone())
            .await?;

        let second = ctx
            .checkouts
            .update_payment_status(orders[1].uuid, paid)
            .await;

        assert!(
            matches!(
                second,
                Err(CheckoutsServiceError::CouponRejected(
                    CouponRejection::PerUserLimitReached
                ))
            ),
            "expected PerUserLimitReached, got {second:?}"
        );
        assert_eq!(ctx.coupons.get_coupon(coupon.uuid).await?.usage_count, 1);
        assert_eq!(
            ctx.checkouts.get_checkout(orders[1].uuid).await?.payment_status,
            PaymentStatus::Pending
        );

        Ok(())
    }

    #[tokio::test]
    async fn payment_cannot_push_coupon_past_global_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, "SKU-LAST", 10, 10).await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let mut coupon = new_coupon("LASTONE", Discount::Fixed(1));
        coupon.max_uses = Some(1);
        let coupon = ctx.coupons.create_coupon(coupon).await?;

        let mut orders = Vec::new();

        for label in ["First", "Second"] {
            let user = UserUuid::new();
            let address = create_address(&ctx, user, label).await?;

            let mut details = checkout_details(address.uuid, method.uuid);
            details.coupon_code = Some("LASTONE".to_string());

            orders.push(
                ctx.checkouts
                    .create_checkout(
                        user,
                        new_checkout(vec![new_checkout_item(product.uuid, 1)], details),
                    )
                    .await?,
            );
        }

        let paid = PaymentUpdate {
            status: PaymentStatus::Paid,
            details: None,
        };

        ctx.checkouts
            .update_payment_status(orders[0].uuid, paid.clone())
            .await?;

        let second = ctx
            .checkouts
            .update_payment_status(orders[1].uuid, paid)
            .await;

        assert!(
            matches!(
                second,
                Err(CheckoutsServiceError::CouponRejected(
                    CouponRejection::UsageLimitReached
                ))
            ),
            "expected UsageLimitReached, got {second:?}"
        );

        let coupon = ctx.coupons.get_coupon(coupon.uuid).await?;

        assert_eq!(coupon.usage_count, 1);
        assert!(coupon.max_uses.is_some_and(|max_uses| coupon.usage_count <= max_uses));

        Ok(())
    }

    #[tokio::test]
    async fn two_items_with_ten_percent_coupon() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let cheap = create_product(&ctx, "SKU-P10", 10, 10).await?;
        let dear = create_product(&ctx, "SKU-P20", 20, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        ctx.coupons
            .create_coupon(new_coupon("TENPC", Discount::Percentage(10)))
            .await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("TENPC".to_string());

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![
                        new_checkout_item(cheap.uuid, 1),
                        new_checkout_item(dear.uuid, 1),
                    ],
                    details,
                ),
            )
            .await?;

        assert_eq!(order.subtotal, 30);
        assert_eq!(order.discount, 3);
        assert_eq!(order.total, 32);
        assert_eq!(order.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn stored_discount_never_exceeds_order_value() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-BIGOFF", 20, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;

        ctx.coupons
            .create_coupon(new_coupon("FIFTY", Discount::Fixed(50)))
            .await?;

        let mut details = checkout_details(address.uuid, method.uuid);
        details.coupon_code = Some("FIFTY".to_string());

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(vec![new_checkout_item(product.uuid, 1)], details),
            )
            .await?;

        assert_eq!(order.discount, 25);
        assert_eq!(order.total, 0);
        assert_eq!(
            order.subtotal + order.shipping_charge - order.discount,
            order.total
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_lines_keep_their_product_snapshot() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-SNAP", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 2)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        sqlx::query("UPDATE products SET name = $1, sku = $2, price = $3 WHERE uuid = $4")
            .bind("Renamed")
            .bind("SKU-SNAP-2")
            .bind(99_i64)
            .bind(product.uuid)
            .execute(ctx.db.pool())
            .await?;

        let reread = ctx.checkouts.get_checkout(order.uuid).await?;

        assert_eq!(reread.items[0].product.name, product.name);
        assert_eq!(reread.items[0].product.sku, "SKU-SNAP");
        assert_eq!(reread.items[0].unit_price, 10);
        assert_eq!(reread.items[0].line_total, 20);
        assert_eq!(reread.total, order.total);

        Ok(())
    }

    #[tokio::test]
    async fn cart_checkout_skips_lines_from_other_carts() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let other = UserUuid::new();
        let product = create_product(&ctx, "SKU-MINE", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let mine = ctx
            .carts
            .add_item(user, new_cart_item(product.uuid, 1))
            .await?;
        let theirs = ctx
            .carts
            .add_item(other, new_cart_item(product.uuid, 4))
            .await?;

        let order = ctx
            .checkouts
            .create_checkout_from_cart(
                user,
                CartCheckout {
                    uuid: CheckoutUuid::new(),
                    cart_items: vec![mine.uuid, theirs.uuid],
                    details: checkout_details(address.uuid, method.uuid),
                },
            )
            .await?;

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.subtotal, 10);

        let their_cart = ctx.carts.get_summary(other, false).await?;

        assert_eq!(their_cart.items.len(), 1);
        assert_eq!(their_cart.items[0].item.uuid, theirs.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn customers_preview_coupons_on_their_own_orders_only() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-MYPREVIEW", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;
        let coupon = ctx
            .coupons
            .create_coupon(new_coupon("MINE10", Discount::Percentage(10)))
            .await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 3)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        let preview = ctx
            .checkouts
            .preview_user_coupon(user, order.uuid, coupon.uuid)
            .await?;

        assert_eq!(preview.discounted_total, 32);

        let stranger = ctx
            .checkouts
            .preview_user_coupon(UserUuid::new(), order.uuid, coupon.uuid)
            .await;

        assert!(
            matches!(stranger, Err(CheckoutsServiceError::NotFound)),
            "expected NotFound, got {stranger:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn coupon_preview_matches_checkout_arithmetic() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-PREVIEW", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 5).await?;
        let coupon = ctx
            .coupons
            .create_coupon(new_coupon("TENOFF", Discount::Percentage(10)))
            .await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 3)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        let preview = ctx.checkouts.preview_coupon(order.uuid, coupon.uuid).await?;

        assert_eq!(
            preview,
            CouponPreview {
                total: 35,
                discounted_total: 32,
            }
        );

        let unchanged = ctx.checkouts.get_checkout(order.uuid).await?;

        assert_eq!(unchanged.total, 35);
        assert_eq!(unchanged.coupon_uuid, None);

        Ok(())
    }

    #[tokio::test]
    async fn listing_is_sorted_and_paged() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-LIST", 10, 100).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        for quantity in [3, 1, 2] {
            ctx.checkouts
                .create_checkout(
                    user,
                    new_checkout(
                        vec![new_checkout_item(product.uuid, quantity)],
                        checkout_details(address.uuid, method.uuid),
                    ),
                )
                .await?;
        }

        let page = ctx
            .checkouts
            .list_checkouts(
                CheckoutListQuery::new()
                    .for_user(user)
                    .sort(CheckoutSort::Total, SortDirection::Asc)
                    .page(2, 0),
            )
            .await?;

        let totals: Vec<u64> = page.checkouts.iter().map(|order| order.total).collect();

        assert_eq!(page.total, 3);
        assert_eq!(totals, [10, 20]);
        assert!(page.checkouts.iter().all(|order| order.items.len() == 1));

        Ok(())
    }

    #[tokio::test]
    async fn other_users_cannot_read_an_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-OWN", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        assert_eq!(
            ctx.checkouts.get_user_checkout(user, order.uuid).await?.uuid,
            order.uuid
        );

        let result = ctx
            .checkouts
            .get_user_checkout(UserUuid::new(), order.uuid)
            .await;

        assert!(
            matches!(result, Err(CheckoutsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn address_used_by_an_order_is_soft_deleted() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, "SKU-ADDR", 10, 10).await?;
        let address = create_address(&ctx, user, "Home").await?;
        let method = create_shipping_method(&ctx, 0).await?;

        let order = ctx
            .checkouts
            .create_checkout(
                user,
                new_checkout(
                    vec![new_checkout_item(product.uuid, 1)],
                    checkout_details(address.uuid, method.uuid),
                ),
            )
            .await?;

        ctx.addresses.delete_address(user, address.uuid).await?;

        assert!(ctx.addresses.list_addresses(user).await?.is_empty());
        assert_eq!(
            ctx.checkouts.get_checkout(order.uuid).await?.shipping_address_uuid,
            address.uuid
        );

        Ok(())
    }
}

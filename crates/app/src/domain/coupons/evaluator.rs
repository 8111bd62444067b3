//! Coupon eligibility rules and discount arithmetic.
//!
//! Everything here is pure: callers load the coupon and order lines, count the user's earlier
//! paid orders, and pass them in. Checks run in a fixed order and the first failure wins.

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    coupons::records::{CouponRecord, CouponStatus, Discount},
    products::records::{CategoryUuid, ProductUuid},
};

/// The parts of an order line the rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationLine {
    pub product_uuid: ProductUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub unit_price: u64,
    pub quantity: u64,
}

impl EvaluationLine {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub lines: &'a [EvaluationLine],
    /// Paid orders by the same user that already used this coupon.
    pub prior_paid_uses: u64,
    pub now: Timestamp,
}

/// Why a coupon cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CouponRejection {
    #[error("Coupon is not active")]
    NotActive,

    #[error("Coupon is expired or not yet valid")]
    OutsideValidityWindow,

    #[error("Coupon usage limit exceeded")]
    UsageLimitReached,

    #[error("Order minimum of {minimum} not met")]
    MinimumOrderNotMet { minimum: u64 },

    #[error("Coupon not valid for these products")]
    NotApplicableToProducts,

    #[error("User coupon usage limit exceeded")]
    PerUserLimitReached,
}

impl CouponRejection {
    /// Stable label for metrics and logs.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::NotActive => "not_active",
            Self::OutsideValidityWindow => "outside_validity_window",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::MinimumOrderNotMet { .. } => "minimum_order_not_met",
            Self::NotApplicableToProducts => "not_applicable_to_products",
            Self::PerUserLimitReached => "per_user_limit_reached",
        }
    }

    /// Rejections caused by the coupon being used up rather than by the order itself.
    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Self::UsageLimitReached | Self::PerUserLimitReached)
    }
}

/// `Σ unit_price × quantity` over the lines.
#[must_use]
pub fn subtotal(lines: &[EvaluationLine]) -> u64 {
    lines
        .iter()
        .map(EvaluationLine::line_total)
        .fold(0, u64::saturating_add)
}

/// Check whether `coupon` may be applied to the order described by `ctx`.
///
/// # Errors
///
/// Returns the first rule the coupon fails.
pub fn validate(coupon: &CouponRecord, ctx: &EvaluationContext<'_>) -> Result<(), CouponRejection> {
    if coupon.status != CouponStatus::Active {
        return Err(CouponRejection::NotActive);
    }

    if ctx.now < coupon.starts_at || ctx.now > coupon.ends_at {
        return Err(CouponRejection::OutsideValidityWindow);
    }

    if coupon
        .max_uses
        .is_some_and(|max_uses| coupon.usage_count >= max_uses)
    {
        return Err(CouponRejection::UsageLimitReached);
    }

    if let Some(minimum) = coupon.min_order_amount
        && subtotal(ctx.lines) < minimum
    {
        return Err(CouponRejection::MinimumOrderNotMet { minimum });
    }

    if !applies_to_lines(coupon, ctx.lines) {
        return Err(CouponRejection::NotApplicableToProducts);
    }

    if ctx.prior_paid_uses >= coupon.max_uses_per_user {
        return Err(CouponRejection::PerUserLimitReached);
    }

    Ok(())
}

/// An unscoped coupon applies to everything. A scoped one needs every line to match a scoped
/// product or a scoped category.
fn applies_to_lines(coupon: &CouponRecord, lines: &[EvaluationLine]) -> bool {
    if !coupon.is_scoped() {
        return true;
    }

    let products: FxHashSet<ProductUuid> = coupon.scoped_products.iter().copied().collect();
    let categories: FxHashSet<CategoryUuid> = coupon.scoped_categories.iter().copied().collect();

    lines.iter().all(|line| {
        products.contains(&line.product_uuid)
            || line
                .category_uuid
                .is_some_and(|category| categories.contains(&category))
    })
}

/// The discount `coupon` gives on `subtotal`, capped by its maximum.
///
/// Percentages round half up to the nearest minor unit.
#[must_use]
pub fn calculate_discount(coupon: &CouponRecord, subtotal: u64) -> u64 {
    let base = match coupon.discount {
        Discount::Percentage(percent) => {
            let scaled = u128::from(subtotal) * u128::from(percent);

            u64::try_from((scaled + 50) / 100).unwrap_or(u64::MAX)
        }
        Discount::Fixed(amount) => amount,
    };

    coupon
        .max_discount_amount
        .map_or(base, |max_discount| base.min(max_discount))
}

/// The discount actually taken off an order. It never exceeds the order's value including
/// shipping, so `total = subtotal + shipping − discount` holds for the stored amounts.
#[must_use]
pub fn applied_discount(coupon: &CouponRecord, subtotal: u64, shipping: u64) -> u64 {
    calculate_discount(coupon, subtotal).min(subtotal.saturating_add(shipping))
}

/// `subtotal + shipping − discount`, never below zero.
#[must_use]
pub fn order_total(subtotal: u64, shipping: u64, discount: u64) -> u64 {
    subtotal.saturating_add(shipping).saturating_sub(discount)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use crate::domain::coupons::records::CouponUuid;

    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_second(1_780_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    fn coupon(discount: Discount) -> CouponRecord {
        CouponRecord {
            uuid: CouponUuid::new(),
            code: "SAVE".to_string(),
            campaign_name: "Spring".to_string(),
            description: None,
            discount,
            starts_at: now() - SignedDuration::from_hours(24),
            ends_at: now() + SignedDuration::from_hours(24),
            max_uses: None,
            max_uses_per_user: 1,
            min_order_amount: None,
            max_discount_amount: None,
            scoped_products: Vec::new(),
            scoped_categories: Vec::new(),
            status: CouponStatus::Active,
            usage_count: 0,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn line(unit_price: u64, quantity: u64) -> EvaluationLine {
        EvaluationLine {
            product_uuid: ProductUuid::new(),
            category_uuid: None,
            unit_price,
            quantity,
        }
    }

    fn ctx(lines: &[EvaluationLine], prior_paid_uses: u64) -> EvaluationContext<'_> {
        EvaluationContext {
            lines,
            prior_paid_uses,
            now: now(),
        }
    }

    #[test]
    fn ten_percent_of_thirty_with_shipping() {
        let coupon = coupon(Discount::Percentage(10));
        let lines = [line(10_00, 2), line(5_00, 2)];

        assert_eq!(validate(&coupon, &ctx(&lines, 0)), Ok(()));

        let subtotal = subtotal(&lines);
        let discount = calculate_discount(&coupon, subtotal);

        assert_eq!(subtotal, 30_00);
        assert_eq!(discount, 3_00);
        assert_eq!(order_total(subtotal, 5_00, discount), 32_00);
    }

    #[test]
    fn percentage_rounds_half_up() {
        let coupon = coupon(Discount::Percentage(15));

        // 15% of 1.23 is 18.45 minor units
        assert_eq!(calculate_discount(&coupon, 1_23), 18);
        // 15% of 0.10 is exactly 1.5 minor units
        assert_eq!(calculate_discount(&coupon, 10), 2);
    }

    #[test]
    fn discount_is_capped_by_maximum() {
        let mut coupon = coupon(Discount::Percentage(50));
        coupon.max_discount_amount = Some(10_00);

        assert_eq!(calculate_discount(&coupon, 100_00), 10_00);
        assert_eq!(calculate_discount(&coupon, 10_00), 5_00);
    }

    #[test]
    fn discount_never_exceeds_order_value() {
        let coupon = coupon(Discount::Fixed(50_00));
        let discount = applied_discount(&coupon, 20_00, 5_00);

        assert_eq!(calculate_discount(&coupon, 20_00), 50_00);
        assert_eq!(discount, 25_00);
        assert_eq!(order_total(20_00, 5_00, discount), 0);
        assert_eq!(20_00 + 5_00 - discount, order_total(20_00, 5_00, discount));
    }

    #[test]
    fn fixed_discount_is_clamped_to_its_maximum() {
        let mut coupon = coupon(Discount::Fixed(20_00));
        coupon.max_discount_amount = Some(15_00);

        for subtotal in [20_00, 35_00, 1_000_00] {
            assert_eq!(calculate_discount(&coupon, subtotal), 15_00);
            assert_eq!(applied_discount(&coupon, subtotal, 0), 15_00);
        }
    }

    #[test]
    fn inactive_coupon_is_rejected_first() {
        let mut coupon = coupon(Discount::Fixed(1_00));
        coupon.status = CouponStatus::Inactive;
        coupon.usage_count = 99;
        coupon.max_uses = Some(1);

        assert_eq!(
            validate(&coupon, &ctx(&[line(1_00, 1)], 0)),
            Err(CouponRejection::NotActive)
        );
    }

    #[test]
    fn window_edges_are_inclusive() {
        let mut coupon = coupon(Discount::Fixed(1_00));
        let lines = [line(1_00, 1)];

        coupon.starts_at = now();
        coupon.ends_at = now();

        assert_eq!(validate(&coupon, &ctx(&lines, 0)), Ok(()));

        coupon.ends_at = now() - SignedDuration::from_secs(1);
        coupon.starts_at = coupon.ends_at;

        assert_eq!(
            validate(&coupon, &ctx(&lines, 0)),
            Err(CouponRejection::OutsideValidityWindow)
        );
    }

    #[test]
    fn exhausted_coupon_is_rejected_unless_unlimited() {
        let mut coupon = coupon(Discount::Fixed(1_00));
        let lines = [line(1_00, 1)];

        coupon.usage_count = 5;
        coupon.max_uses = Some(5);

        let rejection = validate(&coupon, &ctx(&lines, 0));

        assert_eq!(rejection, Err(CouponRejection::UsageLimitReached));
        assert!(rejection.is_err_and(CouponRejection::is_exhausted));

        coupon.max_uses = None;

        assert_eq!(validate(&coupon, &ctx(&lines, 0)), Ok(()));
    }

    #[test]
    fn minimum_order_reports_the_minimum() {
        let mut coupon = coupon(Discount::Fixed(1_00));
        coupon.min_order_amount = Some(50_00);

        let rejection = validate(&coupon, &ctx(&[line(10_00, 2)], 0));

        assert_eq!(
            rejection,
            Err(CouponRejection::MinimumOrderNotMet { minimum: 50_00 })
        );
        assert_eq!(
            rejection.map_err(|rejection| rejection.to_string()),
            Err("Order minimum of 5000 not met".to_string())
        );
    }

    #[test]
    fn scoped_coupon_needs_every_line_to_match() {
        let category = CategoryUuid::new();
        let scoped = line(5_00, 1);
        let mut in_category = line(5_00, 1);
        in_category.category_uuid = Some(category);
        let outsider = line(5_00, 1);

        let mut coupon = coupon(Discount::Fixed(1_00));
        coupon.scoped_products = vec![scoped.product_uuid];
        coupon.scoped_categories = vec![category];

        assert_eq!(validate(&coupon, &ctx(&[scoped, in_category], 0)), Ok(()));
        assert_eq!(
            validate(&coupon, &ctx(&[scoped, outsider], 0)),
            Err(CouponRejection::NotApplicableToProducts)
        );
    }

    #[test]
    fn per_user_cap_counts_prior_paid_orders() {
        let mut coupon = coupon(Discount::Fixed(1_00));
        let lines = [line(1_00, 1)];

        assert_eq!(
            validate(&coupon, &ctx(&lines, 1)),
            Err(CouponRejection::PerUserLimitReached)
        );

        coupon.max_uses_per_user = 2;

        assert_eq!(validate(&coupon, &ctx(&lines, 1)), Ok(()));
    }
}

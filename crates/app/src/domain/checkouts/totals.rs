//! Order totals and numbering.

use jiff::Timestamp;

use crate::domain::{
    checkouts::records::CheckoutUuid,
    coupons::{
        evaluator::{EvaluationLine, applied_discount, order_total, subtotal},
        records::CouponRecord,
    },
};

/// Every amount persisted on an order header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub shipping_charge: u64,
    pub discount: u64,
    pub tax: u64,
    pub total: u64,
}

/// Compute an order's totals from its lines, the shipping charge and the attached coupon.
///
/// A coupon whose minimum order amount is not met contributes no discount, and no discount
/// exceeds `subtotal + shipping_charge`. Tax is always zero.
#[must_use]
pub fn compute_totals(
    lines: &[EvaluationLine],
    shipping_charge: u64,
    coupon: Option<&CouponRecord>,
) -> OrderTotals {
    let subtotal = subtotal(lines);

    let discount = coupon
        .filter(|coupon| coupon.min_order_amount.is_none_or(|minimum| subtotal >= minimum))
        .map_or(0, |coupon| applied_discount(coupon, subtotal, shipping_charge));

    OrderTotals {
        subtotal,
        shipping_charge,
        discount,
        tax: 0,
        total: order_total(subtotal, shipping_charge, discount),
    }
}

/// Human-readable order number: creation time in milliseconds plus the tail of the order id.
#[must_use]
pub fn order_number(checkout: CheckoutUuid, created_at: Timestamp) -> String {
    format!(
        "ORD-{}-{:08X}",
        created_at.as_millisecond(),
        checkout.into_uuid().as_u128() & 0xFFFF_FFFF
    )
}

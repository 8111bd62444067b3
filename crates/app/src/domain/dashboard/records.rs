//! Dashboard Records

use serde::Serialize;

use crate::domain::products::records::ProductUuid;

/// Sums of order totals per period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub today: u64,
    pub yesterday: u64,
    pub this_month: u64,
    pub last_month: u64,
    pub all_time: u64,
}

/// Order counts by workflow status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCounts {
    pub total: u64,
    pub cancelled: u64,
    /// Orders that are pending or processing.
    pub processing: u64,
    pub delivered: u64,
}

/// A best-selling product by order value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    pub total_value: u64,
    pub total_quantity: u64,
    /// Share of the top products' combined value, as a percentage with two decimals.
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub sales: SalesTotals,
    pub orders: OrderCounts,
    pub top_products: Vec<TopProduct>,
}

/// `value / total × 100` rounded half up to two decimals; zero when `total` is zero.
#[must_use]
pub fn share_of(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let basis_points = (u128::from(value) * 10_000 + u128::from(total) / 2) / u128::from(total);

    f64::from(u32::try_from(basis_points).unwrap_or(u32::MAX)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_rounds_to_two_decimals() {
        assert!((share_of(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((share_of(2, 3) - 66.67).abs() < f64::EPSILON);
        assert!((share_of(5, 5) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn share_of_nothing_is_zero() {
        assert!(share_of(0, 0).abs() < f64::EPSILON);
    }
}

use serde::Serialize;

use super::ratio;
use crate::data::filter::FilteredView;

/// A discount band: `lower < d <= upper`, or `lower <= d <= upper` when
/// `lower_inclusive`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandBounds {
    pub label: &'static str,
    pub lower: f64,
    pub lower_inclusive: bool,
    pub upper: f64,
}

impl BandBounds {
    pub fn contains(&self, discount: f64) -> bool {
        let above = if self.lower_inclusive {
            discount >= self.lower
        } else {
            discount > self.lower
        };
        above && discount <= self.upper
    }
}

/// The four bands, in display order. A discount of exactly 0.10 is "Low",
/// exactly 0.20 is "Medium".
pub const DISCOUNT_BANDS: [BandBounds; 4] = [
    BandBounds {
        label: "No Discount (0%)",
        lower: 0.0,
        lower_inclusive: true,
        upper: 0.0,
    },
    BandBounds {
        label: "Low (1-10%)",
        lower: 0.0,
        lower_inclusive: false,
        upper: 0.10,
    },
    BandBounds {
        label: "Medium (11-20%)",
        lower: 0.10,
        lower_inclusive: false,
        upper: 0.20,
    },
    BandBounds {
        label: "High (20%+)",
        lower: 0.20,
        lower_inclusive: false,
        upper: 1.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountBand {
    pub label: &'static str,
    /// Line items in the band.
    pub orders: usize,
    pub revenue: f64,
    pub profit: f64,
    /// Mean line-item sales.
    pub avg_order_value: f64,
    /// 0 when the band has no revenue.
    pub profit_margin_pct: f64,
}

/// Orders, revenue and margin per discount band. Empty bands are left out.
///
/// `None` when the source has no discount column.
pub fn discount_impact(view: &FilteredView<'_>) -> Option<Vec<DiscountBand>> {
    if !view.columns.discount {
        return None;
    }

    let bands = DISCOUNT_BANDS
        .iter()
        .filter_map(|bounds| {
            let (orders, revenue, profit) = view
                .iter()
                .filter(|row| bounds.contains(row.discount))
                .fold((0usize, 0.0, 0.0), |(n, s, p), row| {
                    (n + 1, s + row.sales, p + row.profit)
                });
            (orders > 0).then(|| DiscountBand {
                label: bounds.label,
                orders,
                revenue,
                profit,
                avg_order_value: revenue / orders as f64,
                profit_margin_pct: ratio(profit, revenue) * 100.0,
            })
        })
        .collect();
    Some(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::tx;
    use crate::data::model::{OptionalColumns, Transaction, TransactionTable};

    fn with_discounts(discounts: &[f64]) -> TransactionTable {
        TransactionTable::from_rows(
            discounts
                .iter()
                .enumerate()
                .map(|(i, &discount)| Transaction {
                    discount,
                    ..tx(&format!("O{i}"), "C1", "2023-01-01", 100.0, 10.0 - 40.0 * discount)
                })
                .collect(),
            OptionalColumns::all(),
        )
    }

    fn band_of(discount: f64) -> Vec<&'static str> {
        DISCOUNT_BANDS
            .iter()
            .filter(|b| b.contains(discount))
            .map(|b| b.label)
            .collect()
    }

    #[test]
    fn boundaries_fall_in_exactly_one_band() {
        assert_eq!(band_of(0.0), vec!["No Discount (0%)"]);
        assert_eq!(band_of(0.005), vec!["Low (1-10%)"]);
        assert_eq!(band_of(0.10), vec!["Low (1-10%)"]);
        assert_eq!(band_of(0.15), vec!["Medium (11-20%)"]);
        assert_eq!(band_of(0.20), vec!["Medium (11-20%)"]);
        assert_eq!(band_of(0.2000001), vec!["High (20%+)"]);
        assert_eq!(band_of(1.0), vec!["High (20%+)"]);
        assert!(band_of(1.5).is_empty());
    }

    #[test]
    fn every_discount_in_unit_range_is_banded() {
        for step in 0..=1000 {
            let d = step as f64 / 1000.0;
            assert!(!band_of(d).is_empty(), "discount {d} fell outside every band");
        }
    }

    #[test]
    fn impact_aggregates_per_band_and_skips_empty_ones() {
        let table = with_discounts(&[0.0, 0.0, 0.5, 0.8]);
        let bands = discount_impact(&FilteredView::all(&table)).expect("discount column");

        let labels: Vec<&str> = bands.iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["No Discount (0%)", "High (20%+)"]);

        let none = &bands[0];
        assert_eq!(none.orders, 2);
        assert_eq!(none.revenue, 200.0);
        assert_eq!(none.avg_order_value, 100.0);
        assert!((none.profit_margin_pct - 10.0).abs() < 1e-9);

        let high = &bands[1];
        assert_eq!(high.orders, 2);
        assert!((high.profit - (-10.0 + -22.0)).abs() < 1e-9);
        assert!((high.profit_margin_pct + 16.0).abs() < 1e-9);
    }

    #[test]
    fn impact_absent_without_column() {
        let mut table = with_discounts(&[0.1]);
        table.columns.discount = false;
        assert!(discount_impact(&FilteredView::all(&table)).is_none());
    }
}

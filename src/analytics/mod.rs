//! Aggregation layer: every metric and table the dashboard tabs display.
//!
//! All functions take a [`FilteredView`] and are pure; [`Snapshot::compute`]
//! runs the filter and every aggregate for one filter state.
pub mod customers;
pub mod discount;
pub mod grouping;
pub mod kpi;

use serde::Serialize;

use crate::data::filter::{self, FilterState, FilteredView};
use crate::data::model::TransactionTable;

use customers::{ChurnSummary, ParetoCurve};
use discount::DiscountBand;
use grouping::{CustomerSegment, GroupBy, GroupSummary, MonthlyPoint, ProductSummary, ShareSlice};
use kpi::OverviewKpis;

/// Products shown on the sales-trends tab.
pub const TOP_PRODUCTS: usize = 10;
/// Customers plotted on the Pareto curve.
pub const PARETO_CUSTOMERS: usize = 100;

/// `num / den`, or 0 when `den` is not positive.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Round half away from zero to 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Every aggregate for one filter state, recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub kpis: OverviewKpis,
    /// Ascending region order; charts re-sort by their own metric.
    pub by_region: Vec<GroupSummary>,
    pub by_category: Vec<GroupSummary>,
    pub region_share: Vec<ShareSlice>,
    pub category_share: Vec<ShareSlice>,
    pub monthly: Vec<MonthlyPoint>,
    pub top_products: Option<Vec<ProductSummary>>,
    pub segments: Option<Vec<CustomerSegment>>,
    pub pareto: ParetoCurve,
    pub churn: Option<ChurnSummary>,
    pub discount: Option<Vec<DiscountBand>>,
}

impl Snapshot {
    /// Filter `table` and aggregate the result.
    pub fn compute(table: &TransactionTable, filters: &FilterState) -> Self {
        Self::from_view(&filter::apply(table, filters))
    }

    pub fn from_view(view: &FilteredView<'_>) -> Self {
        Snapshot {
            kpis: OverviewKpis::compute(view),
            by_region: grouping::group_summary(view, GroupBy::Region),
            by_category: grouping::group_summary(view, GroupBy::Category),
            region_share: grouping::revenue_share(view, GroupBy::Region),
            category_share: grouping::revenue_share(view, GroupBy::Category),
            monthly: grouping::monthly_trend(view),
            top_products: grouping::top_products(view, TOP_PRODUCTS),
            segments: grouping::customer_segments(view),
            pareto: customers::pareto(view, PARETO_CUSTOMERS),
            churn: customers::churn(view),
            discount: discount::discount_impact(view),
        }
    }

    /// Compact JSON of every aggregate, for trace logging.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::scenario_table;
    use super::*;

    #[test]
    fn default_filters_reproduce_unfiltered_totals() {
        let table = scenario_table();
        let filtered = Snapshot::compute(&table, &FilterState::for_table(&table));
        let unfiltered = Snapshot::from_view(&FilteredView::all(&table));
        assert_eq!(filtered, unfiltered);
        assert_eq!(filtered.kpis.row_count, 3);
        assert_eq!(filtered.kpis.total_revenue, 350.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let table = scenario_table();
        let mut filters = FilterState::for_table(&table);
        filters.categories.remove("Office");
        let first = Snapshot::compute(&table, &filters);
        let second = Snapshot::compute(&table, &filters);
        assert_eq!(first, second);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn snapshot_serializes_with_iso_dates() {
        let table = scenario_table();
        let json = Snapshot::from_view(&FilteredView::all(&table))
            .to_json()
            .expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["kpis"]["total_revenue"], 350.0);
        assert_eq!(value["kpis"]["row_count"], 3);
        assert_eq!(value["churn"]["reference_date"], "2023-02-01");
        assert_eq!(value["by_region"][0]["key"], "East");
        assert!(value["discount"].is_array());
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(5.0, 2.0), 2.5);
        assert_eq!(round2(2.345_678), 2.35);
        assert_eq!(round2(-16.666_6), -16.67);
    }
}

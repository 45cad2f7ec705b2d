use std::collections::HashSet;

use serde::Serialize;

use super::ratio;
use crate::data::filter::FilteredView;

/// Customer type counted by the repeat-customer rate.
pub const RETURNING: &str = "Returning";

/// Top-line figures of the overview tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewKpis {
    /// Line items in the view.
    pub row_count: usize,
    pub total_revenue: f64,
    pub total_profit: f64,
    /// Percent; 0 when there is no revenue.
    pub profit_margin: f64,
    /// Mean of line-item `sales`, not of per-order totals.
    ///
    /// Orders with several line items therefore weigh more than single-item
    /// orders. Kept as the dashboard has always reported it.
    pub average_order_value: f64,
    /// Distinct `order_id`s.
    pub order_count: usize,
    /// Distinct `customer_id`s.
    pub unique_customers: usize,
    pub revenue_per_customer: f64,
    /// Percent of distinct customers tagged `Returning`; 0 without the column.
    pub repeat_rate: f64,
    pub profit_per_order: f64,
}

impl OverviewKpis {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let mut total_revenue = 0.0;
        let mut total_profit = 0.0;
        let mut orders: HashSet<&str> = HashSet::new();
        let mut customers: HashSet<&str> = HashSet::new();
        let mut returning: HashSet<&str> = HashSet::new();

        for row in view.iter() {
            total_revenue += row.sales;
            total_profit += row.profit;
            orders.insert(&row.order_id);
            customers.insert(&row.customer_id);
            if row.customer_type.as_deref() == Some(RETURNING) {
                returning.insert(&row.customer_id);
            }
        }

        let row_count = view.len();
        let order_count = orders.len();
        let unique_customers = customers.len();
        let repeat_rate = if view.columns.customer_type {
            ratio(returning.len() as f64, unique_customers as f64) * 100.0
        } else {
            0.0
        };

        OverviewKpis {
            row_count,
            total_revenue,
            total_profit,
            profit_margin: ratio(total_profit, total_revenue) * 100.0,
            average_order_value: ratio(total_revenue, row_count as f64),
            order_count,
            unique_customers,
            revenue_per_customer: ratio(total_revenue, unique_customers as f64),
            repeat_rate,
            profit_per_order: ratio(total_profit, order_count as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{scenario_table, tx};
    use crate::data::filter::{apply, FilterState};
    use crate::data::model::{OptionalColumns, TransactionTable};

    #[test]
    fn west_scenario_matches_hand_computed_figures() {
        let table = scenario_table();
        let mut filters = FilterState::for_table(&table);
        filters.regions = ["West".to_string()].into();
        let kpis = OverviewKpis::compute(&apply(&table, &filters));

        assert_eq!(kpis.total_revenue, 150.0);
        assert_eq!(kpis.total_profit, 15.0);
        assert!((kpis.profit_margin - 10.0).abs() < 1e-9);
        assert_eq!(kpis.unique_customers, 1);
        assert_eq!(kpis.order_count, 2);
        assert_eq!(kpis.average_order_value, 75.0);
        assert_eq!(kpis.profit_per_order, 7.5);
        assert_eq!(kpis.repeat_rate, 0.0);
    }

    #[test]
    fn repeat_rate_counts_distinct_returning_customers() {
        let table = scenario_table();
        let kpis = OverviewKpis::compute(&FilteredView::all(&table));
        assert_eq!(kpis.unique_customers, 2);
        assert!((kpis.repeat_rate - 50.0).abs() < 1e-9);
        assert!((kpis.revenue_per_customer - 175.0).abs() < 1e-9);
    }

    #[test]
    fn repeat_rate_is_zero_without_customer_type_column() {
        let mut rows = scenario_table().rows;
        for row in &mut rows {
            row.customer_type = None;
        }
        let table = TransactionTable::from_rows(
            rows,
            OptionalColumns {
                customer_type: false,
                ..OptionalColumns::all()
            },
        );
        assert_eq!(OverviewKpis::compute(&FilteredView::all(&table)).repeat_rate, 0.0);
    }

    #[test]
    fn empty_view_degrades_to_zero() {
        let table = scenario_table();
        let mut filters = FilterState::for_table(&table);
        filters.regions.clear();
        let kpis = OverviewKpis::compute(&apply(&table, &filters));
        assert_eq!(kpis, OverviewKpis::default());
    }

    #[test]
    fn average_order_value_is_mean_of_line_items() {
        // One order with two line items, one order with a single item.
        let table = TransactionTable::from_rows(
            vec![
                tx("O1", "C1", "2023-01-01", 100.0, 0.0),
                tx("O1", "C1", "2023-01-01", 20.0, 0.0),
                tx("O2", "C2", "2023-01-02", 30.0, 0.0),
            ],
            OptionalColumns::all(),
        );
        let kpis = OverviewKpis::compute(&FilteredView::all(&table));
        assert_eq!(kpis.order_count, 2);
        assert_eq!(kpis.average_order_value, 50.0);
    }
}

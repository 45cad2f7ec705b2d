use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use serde::Serialize;

use super::{ratio, round2};
use crate::data::filter::FilteredView;
use crate::data::model::Transaction;

// ---------------------------------------------------------------------------
// Accumulator shared by the group-bys
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Totals<'a> {
    revenue: f64,
    profit: f64,
    rows: usize,
    customers: HashSet<&'a str>,
}

impl<'a> Totals<'a> {
    fn add(&mut self, row: &'a Transaction) {
        self.revenue += row.sales;
        self.profit += row.profit;
        self.rows += 1;
        self.customers.insert(&row.customer_id);
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

// ---------------------------------------------------------------------------
// Region / category summaries
// ---------------------------------------------------------------------------

/// Categorical column a summary table is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupBy {
    Region,
    Category,
}

impl GroupBy {
    fn key(self, row: &Transaction) -> &str {
        match self {
            GroupBy::Region => &row.region,
            GroupBy::Category => &row.category,
        }
    }
}

/// One row of a region or category summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub revenue: f64,
    pub profit: f64,
    /// Line items in the group.
    pub orders: usize,
    /// Distinct customers in the group.
    pub customers: usize,
    /// `profit / revenue * 100`, 2 dp.
    pub profit_margin_pct: f64,
    /// `revenue / orders`, 2 dp.
    pub avg_order_value: f64,
}

/// Metric a summary chart is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMetric {
    Revenue,
    Profit,
    Margin,
}

impl GroupMetric {
    pub fn value(self, group: &GroupSummary) -> f64 {
        match self {
            GroupMetric::Revenue => group.revenue,
            GroupMetric::Profit => group.profit,
            GroupMetric::Margin => group.profit_margin_pct,
        }
    }
}

/// Summarise the view per region or category, in ascending key order.
pub fn group_summary(view: &FilteredView<'_>, by: GroupBy) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<&str, Totals<'_>> = BTreeMap::new();
    for row in view.iter() {
        groups.entry(by.key(row)).or_default().add(row);
    }

    groups
        .into_iter()
        .map(|(key, t)| GroupSummary {
            key: key.to_string(),
            revenue: t.revenue,
            profit: t.profit,
            orders: t.rows,
            customers: t.customers.len(),
            profit_margin_pct: round2(ratio(t.profit, t.revenue) * 100.0),
            avg_order_value: round2(ratio(t.revenue, t.rows as f64)),
        })
        .collect()
}

/// Order groups by `metric`, largest first. Equal values keep their order.
pub fn sort_groups(groups: &mut [GroupSummary], metric: GroupMetric) {
    groups.sort_by(|a, b| descending(metric.value(a), metric.value(b)));
}

/// A copy of `groups` ordered by `metric`, largest first.
pub fn sorted_by(groups: &[GroupSummary], metric: GroupMetric) -> Vec<GroupSummary> {
    let mut sorted = groups.to_vec();
    sort_groups(&mut sorted, metric);
    sorted
}

/// A group's part of total revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSlice {
    pub key: String,
    pub revenue: f64,
    /// Percent of the view's revenue; 0 when there is none.
    pub share_pct: f64,
}

/// Revenue distribution over regions or categories, largest first.
pub fn revenue_share(view: &FilteredView<'_>, by: GroupBy) -> Vec<ShareSlice> {
    let mut groups = group_summary(view, by);
    sort_groups(&mut groups, GroupMetric::Revenue);
    let total: f64 = groups.iter().map(|g| g.revenue).sum();

    groups
        .into_iter()
        .map(|g| ShareSlice {
            share_pct: ratio(g.revenue, total) * 100.0,
            key: g.key,
            revenue: g.revenue,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Monthly trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub profit: f64,
    /// Line items dated in the month.
    pub orders: usize,
}

impl MonthlyPoint {
    /// `YYYY-MM`.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Revenue, profit and line-item count per calendar month, oldest first.
pub fn monthly_trend(view: &FilteredView<'_>) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), Totals<'_>> = BTreeMap::new();
    for row in view.iter() {
        let key = (row.order_date.year(), row.order_date.month());
        months.entry(key).or_default().add(row);
    }

    months
        .into_iter()
        .map(|((year, month), t)| MonthlyPoint {
            year,
            month,
            revenue: t.revenue,
            profit: t.profit,
            orders: t.rows,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Top products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_name: String,
    pub revenue: f64,
    pub profit: f64,
    pub orders: usize,
    /// 2 dp; 0 when the product has no revenue.
    pub profit_margin_pct: f64,
}

/// Best-selling products by revenue. Ties go to the alphabetically first name.
///
/// `None` when the source has no product column.
pub fn top_products(view: &FilteredView<'_>, limit: usize) -> Option<Vec<ProductSummary>> {
    if !view.columns.product_name {
        return None;
    }

    let mut products: BTreeMap<&str, Totals<'_>> = BTreeMap::new();
    for row in view.iter() {
        products.entry(&row.product_name).or_default().add(row);
    }

    let mut ranked: Vec<ProductSummary> = products
        .into_iter()
        .map(|(name, t)| ProductSummary {
            product_name: name.to_string(),
            revenue: t.revenue,
            profit: t.profit,
            orders: t.rows,
            profit_margin_pct: round2(ratio(t.profit, t.revenue) * 100.0),
        })
        .collect();
    ranked.sort_by(|a, b| descending(a.revenue, b.revenue));
    ranked.truncate(limit);
    Some(ranked)
}

// ---------------------------------------------------------------------------
// Customer segmentation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSegment {
    pub customer_type: String,
    /// Distinct customers of this type.
    pub customers: usize,
    pub revenue: f64,
    pub profit: f64,
}

/// Customers, revenue and profit per customer type.
///
/// `None` when the source has no customer-type column; rows without a type
/// are left out.
pub fn customer_segments(view: &FilteredView<'_>) -> Option<Vec<CustomerSegment>> {
    if !view.columns.customer_type {
        return None;
    }

    let mut segments: BTreeMap<&str, Totals<'_>> = BTreeMap::new();
    for row in view.iter() {
        if let Some(kind) = row.customer_type.as_deref() {
            segments.entry(kind).or_default().add(row);
        }
    }

    Some(
        segments
            .into_iter()
            .map(|(kind, t)| CustomerSegment {
                customer_type: kind.to_string(),
                customers: t.customers.len(),
                revenue: t.revenue,
                profit: t.profit,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::kpi::OverviewKpis;
    use crate::analytics::test_support::{scenario_table, tx};
    use crate::data::filter::{apply, FilterState};
    use crate::data::model::{OptionalColumns, Transaction, TransactionTable};

    fn sample() -> TransactionTable {
        let mk = |order: &str, customer: &str, region: &str, sales: f64, profit: f64| Transaction {
            region: region.into(),
            ..tx(order, customer, "2023-03-01", sales, profit)
        };
        TransactionTable::from_rows(
            vec![
                mk("O1", "C1", "West", 100.0, 30.0),
                mk("O2", "C2", "West", 300.0, -30.0),
                mk("O3", "C1", "East", 50.0, 25.0),
                mk("O4", "C3", "South", 500.0, 10.0),
                mk("O5", "C3", "South", 0.0, 0.0),
            ],
            OptionalColumns::all(),
        )
    }

    #[test]
    fn group_summary_by_region() {
        let table = sample();
        let groups = group_summary(&FilteredView::all(&table), GroupBy::Region);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["East", "South", "West"]);

        let west = &groups[2];
        assert_eq!(west.revenue, 400.0);
        assert_eq!(west.profit, 0.0);
        assert_eq!(west.orders, 2);
        assert_eq!(west.customers, 2);
        assert_eq!(west.profit_margin_pct, 0.0);
        assert_eq!(west.avg_order_value, 200.0);

        let south = &groups[1];
        assert_eq!(south.customers, 1);
        assert_eq!(south.profit_margin_pct, 2.0);
        assert_eq!(south.avg_order_value, 250.0);
    }

    #[test]
    fn each_metric_sorts_independently() {
        let table = sample();
        let groups = group_summary(&FilteredView::all(&table), GroupBy::Region);
        let keys = |metric| -> Vec<String> {
            sorted_by(&groups, metric).into_iter().map(|g| g.key).collect()
        };
        assert_eq!(keys(GroupMetric::Revenue), vec!["South", "West", "East"]);
        assert_eq!(keys(GroupMetric::Profit), vec!["East", "South", "West"]);
        assert_eq!(keys(GroupMetric::Margin), vec!["East", "South", "West"]);
    }

    #[test]
    fn region_revenue_sums_to_total() {
        let table = sample();
        let view = FilteredView::all(&table);
        let groups = group_summary(&view, GroupBy::Region);
        let kpis = OverviewKpis::compute(&view);
        let revenue: f64 = groups.iter().map(|g| g.revenue).sum();
        let profit: f64 = groups.iter().map(|g| g.profit).sum();
        assert!((revenue - kpis.total_revenue).abs() < 1e-9);
        assert!((profit - kpis.total_profit).abs() < 1e-9);
    }

    #[test]
    fn revenue_share_is_percent_of_total() {
        let table = sample();
        let shares = revenue_share(&FilteredView::all(&table), GroupBy::Region);
        assert_eq!(shares[0].key, "South");
        assert!((shares[0].share_pct - 52.631578947).abs() < 1e-6);
        let total: f64 = shares.iter().map(|s| s.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_trend_is_chronological() {
        let table = scenario_table();
        let mut rows = table.rows.clone();
        rows.reverse();
        let reversed = TransactionTable::from_rows(rows, table.columns);

        for t in [&table, &reversed] {
            let months = monthly_trend(&FilteredView::all(t));
            assert_eq!(months.len(), 2);
            assert_eq!(months[0].label(), "2023-01");
            assert_eq!(months[0].revenue, 150.0);
            assert_eq!(months[0].profit, 15.0);
            assert_eq!(months[0].orders, 2);
            assert_eq!(months[1].label(), "2023-02");
            assert_eq!(months[1].revenue, 200.0);
            assert_eq!(months[1].profit, 40.0);
            assert_eq!(months[1].orders, 1);
        }
    }

    #[test]
    fn top_products_ranks_and_truncates() {
        let rows: Vec<Transaction> = (0..12)
            .map(|i| Transaction {
                product_name: format!("P{i:02}"),
                ..tx(&format!("O{i}"), "C1", "2023-01-01", 10.0 * (i + 1) as f64, 1.0)
            })
            .collect();
        let table = TransactionTable::from_rows(rows, OptionalColumns::all());
        let top = top_products(&FilteredView::all(&table), 10).expect("product column");

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].product_name, "P11");
        assert_eq!(top[0].revenue, 120.0);
        assert_eq!(top[9].product_name, "P02");
        assert!(top.windows(2).all(|w| w[0].revenue >= w[1].revenue));
        assert_eq!(top[0].profit_margin_pct, 0.83);
    }

    #[test]
    fn top_products_ties_break_by_name() {
        let table = TransactionTable::from_rows(
            vec![
                Transaction {
                    product_name: "Zebra".into(),
                    ..tx("O1", "C1", "2023-01-01", 10.0, 1.0)
                },
                Transaction {
                    product_name: "Apple".into(),
                    ..tx("O2", "C1", "2023-01-01", 10.0, 1.0)
                },
            ],
            OptionalColumns::all(),
        );
        let top = top_products(&FilteredView::all(&table), 10).unwrap();
        assert_eq!(top[0].product_name, "Apple");
    }

    #[test]
    fn top_products_absent_without_column() {
        let mut table = sample();
        table.columns.product_name = false;
        assert!(top_products(&FilteredView::all(&table), 10).is_none());
    }

    #[test]
    fn customer_segments_count_distinct_customers() {
        let table = scenario_table();
        let segments = customer_segments(&FilteredView::all(&table)).expect("type column");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].customer_type, "New");
        assert_eq!(segments[0].customers, 1);
        assert_eq!(segments[0].revenue, 150.0);
        assert_eq!(segments[1].customer_type, "Returning");
        assert_eq!(segments[1].profit, 40.0);
    }

    #[test]
    fn empty_view_yields_empty_tables() {
        let table = scenario_table();
        let mut filters = FilterState::for_table(&table);
        filters.categories.clear();
        let view = apply(&table, &filters);
        assert!(group_summary(&view, GroupBy::Category).is_empty());
        assert!(revenue_share(&view, GroupBy::Region).is_empty());
        assert!(monthly_trend(&view).is_empty());
        assert_eq!(top_products(&view, 10), Some(Vec::new()));
        assert_eq!(customer_segments(&view), Some(Vec::new()));
    }
}

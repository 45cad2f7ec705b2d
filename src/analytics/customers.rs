use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::ratio;
use crate::data::filter::FilteredView;

// ---------------------------------------------------------------------------
// Pareto – customer revenue concentration
// ---------------------------------------------------------------------------

/// One customer on the Pareto curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoPoint {
    /// 1-based position in descending revenue order.
    pub rank: usize,
    pub customer_id: String,
    pub revenue: f64,
    /// Running revenue of ranks `1..=rank` as a percent of the view's revenue.
    pub cumulative_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParetoCurve {
    /// The first `limit` customers.
    pub points: Vec<ParetoPoint>,
    /// Customers in the view before truncation.
    pub total_customers: usize,
    pub total_revenue: f64,
}

/// Every customer in descending revenue order with cumulative percentages.
///
/// Equal totals are ordered by ascending `customer_id`, so repeated runs on
/// the same rows give the same curve.
pub fn full_curve(view: &FilteredView<'_>) -> Vec<ParetoPoint> {
    let mut per_customer: BTreeMap<&str, f64> = BTreeMap::new();
    for row in view.iter() {
        *per_customer.entry(&row.customer_id).or_default() += row.sales;
    }

    // BTreeMap yields ids ascending; the stable sort keeps that for ties.
    let mut ranked: Vec<(&str, f64)> = per_customer.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let grand_total: f64 = ranked.iter().map(|(_, v)| v).sum();
    let mut running = 0.0;
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (customer_id, revenue))| {
            running += revenue;
            ParetoPoint {
                rank: i + 1,
                customer_id: customer_id.to_string(),
                revenue,
                cumulative_pct: ratio(running, grand_total) * 100.0,
            }
        })
        .collect()
}

/// The Pareto curve of the top `limit` customers.
pub fn pareto(view: &FilteredView<'_>, limit: usize) -> ParetoCurve {
    let mut points = full_curve(view);
    let total_customers = points.len();
    let total_revenue = points.iter().map(|p| p.revenue).sum();
    points.truncate(limit);
    ParetoCurve {
        points,
        total_customers,
        total_revenue,
    }
}

// ---------------------------------------------------------------------------
// Churn – recency relative to the newest order in the view
// ---------------------------------------------------------------------------

/// Number of equal-width bins of the days-since-last-order histogram.
pub const CHURN_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge, in days.
    pub start: f64,
    /// Exclusive upper edge (inclusive for the last bin).
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnSummary {
    /// Newest order date in the view, standing in for "today".
    pub reference_date: NaiveDate,
    pub total_customers: usize,
    pub median_days: f64,
    /// Customers whose last order is strictly older than the median.
    pub at_risk_count: usize,
    pub at_risk_pct: f64,
    /// Days since last order, one entry per customer, by ascending customer id.
    pub days_since_last_order: Vec<i64>,
    pub histogram: Vec<HistogramBin>,
}

/// Recency of every customer relative to the newest order in the view.
///
/// `None` for an empty view.
pub fn churn(view: &FilteredView<'_>) -> Option<ChurnSummary> {
    let reference_date = view.iter().map(|row| row.order_date).max()?;

    let mut last_order: BTreeMap<&str, NaiveDate> = BTreeMap::new();
    for row in view.iter() {
        last_order
            .entry(&row.customer_id)
            .and_modify(|d| *d = (*d).max(row.order_date))
            .or_insert(row.order_date);
    }

    let days: Vec<i64> = last_order
        .values()
        .map(|last| (reference_date - *last).num_days())
        .collect();
    let total_customers = days.len();
    let median_days = median(&days);
    let at_risk_count = days.iter().filter(|&&d| d as f64 > median_days).count();

    Some(ChurnSummary {
        reference_date,
        total_customers,
        median_days,
        at_risk_count,
        at_risk_pct: ratio(at_risk_count as f64, total_customers as f64) * 100.0,
        histogram: histogram(&days, CHURN_HISTOGRAM_BINS),
        days_since_last_order: days,
    })
}

/// Median, averaging the two middle values for an even count. 0 when empty.
fn median(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Equal-width bins over `[0, max]`.
fn histogram(values: &[i64], bins: usize) -> Vec<HistogramBin> {
    let Some(&max) = values.iter().max() else {
        return Vec::new();
    };
    if max <= 0 || bins == 0 {
        return vec![HistogramBin {
            start: 0.0,
            end: max.max(0) as f64,
            count: values.len(),
        }];
    }

    let width = max as f64 / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = ((v as f64 / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: i as f64 * width,
            end: (i + 1) as f64 * width,
            count,
        })
        .collect()
}

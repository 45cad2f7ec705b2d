use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Transaction – one line item of an order
// ---------------------------------------------------------------------------

/// A single order line item (one row of the cleaned superstore table).
///
/// `order_id` is shared by every line item of the same order, so it is not a
/// row key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: Option<NaiveDate>,
    pub customer_id: String,
    /// `"New"` / `"Returning"`; `None` when the source has no such column.
    pub customer_type: Option<String>,
    pub region: String,
    pub category: String,
    pub product_name: String,
    /// Revenue of this line item.
    pub sales: f64,
    /// May be negative.
    pub profit: f64,
    /// Fraction in `[0, 1]`.
    pub discount: f64,
}

/// Filter value standing in for a blank `customer_type` cell.
pub const NO_CUSTOMER_TYPE: &str = "(not set)";

impl Transaction {
    /// The customer type as the filter sees it; blank cells map to
    /// [`NO_CUSTOMER_TYPE`].
    pub fn customer_type_key(&self) -> &str {
        self.customer_type.as_deref().unwrap_or(NO_CUSTOMER_TYPE)
    }
}

// ---------------------------------------------------------------------------
// OptionalColumns – which optional source columns were present
// ---------------------------------------------------------------------------

/// Presence flags for columns the dashboard can live without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OptionalColumns {
    pub customer_type: bool,
    pub product_name: bool,
    pub discount: bool,
    pub ship_date: bool,
}

impl OptionalColumns {
    pub fn all() -> Self {
        Self {
            customer_type: true,
            product_name: true,
            discount: true,
            ship_date: true,
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter domains.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    /// All line items, in source order.
    pub rows: Vec<Transaction>,
    pub columns: OptionalColumns,
    /// Sorted distinct regions.
    pub regions: BTreeSet<String>,
    /// Sorted distinct categories.
    pub categories: BTreeSet<String>,
    /// Sorted distinct customer types, including [`NO_CUSTOMER_TYPE`] when
    /// some cells are blank. Empty when the column is absent.
    pub customer_types: BTreeSet<String>,
    /// `(min, max)` order date, `None` for an empty table.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl TransactionTable {
    /// Build the filter domains from the loaded rows.
    pub fn from_rows(rows: Vec<Transaction>, columns: OptionalColumns) -> Self {
        let mut regions = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut customer_types = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for row in &rows {
            regions.insert(row.region.clone());
            categories.insert(row.category.clone());
            if columns.customer_type {
                customer_types.insert(row.customer_type_key().to_string());
            }
            date_bounds = Some(match date_bounds {
                None => (row.order_date, row.order_date),
                Some((lo, hi)) => (lo.min(row.order_date), hi.max(row.order_date)),
            });
        }

        TransactionTable {
            rows,
            columns,
            regions,
            categories,
            customer_types,
            date_bounds,
        }
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// KpiSheet – precomputed top-line figures
// ---------------------------------------------------------------------------

/// A single value of the precomputed KPI sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

impl KpiValue {
    /// Numbers parse as such, everything else stays text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => KpiValue::Number(v),
            _ => KpiValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KpiValue::Number(v) => Some(*v),
            KpiValue::Text(_) => None,
        }
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            KpiValue::Number(v) => write!(f, "{v:.2}"),
            KpiValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Precomputed KPI name → value, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSheet {
    entries: Vec<(String, KpiValue)>,
    index: BTreeMap<String, usize>,
}

impl KpiSheet {
    /// Insert or replace a metric. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: KpiValue) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&KpiValue> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KpiValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region: &str, date: (i32, u32, u32), kind: Option<&str>) -> Transaction {
        Transaction {
            order_id: "O1".into(),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            ship_date: None,
            customer_id: "C1".into(),
            customer_type: kind.map(str::to_string),
            region: region.into(),
            category: "Tech".into(),
            product_name: "Widget".into(),
            sales: 1.0,
            profit: 0.5,
            discount: 0.0,
        }
    }

    #[test]
    fn from_rows_collects_domains_and_bounds() {
        let table = TransactionTable::from_rows(
            vec![
                row("West", (2023, 3, 1), Some("New")),
                row("East", (2023, 1, 9), Some("Returning")),
                row("West", (2023, 2, 2), None),
            ],
            OptionalColumns::all(),
        );

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.regions.iter().collect::<Vec<_>>(),
            vec!["East", "West"]
        );
        assert_eq!(
            table.customer_types.iter().collect::<Vec<_>>(),
            vec![NO_CUSTOMER_TYPE, "New", "Returning"]
        );
        let (lo, hi) = table.date_bounds.unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2023, 1, 9).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let table = TransactionTable::from_rows(Vec::new(), OptionalColumns::default());
        assert!(table.is_empty());
        assert!(table.date_bounds.is_none());
    }

    #[test]
    fn kpi_sheet_keeps_file_order_and_replaces_in_place() {
        let mut sheet = KpiSheet::default();
        sheet.insert("Total Revenue", KpiValue::parse("2297200.86"));
        sheet.insert("Top Region", KpiValue::parse("West"));
        sheet.insert("Total Revenue", KpiValue::parse("10"));

        let names: Vec<&str> = sheet.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Total Revenue", "Top Region"]);
        assert_eq!(sheet.get("Total Revenue"), Some(&KpiValue::Number(10.0)));
        assert_eq!(sheet.get("Top Region").unwrap().to_string(), "West");
    }
}

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{OptionalColumns, Transaction, TransactionTable};

// ---------------------------------------------------------------------------
// Filter predicate: date range + selected values per dimension
// ---------------------------------------------------------------------------

/// Categorical columns the side panel filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Region,
    Category,
    CustomerType,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 3] = [
        FilterDimension::Region,
        FilterDimension::Category,
        FilterDimension::CustomerType,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterDimension::Region => "Region",
            FilterDimension::Category => "Category",
            FilterDimension::CustomerType => "Customer type",
        }
    }

    /// Every distinct value of this dimension in `table`.
    pub fn domain(self, table: &TransactionTable) -> &BTreeSet<String> {
        match self {
            FilterDimension::Region => &table.regions,
            FilterDimension::Category => &table.categories,
            FilterDimension::CustomerType => &table.customer_types,
        }
    }
}

/// Active filter selections.
///
/// Unlike an absent filter, an empty selected set hides everything.
/// `customer_types` is `None` when the dataset has no customer-type column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Inclusive `[start, end]`, compared on the date only. `None` keeps every date.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub customer_types: Option<BTreeSet<String>>,
}

impl FilterState {
    /// Everything selected: reproduces the unfiltered table exactly.
    pub fn for_table(table: &TransactionTable) -> Self {
        FilterState {
            date_range: table.date_bounds,
            regions: table.regions.clone(),
            categories: table.categories.clone(),
            customer_types: table
                .columns
                .customer_type
                .then(|| table.customer_types.clone()),
        }
    }

    /// Whether this state still selects the whole table.
    pub fn is_default_for(&self, table: &TransactionTable) -> bool {
        *self == FilterState::for_table(table)
    }

    /// Selected values of one dimension; `None` when that filter is inactive.
    pub fn selected(&self, dim: FilterDimension) -> Option<&BTreeSet<String>> {
        match dim {
            FilterDimension::Region => Some(&self.regions),
            FilterDimension::Category => Some(&self.categories),
            FilterDimension::CustomerType => self.customer_types.as_ref(),
        }
    }

    fn selected_mut(&mut self, dim: FilterDimension) -> Option<&mut BTreeSet<String>> {
        match dim {
            FilterDimension::Region => Some(&mut self.regions),
            FilterDimension::Category => Some(&mut self.categories),
            FilterDimension::CustomerType => self.customer_types.as_mut(),
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dim: FilterDimension, value: &str) {
        if let Some(selected) = self.selected_mut(dim) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
        }
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dim: FilterDimension, table: &TransactionTable) {
        let all = dim.domain(table).clone();
        if let Some(selected) = self.selected_mut(dim) {
            *selected = all;
        }
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dim: FilterDimension) {
        if let Some(selected) = self.selected_mut(dim) {
            selected.clear();
        }
    }

    /// Set the date range, clamped to the table's bounds.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate, table: &TransactionTable) {
        self.date_range = Some(match table.date_bounds {
            Some((lo, hi)) => (start.clamp(lo, hi), end.clamp(lo, hi)),
            None => (start, end),
        });
    }

    /// Whether one row passes every active predicate.
    pub fn matches(&self, row: &Transaction) -> bool {
        if let Some((start, end)) = self.date_range {
            if row.order_date < start || row.order_date > end {
                return false;
            }
        }
        if !self.regions.contains(&row.region) || !self.categories.contains(&row.category) {
            return false;
        }
        match &self.customer_types {
            Some(selected) => selected.contains(row.customer_type_key()),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows of one recomputation pass
// ---------------------------------------------------------------------------

/// The rows of a [`TransactionTable`] that pass a [`FilterState`], in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Transaction>,
    pub columns: OptionalColumns,
}

impl<'a> FilteredView<'a> {
    /// Every row of `table`, unfiltered.
    pub fn all(table: &'a TransactionTable) -> Self {
        FilteredView {
            rows: table.rows.iter().collect(),
            columns: table.columns,
        }
    }

    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply `filters` to `table`. Pure: the table is never touched.
pub fn apply<'a>(table: &'a TransactionTable, filters: &FilterState) -> FilteredView<'a> {
    // The customer-type predicate only exists when the column does.
    let customer_types = if table.columns.customer_type {
        filters.customer_types.clone()
    } else {
        None
    };
    let effective = FilterState {
        customer_types,
        ..filters.clone()
    };

    FilteredView {
        rows: table.rows.iter().filter(|row| effective.matches(row)).collect(),
        columns: table.columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{OptionalColumns, NO_CUSTOMER_TYPE};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(order: &str, day: NaiveDate, region: &str, category: &str, kind: &str) -> Transaction {
        Transaction {
            order_id: order.into(),
            order_date: day,
            ship_date: None,
            customer_id: format!("C-{order}"),
            customer_type: Some(kind.into()),
            region: region.into(),
            category: category.into(),
            product_name: "Widget".into(),
            sales: 10.0,
            profit: 1.0,
            discount: 0.0,
        }
    }

    fn table() -> TransactionTable {
        TransactionTable::from_rows(
            vec![
                row("O1", date(2023, 1, 5), "West", "Tech", "New"),
                row("O2", date(2023, 1, 20), "West", "Office", "Returning"),
                row("O3", date(2023, 2, 1), "East", "Tech", "Returning"),
                row("O4", date(2023, 3, 15), "South", "Furniture", "New"),
            ],
            OptionalColumns::all(),
        )
    }

    #[test]
    fn default_state_keeps_every_row() {
        let table = table();
        let filters = FilterState::for_table(&table);
        let view = apply(&table, &filters);
        assert_eq!(view.len(), table.len());
        assert!(filters.is_default_for(&table));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let table = table();
        let mut filters = FilterState::for_table(&table);
        filters.date_range = Some((date(2023, 1, 20), date(2023, 2, 1)));
        let ids: Vec<&str> = apply(&table, &filters)
            .iter()
            .map(|r| r.order_id.as_str())
            .collect();
        assert_eq!(ids, vec!["O2", "O3"]);
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let table = table();
        let mut filters = FilterState::for_table(&table);
        filters.date_range = Some((date(2023, 3, 1), date(2023, 1, 1)));
        assert!(apply(&table, &filters).is_empty());
    }

    #[test]
    fn predicates_are_anded() {
        let table = table();
        let mut filters = FilterState::for_table(&table);
        filters.toggle(FilterDimension::Region, "East");
        filters.toggle(FilterDimension::Region, "South");
        filters.toggle(FilterDimension::CustomerType, "New");

        let view = apply(&table, &filters);
        assert_eq!(view.len(), 1);
        let kept = view.rows()[0];
        assert_eq!(kept.region, "West");
        assert_eq!(kept.customer_type.as_deref(), Some("Returning"));
        assert!(view.iter().all(|r| filters.matches(r)));
    }

    #[test]
    fn empty_selection_hides_everything() {
        let table = table();
        let mut filters = FilterState::for_table(&table);
        filters.select_none(FilterDimension::Category);
        assert!(apply(&table, &filters).is_empty());

        filters.select_all(FilterDimension::Category, &table);
        assert_eq!(apply(&table, &filters).len(), 4);
    }

    #[test]
    fn customer_type_filter_ignored_without_column() {
        let mut table = table();
        table.columns.customer_type = false;
        let mut filters = FilterState::for_table(&table);
        assert!(filters.customer_types.is_none());

        filters.customer_types = Some(BTreeSet::new());
        assert_eq!(apply(&table, &filters).len(), 4);
    }

    #[test]
    fn blank_customer_type_is_its_own_filter_value() {
        let mut untyped = row("O5", date(2023, 3, 20), "East", "Tech", "");
        untyped.customer_type = None;
        let mut rows = table().rows;
        rows.push(untyped);
        let table = TransactionTable::from_rows(rows, OptionalColumns::all());

        let mut filters = FilterState::for_table(&table);
        assert!(filters
            .customer_types
            .as_ref()
            .is_some_and(|set| set.contains(NO_CUSTOMER_TYPE)));
        assert_eq!(apply(&table, &filters).len(), table.len());

        filters.toggle(FilterDimension::CustomerType, NO_CUSTOMER_TYPE);
        let view = apply(&table, &filters);
        assert_eq!(view.len(), 4);
        assert!(view.iter().all(|r| r.customer_type.is_some()));
    }

    #[test]
    fn set_date_range_clamps_to_bounds() {
        let table = table();
        let mut filters = FilterState::for_table(&table);
        filters.set_date_range(date(2020, 1, 1), date(2030, 1, 1), &table);
        assert_eq!(filters.date_range, table.date_bounds);
    }
}

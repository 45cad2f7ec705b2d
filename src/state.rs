use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use rusty_storefront::analytics::Snapshot;
use rusty_storefront::data::cache::DatasetCache;
use rusty_storefront::data::filter::{FilterDimension, FilterState};
use rusty_storefront::data::loader::load_kpis;
use rusty_storefront::data::model::{KpiSheet, TransactionTable};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    SalesTrends,
    CustomerInsights,
    RegionalAnalysis,
    DiscountImpact,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::SalesTrends,
        Tab::CustomerInsights,
        Tab::RegionalAnalysis,
        Tab::DiscountImpact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview KPIs",
            Tab::SalesTrends => "Sales Trends",
            Tab::CustomerInsights => "Customer Insights",
            Tab::RegionalAnalysis => "Regional Analysis",
            Tab::DiscountImpact => "Discount Impact",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded tables, reused across reopen/reload of an unchanged file.
    pub cache: DatasetCache,

    /// Source of the current dataset.
    pub data_path: Option<PathBuf>,

    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<TransactionTable>>,

    /// Source of the precomputed KPI sheet.
    pub kpi_path: Option<PathBuf>,

    /// Precomputed KPIs, independent of the filters.
    pub kpis: Option<KpiSheet>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Aggregates for the current filters (recomputed on every change).
    pub snapshot: Option<Snapshot>,

    pub active_tab: Tab,

    /// Stable colours per region / category, built once per dataset.
    pub region_colors: Option<ColorMap>,
    pub category_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Open (or re-open from cache) a transaction file.
    ///
    /// On failure the previous dataset is dropped: no partial data is shown.
    pub fn open_dataset(&mut self, path: &Path) -> Result<()> {
        let loaded = self
            .cache
            .get_or_load(path)
            .with_context(|| format!("loading {}", path.display()));

        match loaded {
            Ok(table) => {
                self.data_path = Some(path.to_path_buf());
                self.set_dataset(table);
                Ok(())
            }
            Err(e) => {
                self.dataset = None;
                self.snapshot = None;
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Open the precomputed KPI sheet.
    pub fn open_kpis(&mut self, path: &Path) -> Result<()> {
        match load_kpis(path).with_context(|| format!("loading {}", path.display())) {
            Ok(sheet) => {
                self.kpi_path = Some(path.to_path_buf());
                self.kpis = Some(sheet);
                Ok(())
            }
            Err(e) => {
                self.kpis = None;
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Re-read both files; unchanged files come from the cache.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(path) = self.data_path.clone() {
            let filters = self.filters.clone();
            self.open_dataset(&path)?;
            self.restore_filters(filters);
        }
        if let Some(path) = self.kpi_path.clone() {
            self.open_kpis(&path)?;
        }
        Ok(())
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<TransactionTable>) {
        self.filters = FilterState::for_table(&dataset);
        self.region_colors = Some(ColorMap::new(&dataset.regions));
        self.category_colors = Some(ColorMap::new(&dataset.categories));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Keep selections that still exist after a reload.
    fn restore_filters(&mut self, previous: FilterState) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        let mut restored = FilterState::for_table(&ds);
        restored.regions = previous.regions.intersection(&ds.regions).cloned().collect();
        restored.categories = previous
            .categories
            .intersection(&ds.categories)
            .cloned()
            .collect();
        if let (Some(current), Some(prev)) = (restored.customer_types.as_mut(), previous.customer_types) {
            current.retain(|kind| prev.contains(kind));
        }
        self.filters = restored;
        if let Some((start, end)) = previous.date_range {
            self.filters.set_date_range(start, end, &ds);
        }
        self.refilter();
    }

    /// Recompute every aggregate after a filter change.
    pub fn refilter(&mut self) {
        self.snapshot = self
            .dataset
            .as_deref()
            .map(|ds| Snapshot::compute(ds, &self.filters));
        if let Some(snapshot) = &self.snapshot {
            log::debug!(
                "recomputed snapshot: {} rows, {} orders",
                snapshot.kpis.row_count,
                snapshot.kpis.order_count
            );
            if log::log_enabled!(log::Level::Trace) {
                match snapshot.to_json() {
                    Ok(json) => log::trace!("snapshot: {json}"),
                    Err(e) => log::warn!("could not serialize snapshot: {e}"),
                }
            }
        }
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dim: FilterDimension, value: &str) {
        self.filters.toggle(dim, value);
        self.refilter();
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dim: FilterDimension) {
        if let Some(ds) = self.dataset.clone() {
            self.filters.select_all(dim, &ds);
            self.refilter();
        }
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dim: FilterDimension) {
        self.filters.select_none(dim);
        self.refilter();
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        if let Some(ds) = self.dataset.clone() {
            self.filters.set_date_range(start, end, &ds);
            self.refilter();
        }
    }

    /// Back to "everything selected".
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = FilterState::for_table(ds);
            self.refilter();
        }
    }

    /// Rows passing the current filters.
    pub fn visible_rows(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.kpis.row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn orders_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "Order ID,Order Date,Customer ID,customer_type,Region,Category,Sales,Profit,Discount"
        )
        .unwrap();
        writeln!(file, "O1,2023-01-05,C1,New,West,Tech,100,20,0").unwrap();
        writeln!(file, "O2,2023-01-20,C1,New,West,Tech,50,-5,0.15").unwrap();
        writeln!(file, "O3,2023-02-01,C2,Returning,East,Office,200,40,0").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn opening_a_dataset_computes_a_full_snapshot() {
        let file = orders_file();
        let mut state = AppState::default();
        state.open_dataset(file.path()).expect("open");

        assert_eq!(state.visible_rows(), 3);
        assert!(state.status_message.is_none());
        assert_eq!(state.snapshot.as_ref().unwrap().kpis.total_revenue, 350.0);
    }

    #[test]
    fn filter_changes_recompute_the_snapshot() {
        let file = orders_file();
        let mut state = AppState::default();
        state.open_dataset(file.path()).expect("open");

        state.toggle_filter_value(FilterDimension::Region, "East");
        let kpis = &state.snapshot.as_ref().unwrap().kpis;
        assert_eq!(kpis.total_revenue, 150.0);
        assert_eq!(kpis.order_count, 2);

        state.select_none(FilterDimension::Category);
        assert_eq!(state.visible_rows(), 0);

        state.reset_filters();
        assert_eq!(state.visible_rows(), 3);
    }

    #[test]
    fn reload_keeps_surviving_selections() {
        let file = orders_file();
        let mut state = AppState::default();
        state.open_dataset(file.path()).expect("open");
        state.toggle_filter_value(FilterDimension::Region, "East");

        state.reload().expect("reload");
        assert!(!state.filters.regions.contains("East"));
        assert_eq!(state.visible_rows(), 2);
    }

    #[test]
    fn failed_open_clears_data_and_reports() {
        let file = orders_file();
        let mut state = AppState::default();
        state.open_dataset(file.path()).expect("open");

        assert!(state.open_dataset(Path::new("/missing/orders.csv")).is_err());
        assert!(state.dataset.is_none());
        assert!(state.snapshot.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}

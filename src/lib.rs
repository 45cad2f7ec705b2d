//! E-commerce sales & customer analytics.
//!
//! [`data`] loads and filters the transaction table, [`analytics`] turns a
//! filtered view into the tables and figures the dashboard renders.

pub mod analytics;
pub mod data;

pub use analytics::Snapshot;
pub use data::filter::{FilterState, FilteredView};
pub use data::loader::{load_file, load_kpis, LoadError};
pub use data::model::{KpiSheet, KpiValue, Transaction, TransactionTable};

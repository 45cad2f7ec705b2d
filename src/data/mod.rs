//! Data layer: core types, loading, caching and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet        kpis.csv
//!        │                           │
//!        ▼                           ▼
//!   ┌──────────┐               ┌──────────┐
//!   │  cache    │──► loader    │  loader   │  load_kpis → KpiSheet
//!   └──────────┘               └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ TransactionTable  │  Vec<Transaction>, filter domains, date bounds
//!   └──────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  date range + selected values → FilteredView
//!   └──────────┘
//! ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;

mod app;
mod color;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::StorefrontApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

const DEFAULT_DATA: &str = "data/processed/superstore_cleaned.csv";
const DEFAULT_KPIS: &str = "data/processed/kpis.csv";

/// Interactive sales and customer analytics over an order-level export.
#[derive(Parser, Debug)]
#[command(name = "rusty-storefront", version)]
struct Args {
    /// Transactions file (csv, json or parquet). Defaults to
    /// `data/processed/superstore_cleaned.csv` when that file exists.
    #[arg(long, env = "STOREFRONT_DATA")]
    data: Option<PathBuf>,

    /// Precomputed KPI sheet (`KPI,Value` csv). Defaults to
    /// `data/processed/kpis.csv` when that file exists.
    #[arg(long, env = "STOREFRONT_KPIS")]
    kpis: Option<PathBuf>,
}

/// An explicit path, or the default when it exists on disk.
fn resolve(explicit: Option<PathBuf>, default: &str) -> Option<PathBuf> {
    explicit.or_else(|| {
        let path = Path::new(default);
        path.is_file().then(|| path.to_path_buf())
    })
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::default();
    if let Some(path) = resolve(args.data, DEFAULT_DATA) {
        ui::panels::open_dataset(&mut state, path);
    } else {
        log::info!("No transactions file given; use File → Open transactions…");
    }
    if let Some(path) = resolve(args.kpis, DEFAULT_KPIS) {
        ui::panels::open_kpis(&mut state, path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Storefront – E-Commerce Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(StorefrontApp::new(state)))),
    )
}

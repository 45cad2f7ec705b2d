use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use rusty_storefront::{load_file, load_kpis};

const REQUIRED_DIRS: [&str; 4] = ["data/raw", "data/processed", "dashboard", "reports"];

const DATA_FILES: [(&str, &str); 3] = [
    ("data/raw/superstore.csv", "Raw Data"),
    ("data/processed/superstore_cleaned.csv", "Cleaned Data"),
    ("data/processed/kpis.csv", "KPI Metrics"),
];

const SAMPLE_ROWS: usize = 5;

/// Check that a project checkout has its directories and data files in place.
#[derive(Parser, Debug)]
#[command(name = "verify-setup")]
struct Args {
    /// Project root.
    #[arg(default_value = ".")]
    root: PathBuf,
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{title}");
    println!("{}", "=".repeat(80));
}

fn check_structure(root: &Path) -> bool {
    banner("1. CHECKING PROJECT STRUCTURE");
    let mut all_good = true;
    for dir in REQUIRED_DIRS {
        if root.join(dir).is_dir() {
            println!("OK       {dir}/");
        } else {
            println!("MISSING  {dir}/");
            all_good = false;
        }
    }
    all_good
}

/// `(rows, columns)` of the first [`SAMPLE_ROWS`] data rows.
fn sample_shape(path: &Path) -> Result<(usize, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let columns = reader.byte_headers()?.len();
    let mut rows = 0;
    for record in reader.byte_records().take(SAMPLE_ROWS) {
        record.with_context(|| format!("row {}", rows + 1))?;
        rows += 1;
    }
    Ok((rows, columns))
}

fn check_data(root: &Path) -> bool {
    banner("2. CHECKING DATA FILES");
    let mut all_good = true;
    for (file, description) in DATA_FILES {
        let path = root.join(file);
        if !path.is_file() {
            println!("MISSING  {description} ({file})");
            all_good = false;
            continue;
        }
        match sample_shape(&path) {
            Ok((rows, columns)) => {
                println!("OK       {description} ({file})");
                println!("         Shape: ({rows}, {columns})");
            }
            Err(e) => {
                log::error!("{file}: {e:#}");
                println!("ERROR    {description}: {e:#}");
                all_good = false;
            }
        }
    }
    all_good
}

/// Full load of the dashboard inputs with the dashboard's own loaders.
fn check_schema(root: &Path) -> bool {
    banner("3. CHECKING DASHBOARD INPUTS");
    let mut all_good = true;

    let data = root.join(DATA_FILES[1].0);
    match load_file(&data) {
        Ok(table) => println!(
            "OK       {} rows, {} regions, {} categories",
            table.len(),
            table.regions.len(),
            table.categories.len()
        ),
        Err(e) => {
            println!("ERROR    {}: {e}", data.display());
            all_good = false;
        }
    }

    let kpis = root.join(DATA_FILES[2].0);
    match load_kpis(&kpis) {
        Ok(sheet) => println!("OK       {} precomputed KPIs", sheet.len()),
        Err(e) => {
            println!("ERROR    {}: {e}", kpis.display());
            all_good = false;
        }
    }
    all_good
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::debug!("verifying {}", args.root.display());

    println!("\n{}", "#".repeat(80));
    println!("E-COMMERCE ANALYTICS - PROJECT VERIFICATION");
    println!("{}", "#".repeat(80));

    let results = [
        ("Structure", check_structure(&args.root)),
        ("Data", check_data(&args.root)),
        ("Inputs", check_schema(&args.root)),
    ];

    banner("VERIFICATION SUMMARY");
    for (name, passed) in results {
        println!("{name:20} {}", if passed { "PASS" } else { "FAIL" });
    }

    let all_passed = results.iter().all(|(_, passed)| *passed);
    println!("\n{}", "#".repeat(80));
    if all_passed {
        println!("ALL CHECKS PASSED");
        ExitCode::SUCCESS
    } else {
        println!("SOME CHECKS FAILED. Review the errors above.");
        ExitCode::FAILURE
    }
}

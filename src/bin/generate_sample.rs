use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use clap::{Parser, ValueEnum};
use parquet::arrow::ArrowWriter;

use rusty_storefront::analytics::kpi::OverviewKpis;
use rusty_storefront::data::loader::columns;
use rusty_storefront::data::model::{OptionalColumns, Transaction, TransactionTable};
use rusty_storefront::FilteredView;

const REGIONS: [&str; 4] = ["Central", "East", "South", "West"];

const PRODUCTS: [(&str, &[(&str, f64)]); 3] = [
    (
        "Furniture",
        &[
            ("Bretford Rectangular Conference Table", 520.0),
            ("Global Deluxe Stacking Chair", 95.0),
            ("Hon 4700 Series Mobuis Mid-Back Task Chairs", 340.0),
            ("Eldon Wave Desk Accessories", 12.0),
            ("Howard Miller 14\" Diameter Wall Clock", 55.0),
        ],
    ),
    (
        "Office Supplies",
        &[
            ("Avery Durable Binders", 8.0),
            ("Staples Wirebound Notebooks", 14.0),
            ("Xerox 1967 Copy Paper", 18.0),
            ("Fellowes Bankers Box Storage", 40.0),
            ("Acme Forged Steel Scissors", 22.0),
            ("Eldon Fold 'N Roll Cart System", 75.0),
        ],
    ),
    (
        "Technology",
        &[
            ("Apple iPhone 5", 650.0),
            ("Logitech Wireless Mouse", 30.0),
            ("Canon imageCLASS Copier", 1900.0),
            ("Cisco Desktop Phone", 180.0),
            ("Samsung Galaxy Tab", 420.0),
        ],
    ),
];

const DISCOUNTS: [f64; 8] = [0.0, 0.0, 0.0, 0.0, 0.05, 0.1, 0.2, 0.4];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Parquet,
}

/// Write a deterministic synthetic superstore export and its KPI sheet.
#[derive(Parser, Debug)]
#[command(name = "generate-sample")]
struct Args {
    /// Output directory.
    #[arg(long, default_value = "data/processed")]
    out_dir: PathBuf,

    /// Number of orders (each has one to four line items).
    #[arg(long, default_value_t = 2_000)]
    orders: usize,

    /// Number of distinct customers.
    #[arg(long, default_value_t = 400)]
    customers: usize,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Transactions file format.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(args: &Args) -> Result<Vec<Transaction>> {
    let mut rng = SimpleRng::new(args.seed);
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).context("invalid start date")?;
    let span_days = 4 * 365;

    // Orders in date order so a customer's first order is their "New" one.
    let mut order_days: Vec<u64> = (0..args.orders)
        .map(|_| rng.below(span_days) as u64)
        .collect();
    order_days.sort_unstable();

    let mut seen: HashSet<usize> = HashSet::new();
    let mut rows = Vec::new();

    for (n, &day) in order_days.iter().enumerate() {
        let customer = rng.below(args.customers.max(1));
        let customer_type = if seen.insert(customer) { "New" } else { "Returning" };
        let region = *rng.pick(&REGIONS);
        let order_date = start
            .checked_add_days(Days::new(day))
            .context("order date out of range")?;
        let ship_date = order_date
            .checked_add_days(Days::new(1 + rng.below(6) as u64))
            .context("ship date out of range")?;

        let items = 1 + rng.below(4);
        for _ in 0..items {
            let (category, products) = *rng.pick(&PRODUCTS);
            let (product, base_price) = *rng.pick(products);
            let quantity = 1 + rng.below(5);
            let discount = *rng.pick(&DISCOUNTS);

            let list = base_price * quantity as f64 * (0.85 + 0.3 * rng.next_f64());
            let sales = round2(list * (1.0 - discount));
            // Margin shrinks with the discount and turns negative for deep ones.
            let margin = 0.25 - 1.2 * discount + 0.1 * (rng.next_f64() - 0.5);
            let profit = round2(sales * margin);

            rows.push(Transaction {
                order_id: format!("US-{}-{:06}", order_date.format("%Y"), 100_000 + n),
                order_date,
                ship_date: Some(ship_date),
                customer_id: format!("CU-{:05}", 10_000 + customer),
                customer_type: Some(customer_type.to_string()),
                region: region.to_string(),
                category: category.to_string(),
                product_name: product.to_string(),
                sales,
                profit,
                discount,
            });
        }
    }
    Ok(rows)
}

fn write_csv(path: &Path, rows: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(columns::ALL)?;
    for row in rows {
        let record: [String; 11] = [
            row.order_id.clone(),
            row.order_date.to_string(),
            row.ship_date.map(|d| d.to_string()).unwrap_or_default(),
            row.customer_id.clone(),
            row.customer_type.clone().unwrap_or_default(),
            row.region.clone(),
            row.category.clone(),
            row.product_name.clone(),
            row.sales.to_string(),
            row.profit.to_string(),
            row.discount.to_string(),
        ];
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Days since 1970-01-01, the Date32 encoding.
fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - 719_163
}

fn text_column(rows: &[Transaction], field: impl Fn(&Transaction) -> &str) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(field).collect::<Vec<_>>()))
}

fn number_column(rows: &[Transaction], field: impl Fn(&Transaction) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(rows.iter().map(field).collect::<Vec<_>>()))
}

fn write_parquet(path: &Path, rows: &[Transaction]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(columns::ORDER_ID, DataType::Utf8, false),
        Field::new(columns::ORDER_DATE, DataType::Date32, false),
        Field::new(columns::SHIP_DATE, DataType::Date32, true),
        Field::new(columns::CUSTOMER_ID, DataType::Utf8, false),
        Field::new(columns::CUSTOMER_TYPE, DataType::Utf8, true),
        Field::new(columns::REGION, DataType::Utf8, false),
        Field::new(columns::CATEGORY, DataType::Utf8, false),
        Field::new(columns::PRODUCT_NAME, DataType::Utf8, false),
        Field::new(columns::SALES, DataType::Float64, false),
        Field::new(columns::PROFIT, DataType::Float64, false),
        Field::new(columns::DISCOUNT, DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text_column(rows, |r| r.order_id.as_str()),
            Arc::new(Date32Array::from(
                rows.iter().map(|r| epoch_days(r.order_date)).collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(
                rows.iter().map(|r| r.ship_date.map(epoch_days)).collect::<Vec<_>>(),
            )),
            text_column(rows, |r| r.customer_id.as_str()),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.customer_type.as_deref()).collect::<Vec<_>>(),
            )),
            text_column(rows, |r| r.region.as_str()),
            text_column(rows, |r| r.category.as_str()),
            text_column(rows, |r| r.product_name.as_str()),
            number_column(rows, |r| r.sales),
            number_column(rows, |r| r.profit),
            number_column(rows, |r| r.discount),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// The headline KPIs over the whole dataset, as `KPI,Value` rows.
fn write_kpis(path: &Path, table: &TransactionTable) -> Result<()> {
    let k = OverviewKpis::compute(&FilteredView::all(table));
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["KPI", "Value"])?;
    let rows: [(&str, String); 10] = [
        ("Total Revenue", format!("{:.2}", k.total_revenue)),
        ("Total Profit", format!("{:.2}", k.total_profit)),
        ("Profit Margin (%)", format!("{:.2}", k.profit_margin)),
        ("Average Order Value", format!("{:.2}", k.average_order_value)),
        ("Total Orders", k.order_count.to_string()),
        ("Unique Customers", k.unique_customers.to_string()),
        ("Revenue per Customer", format!("{:.2}", k.revenue_per_customer)),
        ("Repeat Customer Rate (%)", format!("{:.2}", k.repeat_rate)),
        ("Profit per Order", format!("{:.2}", k.profit_per_order)),
        ("Dataset", "synthetic sample".to_string()),
    ];
    for (name, value) in rows {
        writer.write_record([name, value.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let rows = generate(&args)?;
    let data_path = match args.format {
        Format::Csv => {
            let path = args.out_dir.join("superstore_cleaned.csv");
            write_csv(&path, &rows)?;
            path
        }
        Format::Parquet => {
            let path = args.out_dir.join("superstore_cleaned.parquet");
            write_parquet(&path, &rows)?;
            path
        }
    };

    let table = TransactionTable::from_rows(rows, OptionalColumns::all());
    let kpi_path = args.out_dir.join("kpis.csv");
    write_kpis(&kpi_path, &table)?;

    log::info!(
        "Wrote {} line items ({} orders) to {} and KPIs to {}",
        table.len(),
        args.orders,
        data_path.display(),
        kpi_path.display()
    );
    println!("Wrote {} line items to {}", table.len(), data_path.display());
    Ok(())
}

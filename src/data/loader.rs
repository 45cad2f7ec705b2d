use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, AsArray, Date32Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::WINDOWS_1252;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{KpiSheet, KpiValue, OptionalColumns, Transaction, TransactionTable};

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

/// Header names of the cleaned superstore export.
pub mod columns {
    pub const ORDER_ID: &str = "Order ID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const SHIP_DATE: &str = "Ship Date";
    pub const CUSTOMER_ID: &str = "Customer ID";
    pub const CUSTOMER_TYPE: &str = "customer_type";
    pub const REGION: &str = "Region";
    pub const CATEGORY: &str = "Category";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const SALES: &str = "Sales";
    pub const PROFIT: &str = "Profit";
    pub const DISCOUNT: &str = "Discount";

    /// Column order written by the sample generator.
    pub const ALL: [&str; 11] = [
        ORDER_ID,
        ORDER_DATE,
        SHIP_DATE,
        CUSTOMER_ID,
        CUSTOMER_TYPE,
        REGION,
        CATEGORY,
        PRODUCT_NAME,
        SALES,
        PROFIT,
        DISCOUNT,
    ];
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Loading never returns partial data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("unreadable arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: '{column}' is empty")]
    MissingValue { row: usize, column: String },
    #[error("row {row}: '{column}' has unparseable date '{value}'")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a transaction table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – header row + one line item per row (Latin-1 tolerant)
/// * `.json`         – `[{ "Order ID": ..., "Order Date": "2016-11-08", ... }, ...]`
/// * `.parquet`      – one column per field, dates as Date32/Timestamp or text
pub fn load_file(path: &Path) -> Result<TransactionTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => read_csv(File::open(path).map_err(io_error(path))?)?,
        "json" => read_json(File::open(path).map_err(io_error(path))?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} transactions from {} ({} regions, {} categories)",
        table.len(),
        path.display(),
        table.regions.len(),
        table.categories.len()
    );
    Ok(table)
}

/// Load the precomputed KPI sheet (`KPI`, `Value` columns).
///
/// Falls back to the first two columns when the headers are named differently.
pub fn load_kpis(path: &Path) -> Result<KpiSheet, LoadError> {
    let file = File::open(path).map_err(io_error(path))?;
    let sheet = read_kpis(file)?;
    log::info!("Loaded {} precomputed KPIs from {}", sheet.len(), path.display());
    Ok(sheet)
}

/// Parse a calendar date, discarding any time-of-day component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

// ---------------------------------------------------------------------------
// Shared record assembly
// ---------------------------------------------------------------------------

/// A row as it appears in the source, before dates are parsed.
#[derive(Debug, Deserialize)]
struct RawTransaction {
    #[serde(rename = "Order ID")]
    order_id: String,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Ship Date", default)]
    ship_date: Option<String>,
    #[serde(rename = "Customer ID")]
    customer_id: String,
    #[serde(default)]
    customer_type: Option<String>,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Product Name", default)]
    product_name: Option<String>,
    #[serde(rename = "Sales")]
    sales: f64,
    #[serde(rename = "Profit")]
    profit: f64,
    #[serde(rename = "Discount", default)]
    discount: Option<f64>,
}

impl RawTransaction {
    /// `row` is the 1-based data row, used in error messages.
    fn into_transaction(self, row: usize) -> Result<Transaction, LoadError> {
        let order_date = required_date(row, columns::ORDER_DATE, &self.order_date)?;
        let ship_date = match self.ship_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(required_date(row, columns::SHIP_DATE, raw)?),
        };

        Ok(Transaction {
            order_id: self.order_id,
            order_date,
            ship_date,
            customer_id: self.customer_id,
            customer_type: self.customer_type.filter(|t| !t.is_empty()),
            region: self.region,
            category: self.category,
            product_name: self.product_name.unwrap_or_default(),
            sales: self.sales,
            profit: self.profit,
            discount: self.discount.unwrap_or(0.0),
        })
    }
}

fn required_date(row: usize, column: &str, raw: &str) -> Result<NaiveDate, LoadError> {
    if raw.trim().is_empty() {
        return Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        });
    }
    parse_date(raw).ok_or_else(|| LoadError::InvalidDate {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Decode one CSV field: UTF-8 when valid, Windows-1252 otherwise.
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// Header positions of the columns the dashboard reads.
struct CsvLayout {
    order_id: usize,
    order_date: usize,
    customer_id: usize,
    region: usize,
    category: usize,
    sales: usize,
    profit: usize,
    ship_date: Option<usize>,
    customer_type: Option<usize>,
    product_name: Option<usize>,
    discount: Option<usize>,
    /// Every other header containing "date"; validated but not stored.
    other_dates: Vec<(usize, String)>,
}

impl CsvLayout {
    fn from_headers(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.into()));

        let order_date = require(columns::ORDER_DATE)?;
        let ship_date = find(columns::SHIP_DATE);
        let other_dates = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| {
                h.to_lowercase().contains("date") && *i != order_date && Some(*i) != ship_date
            })
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(CsvLayout {
            order_id: require(columns::ORDER_ID)?,
            order_date,
            customer_id: require(columns::CUSTOMER_ID)?,
            region: require(columns::REGION)?,
            category: require(columns::CATEGORY)?,
            sales: require(columns::SALES)?,
            profit: require(columns::PROFIT)?,
            ship_date,
            customer_type: find(columns::CUSTOMER_TYPE),
            product_name: find(columns::PRODUCT_NAME),
            discount: find(columns::DISCOUNT),
            other_dates,
        })
    }

    fn optional_columns(&self) -> OptionalColumns {
        OptionalColumns {
            customer_type: self.customer_type.is_some(),
            product_name: self.product_name.is_some(),
            discount: self.discount.is_some(),
            ship_date: self.ship_date.is_some(),
        }
    }
}

/// Read a transaction table from CSV bytes.
pub fn read_csv<R: Read>(source: R) -> Result<TransactionTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| decode_field(h).trim_start_matches('\u{feff}').to_string())
        .collect();
    let layout = CsvLayout::from_headers(&headers)?;

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    let mut row_no = 0usize;

    while reader.read_byte_record(&mut record)? {
        row_no += 1;
        let field = |idx: usize| decode_field(record.get(idx).unwrap_or_default()).into_owned();
        let number = |idx: usize, column: &str| -> Result<f64, LoadError> {
            let raw = field(idx);
            raw.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
                row: row_no,
                column: column.to_string(),
                value: raw,
            })
        };

        for (idx, column) in &layout.other_dates {
            let raw = field(*idx);
            if !raw.is_empty() && parse_date(&raw).is_none() {
                return Err(LoadError::InvalidDate {
                    row: row_no,
                    column: column.clone(),
                    value: raw,
                });
            }
        }

        let raw = RawTransaction {
            order_id: field(layout.order_id),
            order_date: field(layout.order_date),
            ship_date: layout.ship_date.map(field),
            customer_id: field(layout.customer_id),
            customer_type: layout.customer_type.map(field),
            region: field(layout.region),
            category: field(layout.category),
            product_name: layout.product_name.map(field),
            sales: number(layout.sales, columns::SALES)?,
            profit: number(layout.profit, columns::PROFIT)?,
            discount: match layout.discount {
                Some(idx) if !field(idx).is_empty() => Some(number(idx, columns::DISCOUNT)?),
                _ => None,
            },
        };
        rows.push(raw.into_transaction(row_no)?);
    }

    Ok(TransactionTable::from_rows(rows, layout.optional_columns()))
}

/// Read a KPI sheet from CSV bytes.
pub fn read_kpis<R: Read>(source: R) -> Result<KpiSheet, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| decode_field(h).to_lowercase())
        .collect();
    if headers.len() < 2 {
        return Err(LoadError::MissingColumn("Value".into()));
    }
    let name_idx = headers.iter().position(|h| h == "kpi").unwrap_or(0);
    let value_idx = headers.iter().position(|h| h == "value").unwrap_or(1);

    let mut sheet = KpiSheet::default();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let name = decode_field(record.get(name_idx).unwrap_or_default()).into_owned();
        if name.is_empty() {
            continue;
        }
        let value = decode_field(record.get(value_idx).unwrap_or_default());
        sheet.insert(name, KpiValue::parse(&value));
    }
    Ok(sheet)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Read a records-oriented JSON array (`df.to_json(orient="records", date_format="iso")`).
pub fn read_json<R: Read>(source: R) -> Result<TransactionTable, LoadError> {
    let records: Vec<RawTransaction> = serde_json::from_reader(source)?;

    let mut present = OptionalColumns::default();
    let mut rows = Vec::with_capacity(records.len());
    for (i, raw) in records.into_iter().enumerate() {
        present.customer_type |= raw.customer_type.is_some();
        present.product_name |= raw.product_name.is_some();
        present.discount |= raw.discount.is_some();
        present.ship_date |= raw.ship_date.is_some();
        rows.push(raw.into_transaction(i + 1)?);
    }

    Ok(TransactionTable::from_rows(rows, present))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose column names match the CSV headers.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<TransactionTable, LoadError> {
    let file = File::open(path).map_err(io_error(path))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    let mut present = OptionalColumns::default();

    for batch_result in reader {
        let batch = batch_result?;
        let offset = rows.len();

        let order_id = require(string_column(&batch, columns::ORDER_ID)?, columns::ORDER_ID)?;
        let customer_id = require(
            string_column(&batch, columns::CUSTOMER_ID)?,
            columns::CUSTOMER_ID,
        )?;
        let region = require(string_column(&batch, columns::REGION)?, columns::REGION)?;
        let category = require(string_column(&batch, columns::CATEGORY)?, columns::CATEGORY)?;
        let sales = require(float_column(&batch, columns::SALES)?, columns::SALES)?;
        let profit = require(float_column(&batch, columns::PROFIT)?, columns::PROFIT)?;
        let order_date = require(date_column(&batch, columns::ORDER_DATE)?, columns::ORDER_DATE)?;
        let ship_date = date_column(&batch, columns::SHIP_DATE)?;
        let customer_type = string_column(&batch, columns::CUSTOMER_TYPE)?;
        let product_name = string_column(&batch, columns::PRODUCT_NAME)?;
        let discount = float_column(&batch, columns::DISCOUNT)?;

        present.ship_date |= ship_date.is_some();
        present.customer_type |= customer_type.is_some();
        present.product_name |= product_name.is_some();
        present.discount |= discount.is_some();

        for i in 0..batch.num_rows() {
            let row = offset + i + 1;
            let text = |arr: &StringArray, column: &str| -> Result<String, LoadError> {
                if arr.is_null(i) {
                    return Err(LoadError::MissingValue {
                        row,
                        column: column.to_string(),
                    });
                }
                Ok(arr.value(i).to_string())
            };
            let number = |arr: &Float64Array, column: &str| -> Result<f64, LoadError> {
                if arr.is_null(i) {
                    return Err(LoadError::MissingValue {
                        row,
                        column: column.to_string(),
                    });
                }
                Ok(arr.value(i))
            };

            rows.push(Transaction {
                order_id: text(&order_id, columns::ORDER_ID)?,
                order_date: order_date
                    .get(i, row, columns::ORDER_DATE)?
                    .ok_or_else(|| LoadError::MissingValue {
                        row,
                        column: columns::ORDER_DATE.to_string(),
                    })?,
                ship_date: match &ship_date {
                    Some(col) => col.get(i, row, columns::SHIP_DATE)?,
                    None => None,
                },
                customer_id: text(&customer_id, columns::CUSTOMER_ID)?,
                customer_type: customer_type
                    .as_ref()
                    .filter(|arr| !arr.is_null(i) && !arr.value(i).is_empty())
                    .map(|arr| arr.value(i).to_string()),
                region: text(&region, columns::REGION)?,
                category: text(&category, columns::CATEGORY)?,
                product_name: product_name
                    .as_ref()
                    .filter(|arr| !arr.is_null(i))
                    .map(|arr| arr.value(i).to_string())
                    .unwrap_or_default(),
                sales: number(&sales, columns::SALES)?,
                profit: number(&profit, columns::PROFIT)?,
                discount: discount
                    .as_ref()
                    .filter(|arr| !arr.is_null(i))
                    .map(|arr| arr.value(i))
                    .unwrap_or(0.0),
            });
        }
    }

    Ok(TransactionTable::from_rows(rows, present))
}

// -- Parquet / Arrow helpers --

fn require<T>(column: Option<T>, name: &str) -> Result<T, LoadError> {
    column.ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Any column castable to Utf8, or `None` when absent.
fn string_column(batch: &RecordBatch, name: &str) -> Result<Option<StringArray>, LoadError> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let array = cast(batch.column(idx), &DataType::Utf8)?;
    Ok(Some(array.as_string::<i32>().clone()))
}

/// Any integer/float column widened to Float64, or `None` when absent.
fn float_column(batch: &RecordBatch, name: &str) -> Result<Option<Float64Array>, LoadError> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let array = cast(batch.column(idx), &DataType::Float64)?;
    Ok(Some(array.as_primitive::<Float64Type>().clone()))
}

/// A date column stored either natively or as text.
enum DateColumn {
    Days(Date32Array),
    Text(StringArray),
}

impl DateColumn {
    /// `Ok(None)` for nulls, `Err` for text that is not a date.
    fn get(&self, i: usize, row: usize, column: &str) -> Result<Option<NaiveDate>, LoadError> {
        match self {
            DateColumn::Days(arr) if arr.is_null(i) => Ok(None),
            DateColumn::Days(arr) => Ok(arr.value_as_date(i)),
            DateColumn::Text(arr) if arr.is_null(i) || arr.value(i).trim().is_empty() => Ok(None),
            DateColumn::Text(arr) => {
                let raw = arr.value(i);
                parse_date(raw).map(Some).ok_or_else(|| LoadError::InvalidDate {
                    row,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
            }
        }
    }
}

fn date_column(batch: &RecordBatch, name: &str) -> Result<Option<DateColumn>, LoadError> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let col = batch.column(idx);
    let column = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let text = cast(col, &DataType::Utf8)?;
            DateColumn::Text(text.as_string::<i32>().clone())
        }
        _ => {
            let days = cast(col, &DataType::Date32)?;
            DateColumn::Days(days.as_primitive::<Date32Type>().clone())
        }
    };
    Ok(Some(column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Order ID,Order Date,Ship Date,Customer ID,customer_type,Region,Category,Product Name,Sales,Profit,Discount";

    #[test]
    fn parse_date_accepts_common_layouts_and_drops_time() {
        let expected = NaiveDate::from_ymd_opt(2016, 11, 8).unwrap();
        assert_eq!(parse_date("2016-11-08"), Some(expected));
        assert_eq!(parse_date("11/08/2016"), Some(expected));
        assert_eq!(parse_date("2016-11-08 17:45:00"), Some(expected));
        assert_eq!(parse_date("2016-11-08T00:00:00.000"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("  "), None);
    }

    #[test]
    fn read_csv_parses_full_schema() {
        let data = format!(
            "{HEADER}\n\
             CA-1,2016-11-08,2016-11-11,CG-125,New,South,Furniture,Bookcase,261.96,41.91,0\n\
             CA-1,2016-11-08,2016-11-11,CG-125,New,South,Furniture,Chair,731.94,-219.58,0.2\n"
        );
        let table = read_csv(data.as_bytes()).expect("valid csv");

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns, OptionalColumns::all());
        let second = &table.rows[1];
        assert_eq!(second.order_id, "CA-1");
        assert_eq!(second.product_name, "Chair");
        assert_eq!(second.profit, -219.58);
        assert_eq!(second.discount, 0.2);
        assert_eq!(second.ship_date, NaiveDate::from_ymd_opt(2016, 11, 11));
    }

    #[test]
    fn read_csv_tolerates_latin1_bytes() {
        let mut data = b"Order ID,Order Date,Customer ID,Region,Category,Product Name,Sales,Profit\n".to_vec();
        data.extend_from_slice(b"O1,2017-01-02,C1,West,Tech,Caf\xe9 Chair,10,1\n");

        let table = read_csv(data.as_slice()).expect("latin-1 csv");
        assert_eq!(table.rows[0].product_name, "Café Chair");
        assert!(!table.columns.customer_type);
        assert!(!table.columns.discount);
        assert!(table.customer_types.is_empty());
    }

    #[test]
    fn read_csv_rejects_bad_dates_with_row_number() {
        let data = format!(
            "{HEADER}\n\
             O1,2016-11-08,,C1,New,South,Tech,A,1,1,0\n\
             O2,someday,,C1,New,South,Tech,A,1,1,0\n"
        );
        match read_csv(data.as_bytes()) {
            Err(LoadError::InvalidDate { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Order Date");
                assert_eq!(value, "someday");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn read_csv_validates_extra_date_columns() {
        let data = "Order ID,Order Date,Delivery Date,Customer ID,Region,Category,Sales,Profit\n\
                    O1,2016-11-08,not-a-date,C1,South,Tech,1,1\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(LoadError::InvalidDate { ref column, .. }) if column == "Delivery Date"
        ));
    }

    #[test]
    fn read_csv_reports_missing_required_column() {
        let data = "Order ID,Order Date,Customer ID,Region,Sales,Profit\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(LoadError::MissingColumn(ref c)) if c == "Category"
        ));
    }

    #[test]
    fn read_csv_rejects_non_numeric_sales() {
        let data = format!("{HEADER}\nO1,2016-11-08,,C1,New,South,Tech,A,lots,1,0\n");
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(LoadError::InvalidNumber { row: 1, .. })
        ));
    }

    #[test]
    fn read_json_records_detects_optional_columns() {
        let data = r#"[
            {"Order ID": "O1", "Order Date": "2023-01-05", "Customer ID": "C1",
             "Region": "West", "Category": "Tech", "Sales": 100.0, "Profit": 20.0,
             "customer_type": "New"},
            {"Order ID": "O2", "Order Date": "2023-01-20T00:00:00.000", "Customer ID": "C1",
             "Region": "West", "Category": "Tech", "Sales": 50, "Profit": -5}
        ]"#;
        let table = read_json(data.as_bytes()).expect("valid json");

        assert_eq!(table.len(), 2);
        assert!(table.columns.customer_type);
        assert!(!table.columns.discount);
        assert_eq!(table.rows[1].customer_type, None);
        assert_eq!(table.rows[1].order_date, NaiveDate::from_ymd_opt(2023, 1, 20).unwrap());
    }

    #[test]
    fn read_kpis_maps_names_to_values() {
        let data = "KPI,Value\nTotal Revenue,2297200.86\nTop Category,Technology\n";
        let sheet = read_kpis(data.as_bytes()).expect("valid kpis");
        assert_eq!(sheet.len(), 2);
        assert_eq!(
            sheet.get("Total Revenue").and_then(KpiValue::as_f64),
            Some(2297200.86)
        );
        assert_eq!(
            sheet.get("Top Category"),
            Some(&KpiValue::Text("Technology".into()))
        );
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "O1,2023-01-05,,C1,New,West,Tech,A,100,20,0").unwrap();
        let table = load_file(file.path()).expect("load csv");
        assert_eq!(table.len(), 1);

        let err = load_file(Path::new("orders.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ref e) if e == "xlsx"));
    }

    #[test]
    fn load_file_reports_missing_file() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

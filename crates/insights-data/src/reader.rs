//! CSV loading and cleaning for Sales Insights.
//!
//! Reads a transaction export byte-by-byte (Latin-1), parses the required
//! columns into [`TransactionRecord`]s and applies the cleaning filters,
//! producing a [`LoadedDataset`] of [`CleanedRecord`]s in file order.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use insights_core::data_processors::{
    decode_latin1, normalize_customer_id, parse_quantity, parse_unit_price, NumericCell,
    TimestampProcessor,
};
use insights_core::error::{InsightsError, Result};
use insights_core::models::{CleanedRecord, DropReason, LoadMode, TransactionRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Header names that must be present in every source file.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "InvoiceDate",
    "Description",
    "Quantity",
    "UnitPrice",
    "CustomerID",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs controlling a single load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub mode: LoadMode,
}

impl LoadOptions {
    pub fn new(mode: LoadMode) -> Self {
        Self { mode }
    }
}

/// A row skipped in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based physical line in the source (the header is line 1).
    pub line: u64,
    pub reason: String,
}

/// Row accounting for one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Data rows encountered, including malformed ones.
    pub rows_read: usize,
    /// Rows that survived parsing and cleaning.
    pub rows_kept: usize,
    pub dropped_missing_customer: usize,
    pub dropped_non_positive_quantity: usize,
    pub dropped_non_positive_price: usize,
    /// Malformed rows skipped in lenient mode (always empty in strict mode).
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    /// Rows removed by the cleaning filters (malformed rows excluded).
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_customer
            + self.dropped_non_positive_quantity
            + self.dropped_non_positive_price
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingCustomer => self.dropped_missing_customer += 1,
            DropReason::NonPositiveQuantity => self.dropped_non_positive_quantity += 1,
            DropReason::NonPositivePrice => self.dropped_non_positive_price += 1,
        }
    }
}

/// The cleaned contents of one source file.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Path the records were read from.
    pub source: PathBuf,
    /// Cleaned records in original file order.
    pub records: Vec<CleanedRecord>,
    pub report: LoadReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and clean the transaction file at `path`.
///
/// A missing file yields [`InsightsError::SourceNotFound`]; any other open
/// failure yields [`InsightsError::FileRead`].
pub fn load_transactions(path: &Path, options: LoadOptions) -> Result<LoadedDataset> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InsightsError::SourceNotFound(path.to_path_buf())
        } else {
            InsightsError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    debug!("Loading transactions from {}", path.display());
    load_from_reader(file, path, options)
}

/// Load and clean transactions from any reader. `source` is only used for
/// error messages and the returned [`LoadedDataset::source`].
pub fn load_from_reader<R: Read>(
    reader: R,
    source: &Path,
    options: LoadOptions,
) -> Result<LoadedDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.byte_headers()?, source)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in csv_reader.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let Some(line) = unequal_lengths_line(&e) else {
                    return Err(InsightsError::Csv(e));
                };
                report.rows_read += 1;
                let reason = e.to_string();
                reject(&mut report, options.mode, line, reason)?;
                continue;
            }
        };

        report.rows_read += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let parsed = match parse_row(&record, &columns) {
            Ok(parsed) => parsed,
            Err(reason) => {
                reject(&mut report, options.mode, line, reason)?;
                continue;
            }
        };

        match parsed.clean() {
            Ok(cleaned) => records.push(cleaned),
            Err(reason) => report.record_drop(reason),
        }
    }

    report.rows_kept = records.len();

    if !report.rejected.is_empty() {
        warn!(
            "Skipped {} malformed rows in {} (first at line {})",
            report.rejected.len(),
            source.display(),
            report.rejected[0].line
        );
    }
    info!(
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_dropped = report.rows_dropped(),
        "Loaded {}",
        source.display()
    );

    Ok(LoadedDataset {
        source: source.to_path_buf(),
        records,
        report,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the required columns within a record.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    invoice_date: usize,
    description: usize,
    quantity: usize,
    unit_price: usize,
    customer_id: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::ByteRecord, source: &Path) -> Result<Self> {
        // Duplicate header names resolve to their first column.
        let mut index_by_name: HashMap<String, usize> = HashMap::new();
        for (i, raw) in headers.iter().enumerate() {
            let raw = if i == 0 {
                raw.strip_prefix(UTF8_BOM).unwrap_or(raw)
            } else {
                raw
            };
            index_by_name
                .entry(decode_latin1(raw).trim().to_string())
                .or_insert(i);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !index_by_name.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(InsightsError::MissingColumns {
                path: source.to_path_buf(),
                missing,
            });
        }

        let at = |name: &str| index_by_name[name];
        Ok(Self {
            invoice_date: at("InvoiceDate"),
            description: at("Description"),
            quantity: at("Quantity"),
            unit_price: at("UnitPrice"),
            customer_id: at("CustomerID"),
        })
    }
}

fn field(record: &csv::ByteRecord, index: usize) -> String {
    record.get(index).map(decode_latin1).unwrap_or_default()
}

/// Parse the required fields of one row; `Err` carries a human-readable reason.
fn parse_row(
    record: &csv::ByteRecord,
    columns: &ColumnIndex,
) -> std::result::Result<TransactionRecord, String> {
    let raw_date = field(record, columns.invoice_date);
    let invoice_date = TimestampProcessor::parse(&raw_date)
        .ok_or_else(|| format!("unparseable InvoiceDate {:?}", raw_date.trim()))?;

    let raw_quantity = field(record, columns.quantity);
    let quantity = match parse_quantity(&raw_quantity) {
        NumericCell::Value(q) => Some(q),
        NumericCell::Missing => None,
        NumericCell::Invalid => {
            return Err(format!("invalid Quantity {:?}", raw_quantity.trim()));
        }
    };

    let raw_price = field(record, columns.unit_price);
    let unit_price = match parse_unit_price(&raw_price) {
        NumericCell::Value(p) => Some(p),
        NumericCell::Missing => None,
        NumericCell::Invalid => {
            return Err(format!("invalid UnitPrice {:?}", raw_price.trim()));
        }
    };

    Ok(TransactionRecord {
        invoice_date,
        description: field(record, columns.description).trim().to_string(),
        quantity,
        unit_price,
        customer_id: normalize_customer_id(&field(record, columns.customer_id)),
    })
}

/// Abort (strict) or record and continue (lenient).
fn reject(report: &mut LoadReport, mode: LoadMode, line: u64, reason: String) -> Result<()> {
    match mode {
        LoadMode::Strict => Err(InsightsError::MalformedRow { line, reason }),
        LoadMode::Lenient => {
            debug!(line, %reason, "rejecting malformed row");
            report.rejected.push(RejectedRow { line, reason });
            Ok(())
        }
    }
}

/// Line number for a wrong-field-count error, `None` for any other CSV error.
fn unequal_lengths_line(err: &csv::Error) -> Option<u64> {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { pos, .. } => Some(pos.as_ref().map_or(0, |p| p.line())),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

/// How the loader treats rows whose required fields fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Abort the whole load on the first malformed row.
    #[default]
    Strict,
    /// Skip malformed rows and report them alongside the loaded data.
    Lenient,
}

// ── DayOfWeek ─────────────────────────────────────────────────────────────────

/// Weekday of an invoice, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Every weekday in display order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Position in [`DayOfWeek::ALL`] (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Three-letter abbreviation used for narrow chart labels.
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        DayOfWeek::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// Calendar month bucket.
///
/// Ordering is chronological (year first, then month); the `"YYYY-MM"` label
/// is only produced on demand via [`YearMonth::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build a bucket, returning `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Months since year 0; consecutive months differ by exactly one.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Display label, e.g. `"2011-03"`.
    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

// ── TransactionRecord ─────────────────────────────────────────────────────────

/// One parsed row of the source file, before cleaning.
///
/// `quantity` and `unit_price` are `None` when the cell was empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub invoice_date: NaiveDateTime,
    pub description: String,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub customer_id: Option<String>,
}

/// Why a parsed row was excluded from the cleaned set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingCustomer,
    NonPositiveQuantity,
    NonPositivePrice,
}

impl TransactionRecord {
    /// Apply the cleaning filters and derive the calendar and revenue fields.
    ///
    /// Filters are checked in order: customer, quantity, unit price. The
    /// first one that fails is reported.
    pub fn clean(self) -> Result<CleanedRecord, DropReason> {
        let Some(customer_id) = self.customer_id else {
            return Err(DropReason::MissingCustomer);
        };
        let quantity = match self.quantity {
            Some(q) if q > 0 => q as u64,
            _ => return Err(DropReason::NonPositiveQuantity),
        };
        let unit_price = match self.unit_price {
            Some(p) if p > 0.0 => p,
            _ => return Err(DropReason::NonPositivePrice),
        };

        let date = self.invoice_date.date();
        Ok(CleanedRecord {
            invoice_date: self.invoice_date,
            description: self.description,
            quantity,
            unit_price,
            customer_id,
            date,
            month: YearMonth::from_date(date),
            day_of_week: DayOfWeek::from(date.weekday()),
            revenue: quantity as f64 * unit_price,
        })
    }
}

// ── CleanedRecord ─────────────────────────────────────────────────────────────

/// A transaction that passed cleaning, with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub invoice_date: NaiveDateTime,
    pub description: String,
    /// Always greater than zero.
    pub quantity: u64,
    /// Always greater than zero.
    pub unit_price: f64,
    pub customer_id: String,
    pub date: NaiveDate,
    pub month: YearMonth,
    pub day_of_week: DayOfWeek,
    /// `quantity * unit_price`.
    pub revenue: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Selection-aware aggregate queries over cleaned transactions.
//!
//! Every query borrows the cleaned records immutably. Filtering by the
//! product [`Selection`] is an iterator view over the same slice, so the
//! underlying table is never copied or modified.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use insights_core::models::{CleanedRecord, DayOfWeek, YearMonth};
use serde::Serialize;

// ── Selection ─────────────────────────────────────────────────────────────────

/// Set of product descriptions whose rows feed the charts.
///
/// An empty selection matches no rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    products: BTreeSet<String>,
}

impl Selection {
    pub fn new<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            products: products.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, description: &str) -> bool {
        self.products.contains(description)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Products in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(String::as_str)
    }

    /// Flip membership of `product`; returns `true` if it is now selected.
    pub fn toggle(&mut self, product: &str) -> bool {
        if self.products.remove(product) {
            false
        } else {
            self.products.insert(product.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            products: iter.into_iter().collect(),
        }
    }
}

// ── Output types ──────────────────────────────────────────────────────────────

/// Headline figures over the whole cleaned set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_units: u64,
    pub unique_customers: usize,
}

/// Summed quantity for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductQuantity {
    pub description: String,
    pub quantity: u64,
}

/// Summed revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// Serialized as its `"YYYY-MM"` label.
    pub month: YearMonth,
    pub revenue: f64,
}

impl MonthlyRevenue {
    pub fn label(&self) -> String {
        self.month.label()
    }
}

/// Summed revenue for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRevenue {
    pub day: DayOfWeek,
    pub revenue: f64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper exposing the dashboard's aggregate queries.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Records whose description is in `selection`, in original order.
    pub fn filter_selected<'a>(
        records: &'a [CleanedRecord],
        selection: &'a Selection,
    ) -> impl Iterator<Item = &'a CleanedRecord> + 'a {
        records
            .iter()
            .filter(move |r| selection.contains(&r.description))
    }

    /// Revenue, units and distinct customers over every record.
    ///
    /// Never filtered by the selection. Unit totals saturate at `u64::MAX`.
    pub fn kpi_summary(records: &[CleanedRecord]) -> KpiSummary {
        let mut customers: HashSet<&str> = HashSet::new();
        let mut summary = KpiSummary::default();

        for record in records {
            summary.total_revenue += record.revenue;
            summary.total_units = summary.total_units.saturating_add(record.quantity);
            customers.insert(record.customer_id.as_str());
        }

        summary.unique_customers = customers.len();
        summary
    }

    /// The `k` selected products with the largest summed quantity.
    ///
    /// Sorted by quantity descending; equal quantities order by description
    /// ascending. Per-product totals saturate at `u64::MAX`.
    pub fn top_products(
        records: &[CleanedRecord],
        selection: &Selection,
        k: usize,
    ) -> Vec<ProductQuantity> {
        Self::rank_products(Self::filter_selected(records, selection), k)
    }

    /// The `k` best-selling products over every record, ignoring any
    /// selection. Used to seed the selection and the sidebar options.
    pub fn top_products_overall(records: &[CleanedRecord], k: usize) -> Vec<ProductQuantity> {
        Self::rank_products(records.iter(), k)
    }

    /// Initial selection: the top `k` products over every record.
    pub fn default_selection(records: &[CleanedRecord], k: usize) -> Selection {
        Self::top_products_overall(records, k)
            .into_iter()
            .map(|p| p.description)
            .collect()
    }

    /// Selected revenue per month, in chronological order.
    pub fn monthly_revenue(records: &[CleanedRecord], selection: &Selection) -> Vec<MonthlyRevenue> {
        // BTreeMap keyed on the typed month keeps buckets in calendar order.
        let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for record in Self::filter_selected(records, selection) {
            *by_month.entry(record.month).or_insert(0.0) += record.revenue;
        }

        by_month
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue { month, revenue })
            .collect()
    }

    /// Selected revenue per weekday: always seven buckets, Monday first,
    /// with zero for days that have no matching rows.
    pub fn weekday_revenue(records: &[CleanedRecord], selection: &Selection) -> Vec<WeekdayRevenue> {
        let mut totals = [0.0_f64; 7];
        for record in Self::filter_selected(records, selection) {
            totals[record.day_of_week.index()] += record.revenue;
        }

        DayOfWeek::ALL
            .iter()
            .map(|&day| WeekdayRevenue {
                day,
                revenue: totals[day.index()],
            })
            .collect()
    }

    /// Share of revenue per weekday as a percentage of the bucket total.
    ///
    /// All shares are zero when the total is zero.
    pub fn weekday_share(buckets: &[WeekdayRevenue]) -> Vec<(DayOfWeek, f64)> {
        let total: f64 = buckets.iter().map(|b| b.revenue).sum();
        buckets
            .iter()
            .map(|b| {
                let share = if total > 0.0 {
                    b.revenue / total * 100.0
                } else {
                    0.0
                };
                (b.day, share)
            })
            .collect()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn rank_products<'a>(
        records: impl Iterator<Item = &'a CleanedRecord>,
        k: usize,
    ) -> Vec<ProductQuantity> {
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for record in records {
            let total = totals.entry(record.description.as_str()).or_insert(0);
            *total = total.saturating_add(record.quantity);
        }

        let mut ranked: Vec<ProductQuantity> = totals
            .into_iter()
            .map(|(description, quantity)| ProductQuantity {
                description: description.to_string(),
                quantity,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| a.description.cmp(&b.description))
        });
        ranked.truncate(k);
        ranked
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Dashboard snapshot: the four aggregate views bundled for presentation.

use insights_core::models::CleanedRecord;
use serde::Serialize;

use crate::aggregator::{
    KpiSummary, MonthlyRevenue, ProductQuantity, SalesAggregator, Selection, WeekdayRevenue,
};

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Computed over all records, whatever the selection.
    pub kpis: KpiSummary,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub top_products: Vec<ProductQuantity>,
    /// Seven buckets, Monday first.
    pub weekday_revenue: Vec<WeekdayRevenue>,
    /// The selection these views were computed for.
    pub selection: Selection,
}

impl DashboardSnapshot {
    /// Total revenue of the selected rows.
    pub fn selected_revenue(&self) -> f64 {
        self.weekday_revenue.iter().map(|w| w.revenue).sum()
    }

    /// `true` when the selection matched at least one row.
    pub fn has_selected_rows(&self) -> bool {
        !self.monthly_revenue.is_empty()
    }
}

/// Run every aggregate query for `selection`.
pub fn build_dashboard(
    records: &[CleanedRecord],
    selection: &Selection,
    top_k: usize,
) -> DashboardSnapshot {
    let snapshot = DashboardSnapshot {
        kpis: SalesAggregator::kpi_summary(records),
        monthly_revenue: SalesAggregator::monthly_revenue(records, selection),
        top_products: SalesAggregator::top_products(records, selection, top_k),
        weekday_revenue: SalesAggregator::weekday_revenue(records, selection),
        selection: selection.clone(),
    };

    tracing::debug!(
        selected = selection.len(),
        months = snapshot.monthly_revenue.len(),
        products = snapshot.top_products.len(),
        "dashboard recomputed"
    );

    snapshot
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{load_from_reader, LoadOptions};
    use std::path::Path;

    const SAMPLE: &str = "\
InvoiceDate,Description,Quantity,UnitPrice,CustomerID
2011-01-05 09:00,Mug,3,2.00,A
2011-01-05 10:00,Mug,-1,2.00,B
2011-02-01 11:00,Pen,5,1.00,A
";

    fn records() -> Vec<CleanedRecord> {
        load_from_reader(SAMPLE.as_bytes(), Path::new("sample.csv"), LoadOptions::default())
            .unwrap()
            .records
    }

    #[test]
    fn test_build_dashboard_example() {
        let records = records();
        let selection = SalesAggregator::default_selection(&records, 10);
        let snapshot = build_dashboard(&records, &selection, 10);

        assert!((snapshot.kpis.total_revenue - 11.0).abs() < 1e-9);
        assert_eq!(snapshot.kpis.unique_customers, 1);
        assert_eq!(snapshot.monthly_revenue.len(), 2);
        assert_eq!(snapshot.top_products[0].description, "Pen");
        assert_eq!(snapshot.weekday_revenue.len(), 7);
        assert!((snapshot.selected_revenue() - 11.0).abs() < 1e-9);
        assert!(snapshot.has_selected_rows());
    }

    #[test]
    fn test_build_dashboard_empty_selection_keeps_kpis() {
        let records = records();
        let snapshot = build_dashboard(&records, &Selection::default(), 10);

        assert!(snapshot.monthly_revenue.is_empty());
        assert!(snapshot.top_products.is_empty());
        assert!(!snapshot.has_selected_rows());
        assert_eq!(snapshot.kpis.total_units, 8);
        assert!(snapshot.kpis.total_revenue > 0.0);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let records = records();
        let snapshot = build_dashboard(&records, &Selection::new(["Mug"]), 10);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["monthly_revenue"][0]["month"], "2011-01");
        assert_eq!(json["weekday_revenue"][0]["day"], "Monday");
        assert_eq!(json["top_products"][0]["description"], "Mug");
        assert_eq!(json["selection"][0], "Mug");
        assert_eq!(json["kpis"]["total_units"], 8);
    }
}

//! Interactive dashboard state: the product selection and its views.
//!
//! A [`DashboardSession`] owns the only mutable, consumer-driven state (the
//! [`Selection`]). Every change triggers a synchronous recompute of the
//! [`DashboardSnapshot`] from the shared, read-only dataset.

use std::sync::Arc;

use insights_data::aggregator::{ProductQuantity, SalesAggregator, Selection};
use insights_data::dashboard::{build_dashboard, DashboardSnapshot};
use insights_data::reader::LoadedDataset;

/// Selection state plus the most recent snapshot for one dataset.
pub struct DashboardSession {
    dataset: Arc<LoadedDataset>,
    top_k: usize,
    /// Sidebar entries: the top products over the full dataset.
    options: Vec<ProductQuantity>,
    selection: Selection,
    snapshot: DashboardSnapshot,
}

impl DashboardSession {
    /// Seed the selection with the top `top_k` products over the whole
    /// dataset and compute the first snapshot.
    pub fn new(dataset: Arc<LoadedDataset>, top_k: usize) -> Self {
        let options = SalesAggregator::top_products_overall(&dataset.records, top_k);
        let selection = SalesAggregator::default_selection(&dataset.records, top_k);
        let snapshot = build_dashboard(&dataset.records, &selection, top_k);

        tracing::info!(
            options = options.len(),
            records = dataset.records.len(),
            "dashboard session started"
        );

        Self {
            dataset,
            top_k,
            options,
            selection,
            snapshot,
        }
    }

    /// Replace the initial selection with an explicit product list.
    ///
    /// Products not among the sidebar options are appended to them so they
    /// stay visible and toggleable.
    pub fn with_selection<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Selection::new(products);
        let extra: Vec<String> = self
            .selection
            .iter()
            .filter(|p| !self.options.iter().any(|o| o.description == *p))
            .map(str::to_string)
            .collect();
        if !extra.is_empty() {
            let extras = Selection::new(extra.iter().cloned());
            for product in SalesAggregator::top_products(&self.dataset.records, &extras, extra.len()) {
                self.options.push(product);
            }
            for missing in extra {
                if !self.options.iter().any(|o| o.description == missing) {
                    tracing::warn!(product = %missing, "selected product has no sales");
                    self.options.push(ProductQuantity {
                        description: missing,
                        quantity: 0,
                    });
                }
            }
        }
        self.recompute();
        self
    }

    // ── Selection changes ─────────────────────────────────────────────────

    /// Flip one product in or out of the selection; returns `true` if it is
    /// now selected.
    pub fn toggle(&mut self, product: &str) -> bool {
        let selected = self.selection.toggle(product);
        self.recompute();
        selected
    }

    /// Select every sidebar option.
    pub fn select_all(&mut self) {
        self.selection = self.options.iter().map(|p| p.description.clone()).collect();
        self.recompute();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn options(&self) -> &[ProductQuantity] {
        &self.options
    }

    pub fn is_selected(&self, product: &str) -> bool {
        self.selection.contains(product)
    }

    pub fn dataset(&self) -> &LoadedDataset {
        &self.dataset
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    fn recompute(&mut self) {
        self.snapshot = build_dashboard(&self.dataset.records, &self.selection, self.top_k);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_data::reader::{load_from_reader, LoadOptions};
    use std::path::Path;

    const SAMPLE: &str = "\
InvoiceDate,Description,Quantity,UnitPrice,CustomerID
2011-12-05 09:00,Lamp,2,10.00,C1
2012-01-03 09:00,Lamp,1,10.00,C2
2011-12-07 09:00,Candle,10,1.00,C1
2010-12-10 09:00,Bag,4,2.50,C3
2012-01-08 09:00,Candle,3,1.00,C4
";

    fn dataset() -> Arc<LoadedDataset> {
        Arc::new(
            load_from_reader(SAMPLE.as_bytes(), Path::new("sample.csv"), LoadOptions::default())
                .expect("sample loads"),
        )
    }

    #[test]
    fn test_new_session_seeds_top_products() {
        let session = DashboardSession::new(dataset(), 2);

        let names: Vec<&str> = session
            .options()
            .iter()
            .map(|p| p.description.as_str())
            .collect();
        assert_eq!(names, vec!["Candle", "Bag"]);
        assert!(session.is_selected("Candle"));
        assert!(session.is_selected("Bag"));
        assert!(!session.is_selected("Lamp"));
        assert_eq!(session.snapshot().top_products.len(), 2);
    }

    #[test]
    fn test_toggle_recomputes_views_but_not_kpis() {
        let mut session = DashboardSession::new(dataset(), 10);
        let kpis_before = session.snapshot().kpis.clone();

        assert!(!session.toggle("Candle"));
        let snapshot = session.snapshot();
        assert!(snapshot.top_products.iter().all(|p| p.description != "Candle"));
        assert_eq!(snapshot.kpis, kpis_before);

        assert!(session.toggle("Candle"));
        assert_eq!(session.snapshot().top_products[0].description, "Candle");
    }

    #[test]
    fn test_clear_and_select_all() {
        let mut session = DashboardSession::new(dataset(), 10);

        session.clear_selection();
        assert!(session.selection().is_empty());
        assert!(session.snapshot().monthly_revenue.is_empty());
        assert!(session.snapshot().top_products.is_empty());
        assert_eq!(session.snapshot().weekday_revenue.len(), 7);
        assert!(session.snapshot().kpis.total_revenue > 0.0);

        session.select_all();
        assert_eq!(session.selection().len(), 3);
        assert_eq!(session.snapshot().monthly_revenue.len(), 3);
    }

    #[test]
    fn test_with_selection_overrides_default() {
        let session = DashboardSession::new(dataset(), 2).with_selection(["Lamp"]);

        assert_eq!(session.selection().len(), 1);
        assert!(session.is_selected("Lamp"));
        // Lamp was outside the top 2, so it joins the sidebar options.
        assert!(session.options().iter().any(|p| p.description == "Lamp" && p.quantity == 3));
        assert_eq!(session.snapshot().top_products[0].description, "Lamp");
    }

    #[test]
    fn test_with_selection_unknown_product() {
        let session = DashboardSession::new(dataset(), 2).with_selection(["Teapot"]);

        assert!(session.options().iter().any(|p| p.description == "Teapot" && p.quantity == 0));
        assert!(session.snapshot().top_products.is_empty());
        assert!(!session.snapshot().has_selected_rows());
    }

    #[test]
    fn test_dataset_is_shared_not_copied() {
        let data = dataset();
        let session = DashboardSession::new(Arc::clone(&data), 10);
        assert!(std::ptr::eq(session.dataset(), data.as_ref()));
        assert_eq!(session.top_k(), 10);
    }
}

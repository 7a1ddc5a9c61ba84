//! Non-interactive output of one dashboard snapshot.
//!
//! `--view report` prints the same figures the terminal dashboard shows,
//! either as aligned plain text or as a JSON document.

use std::path::Path;

use serde::Serialize;

use insights_core::formatting::{format_count, format_currency, format_number};
use insights_core::Result;
use insights_data::aggregator::SalesAggregator;
use insights_data::dashboard::DashboardSnapshot;
use insights_data::reader::LoadReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    currency: &'a str,
    load: &'a LoadReport,
    dashboard: &'a DashboardSnapshot,
}

/// Serialize the load accounting and the snapshot as pretty-printed JSON.
pub fn render_json(
    source: &Path,
    load: &LoadReport,
    snapshot: &DashboardSnapshot,
    currency: &str,
) -> Result<String> {
    let report = JsonReport {
        source: source.display().to_string(),
        currency,
        load,
        dashboard: snapshot,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Plain-text report with one section per dashboard panel.
pub fn render_text(
    source: &Path,
    load: &LoadReport,
    snapshot: &DashboardSnapshot,
    currency: &str,
) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("E-commerce Sales Performance".to_string());
    out.push("=".repeat(60));
    out.push(format!("Source: {}", source.display()));
    out.push(load_summary(load));
    out.push(String::new());

    let kpis = &snapshot.kpis;
    out.push(format!(
        "{:<18}{}",
        "Total Revenue",
        format_currency(kpis.total_revenue, currency, 0)
    ));
    out.push(format!("{:<18}{}", "Total Units Sold", format_count(kpis.total_units)));
    out.push(format!(
        "{:<18}{}",
        "Unique Customers",
        format_count(kpis.unique_customers as u64)
    ));
    out.push(String::new());

    let selected: Vec<&str> = snapshot.selection.iter().collect();
    out.push(format!("Selected products ({}):", selected.len()));
    if selected.is_empty() {
        out.push("  (none)".to_string());
    }
    out.extend(selected.iter().map(|p| format!("  - {p}")));
    out.push(String::new());

    out.push("Monthly Revenue Trend".to_string());
    if snapshot.monthly_revenue.is_empty() {
        out.push(NO_SALES.to_string());
    }
    out.extend(snapshot.monthly_revenue.iter().map(|m| {
        format!("  {:<10}{:>16}", m.label(), format_currency(m.revenue, currency, 2))
    }));
    out.push(String::new());

    out.push("Top Selling Products (Units)".to_string());
    if snapshot.top_products.is_empty() {
        out.push(NO_SALES.to_string());
    }
    out.extend(snapshot.top_products.iter().enumerate().map(|(i, p)| {
        format!("  {:>2}. {:<40}{:>10}", i + 1, p.description, format_count(p.quantity))
    }));
    out.push(String::new());

    out.push("Revenue by Day of Week".to_string());
    let shares = SalesAggregator::weekday_share(&snapshot.weekday_revenue);
    out.extend(snapshot.weekday_revenue.iter().zip(&shares).map(|(w, (_, pct))| {
        format!(
            "  {:<10}{:>16}{:>8}%",
            w.day.name(),
            format_currency(w.revenue, currency, 2),
            format_number(*pct, 1)
        )
    }));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

const NO_SALES: &str = "  (no sales for the selected products)";

fn load_summary(load: &LoadReport) -> String {
    let mut line = format!(
        "Rows: {} read, {} kept, {} dropped ({} missing customer, {} non-positive quantity, {} non-positive price)",
        format_count(load.rows_read as u64),
        format_count(load.rows_kept as u64),
        format_count(load.rows_dropped() as u64),
        load.dropped_missing_customer,
        load.dropped_non_positive_quantity,
        load.dropped_non_positive_price,
    );
    if !load.rejected.is_empty() {
        let lines: Vec<String> = load.rejected.iter().map(|r| r.line.to_string()).collect();
        line.push_str(&format!(
            "\nRejected {} malformed row(s) at line(s) {}",
            load.rejected.len(),
            lines.join(", ")
        ));
    }
    line
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::LoadMode;
    use insights_data::aggregator::Selection;
    use insights_data::dashboard::build_dashboard;
    use insights_data::reader::{load_from_reader, LoadOptions, LoadedDataset};

    const SAMPLE: &str = "\
InvoiceDate,Description,Quantity,UnitPrice,CustomerID
2011-01-05 10:00,Mug,3,2.00,A
2011-01-05 11:00,Mug,-1,2.00,B
2011-02-01 09:30,Pen,5,1.00,A
";

    fn load(text: &str, mode: LoadMode) -> LoadedDataset {
        load_from_reader(text.as_bytes(), Path::new("orders.csv"), LoadOptions::new(mode))
            .expect("sample loads")
    }

    fn snapshot_for(data: &LoadedDataset, products: &[&str]) -> DashboardSnapshot {
        let selection = Selection::new(products.iter().copied());
        build_dashboard(&data.records, &selection, 10)
    }

    // ── render_text ───────────────────────────────────────────────────────────

    #[test]
    fn test_text_report_kpis_and_months() {
        let data = load(SAMPLE, LoadMode::Strict);
        let snapshot = snapshot_for(&data, &["Mug", "Pen"]);

        let text = render_text(&data.source, &data.report, &snapshot, "₹");

        assert!(text.contains("Source: orders.csv"));
        assert!(text.contains("Total Revenue     ₹11"));
        assert!(text.contains("Total Units Sold  8"));
        assert!(text.contains("Unique Customers  1"));
        assert!(text.contains("2011-01"));
        assert!(text.contains("₹6.00"));
        assert!(text.contains("2011-02"));
        assert!(text.contains("1 dropped (0 missing customer, 1 non-positive quantity"));
        let jan = text.find("2011-01").unwrap();
        let feb = text.find("2011-02").unwrap();
        assert!(jan < feb);
    }

    #[test]
    fn test_text_report_empty_selection() {
        let data = load(SAMPLE, LoadMode::Strict);
        let snapshot = snapshot_for(&data, &[]);

        let text = render_text(&data.source, &data.report, &snapshot, "$");

        assert!(text.contains("Selected products (0):\n  (none)"));
        assert_eq!(text.matches(NO_SALES).count(), 2);
        // KPIs still cover every cleaned row.
        assert!(text.contains("Total Revenue     $11"));
        // Weekday section keeps all seven days.
        for day in ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"] {
            assert!(text.contains(day), "missing {day}");
        }
    }

    #[test]
    fn test_text_report_lists_rejected_lines() {
        let data = load(
            "InvoiceDate,Description,Quantity,UnitPrice,CustomerID\n\
             not a date,Mug,1,1.00,A\n\
             2011-01-05 10:00,Mug,3,2.00,A\n",
            LoadMode::Lenient,
        );
        let snapshot = snapshot_for(&data, &["Mug"]);

        let text = render_text(&data.source, &data.report, &snapshot, "₹");

        assert!(text.contains("Rejected 1 malformed row(s) at line(s) 2"));
    }

    // ── render_json ───────────────────────────────────────────────────────────

    #[test]
    fn test_json_report_shape() {
        let data = load(SAMPLE, LoadMode::Strict);
        let snapshot = snapshot_for(&data, &["Mug"]);

        let json = render_json(&data.source, &data.report, &snapshot, "₹").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["source"], "orders.csv");
        assert_eq!(value["currency"], "₹");
        assert_eq!(value["load"]["rows_read"], 3);
        assert_eq!(value["load"]["rows_kept"], 2);
        assert_eq!(value["dashboard"]["monthly_revenue"][0]["month"], "2011-01");
        assert_eq!(value["dashboard"]["top_products"][0]["description"], "Mug");
        assert_eq!(value["dashboard"]["weekday_revenue"].as_array().unwrap().len(), 7);
        assert_eq!(value["dashboard"]["selection"], serde_json::json!(["Mug"]));
    }
}

//! The three headline metric cards shown under the header.
//!
//! Cards always describe the full cleaned dataset; the product selection
//! never changes them.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use insights_core::formatting::{format_count, format_currency};
use insights_data::aggregator::KpiSummary;

use crate::themes::Theme;

/// One labelled metric.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

pub struct KpiCards<'a> {
    pub summary: &'a KpiSummary,
    pub currency: &'a str,
    pub theme: &'a Theme,
}

impl<'a> KpiCards<'a> {
    pub fn new(summary: &'a KpiSummary, currency: &'a str, theme: &'a Theme) -> Self {
        Self {
            summary,
            currency,
            theme,
        }
    }

    /// Total Revenue, Total Units Sold and Unique Customers, in that order.
    pub fn cards(&self) -> [KpiCard; 3] {
        [
            KpiCard {
                label: "Total Revenue",
                value: format_currency(self.summary.total_revenue, self.currency, 0),
            },
            KpiCard {
                label: "Total Units Sold",
                value: format_count(self.summary.total_units),
            },
            KpiCard {
                label: "Unique Customers",
                value: format_count(self.summary.unique_customers as u64),
            },
        ]
    }

    /// Draw the cards side by side in equal thirds of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let styles = [
            self.theme.kpi_revenue,
            self.theme.kpi_units,
            self.theme.kpi_customers,
        ];

        for ((card, style), column) in self.cards().into_iter().zip(styles).zip(columns.iter()) {
            frame.render_widget(self.card_widget(card, style), *column);
        }
    }

    fn card_widget(&self, card: KpiCard, value_style: Style) -> Paragraph<'static> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(card.label, self.theme.label));
        Paragraph::new(Line::from(Span::styled(card.value, value_style)))
            .alignment(Alignment::Center)
            .block(block)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

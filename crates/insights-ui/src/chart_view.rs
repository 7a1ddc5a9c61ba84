//! Chart panels for the filtered views of the dashboard.
//!
//! Each `render_*` function draws one bordered panel into the given area:
//! the monthly revenue line, the top-products horizontal bars and the
//! weekday revenue share. The pure helpers that shape data for those widgets
//! are public so they can be tested without a terminal.

use ratatui::{
    layout::{Alignment, Direction, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use insights_core::formatting::{format_count, format_currency};
use insights_data::aggregator::{MonthlyRevenue, ProductQuantity, SalesAggregator, WeekdayRevenue};

use crate::components::share_bar::share_lines;
use crate::themes::Theme;

/// Shown in a filtered panel when the selection matches nothing.
pub const NO_SELECTION_MESSAGE: &str = "No sales for the selected products";

// ── Data shaping ──────────────────────────────────────────────────────────────

/// `(index, revenue)` points, one per month in chronological order.
pub fn monthly_points(monthly: &[MonthlyRevenue]) -> Vec<(f64, f64)> {
    monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, m.revenue))
        .collect()
}

/// Month labels for the x axis: first, middle and last.
pub fn month_axis_labels(monthly: &[MonthlyRevenue]) -> Vec<String> {
    match monthly.len() {
        0 => Vec::new(),
        1 | 2 => monthly.iter().map(MonthlyRevenue::label).collect(),
        n => vec![
            monthly[0].label(),
            monthly[n / 2].label(),
            monthly[n - 1].label(),
        ],
    }
}

/// Y-axis range with headroom above the largest month. Never degenerate.
pub fn revenue_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let max = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
    if max > 0.0 {
        [0.0, max * 1.1]
    } else {
        [0.0, 1.0]
    }
}

/// Shorten `text` to at most `max_width` display columns, marking the cut
/// with `…`.
pub fn truncate_label(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ── Panels ────────────────────────────────────────────────────────────────────

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(title, theme.title))
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(Span::styled(NO_SELECTION_MESSAGE, theme.warning)))
        .alignment(Alignment::Center)
        .block(panel(title, theme));
    frame.render_widget(paragraph, area);
}

/// Monthly revenue as a line chart over the month index.
pub fn render_monthly_chart(
    frame: &mut Frame,
    area: Rect,
    monthly: &[MonthlyRevenue],
    currency: &str,
    theme: &Theme,
) {
    const TITLE: &str = " Monthly Revenue Trend ";
    if monthly.is_empty() {
        render_empty(frame, area, TITLE, theme);
        return;
    }

    let points = monthly_points(monthly);
    let y_bounds = revenue_bounds(&points);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let y_labels = vec![
        format_currency(y_bounds[0], currency, 0),
        format_currency(y_bounds[1] / 2.0, currency, 0),
        format_currency(y_bounds[1], currency, 0),
    ];

    let dataset = Dataset::default()
        .name("Revenue")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(panel(TITLE, theme))
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(month_axis_labels(monthly)),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Units sold per product as horizontal bars, best seller on top.
pub fn render_top_products(frame: &mut Frame, area: Rect, products: &[ProductQuantity], theme: &Theme) {
    const TITLE: &str = " Top Selling Products (Units) ";
    if products.is_empty() {
        render_empty(frame, area, TITLE, theme);
        return;
    }

    let label_width = (area.width as usize / 3).clamp(8, 32);
    let bars: Vec<Bar> = products
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.quantity)
                .label(Line::from(truncate_label(&p.description, label_width)))
                .text_value(format_count(p.quantity))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(TITLE, theme))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(theme.bar)
        .value_style(theme.bar_value)
        .label_style(theme.label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Share of filtered revenue per weekday, Monday first.
pub fn render_weekday_share(
    frame: &mut Frame,
    area: Rect,
    weekday: &[WeekdayRevenue],
    theme: &Theme,
) {
    const TITLE: &str = " Revenue by Day of Week ";
    let total: f64 = weekday.iter().map(|w| w.revenue).sum();
    if total <= 0.0 {
        render_empty(frame, area, TITLE, theme);
        return;
    }

    // Day label and percentage take 12 columns; borders take 2.
    let bar_width = area.width.saturating_sub(14).max(1);
    let shares = SalesAggregator::weekday_share(weekday);
    let paragraph = Paragraph::new(share_lines(&shares, bar_width, theme)).block(panel(TITLE, theme));
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use crate::themes::Theme;
use insights_core::models::DayOfWeek;
use ratatui::text::{Line, Span};

/// Visual configuration of a share bar.
pub struct ShareBarConfig {
    /// Bar width in columns, excluding labels.
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ShareBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

/// One weekday's share of filtered revenue, drawn as
/// `Mon ████░░░░  23.5%`.
pub struct ShareBar<'a> {
    pub day: DayOfWeek,
    /// Share in percent, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    pub theme: &'a Theme,
    pub config: ShareBarConfig,
}

impl<'a> ShareBar<'a> {
    pub fn new(day: DayOfWeek, percentage: f64, theme: &'a Theme) -> Self {
        Self {
            day,
            percentage: percentage.clamp(0.0, 100.0),
            theme,
            config: ShareBarConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = ((self.percentage / 100.0) * self.config.width as f64).round() as u16;
        let filled = filled.min(self.config.width);
        let empty = self.config.width - filled;

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(format!("{} ", self.day.short_name()), self.theme.label),
            Span::styled(filled_str, self.theme.share_style(self.percentage)),
            Span::styled(empty_str, self.theme.share_empty),
            Span::styled(format!(" {:>5.1}%", self.percentage), self.theme.share_label),
        ])
    }
}

/// Lines for all seven weekdays, in the order given.
pub fn share_lines<'a>(shares: &[(DayOfWeek, f64)], width: u16, theme: &'a Theme) -> Vec<Line<'a>> {
    shares
        .iter()
        .map(|&(day, pct)| ShareBar::new(day, pct, theme).with_width(width).to_line())
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration either side of the dashboard title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Three-line dashboard header:
///
/// 1. Title between accents.
/// 2. A 60-column `─` rule.
/// 3. `[ source file | n of m products selected ]`.
pub struct Header<'a> {
    /// Display name of the data file.
    pub source: &'a str,
    pub selected: usize,
    pub available: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, selected: usize, available: usize, theme: &'a Theme) -> Self {
        Self {
            source,
            selected,
            available,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let status_style = if self.selected == 0 {
            self.theme.warning
        } else {
            self.theme.value
        };

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.title_accent),
                Span::styled(" E-COMMERCE SALES INSIGHTS ", self.theme.title),
                Span::styled(ACCENT, self.theme.title_accent),
            ]),
            Line::from(Span::styled("─".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} of {} products selected", self.selected, self.available),
                    status_style,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

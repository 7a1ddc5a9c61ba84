use ratatui::style::{Color, Modifier, Style};

/// Terminal background brightness, as far as it can be detected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Guess the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Background codes 0 through 6 count as dark and 7 and above as light. A
/// missing or unreadable variable yields [`BackgroundType::Unknown`].
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| parse_colorfgbg(&val))
        .unwrap_or(BackgroundType::Unknown)
}

fn parse_colorfgbg(val: &str) -> Option<BackgroundType> {
    let bg = val.split(';').next_back()?.trim().parse::<u8>().ok()?;
    Some(if bg <= 6 {
        BackgroundType::Dark
    } else {
        BackgroundType::Light
    })
}

/// Every style the dashboard widgets draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub title: Style,
    pub title_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub border: Style,
    pub warning: Style,

    // ── KPI cards ────────────────────────────────────────────────────────────
    pub kpi_revenue: Style,
    pub kpi_units: Style,
    pub kpi_customers: Style,

    // ── Product sidebar ──────────────────────────────────────────────────────
    pub option_selected: Style,
    pub option_unselected: Style,
    /// Row under the cursor.
    pub cursor: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub line: Style,
    pub axis: Style,
    pub bar: Style,
    pub bar_value: Style,

    // ── Weekday share ────────────────────────────────────────────────────────
    /// Share of 20 % or more.
    pub share_high: Style,
    /// Share between 10 % and 20 %.
    pub share_medium: Style,
    pub share_low: Style,
    pub share_empty: Style,
    pub share_label: Style,
}

impl Theme {
    /// Theme for dark terminal backgrounds. Used as the fallback.
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            title_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            warning: Style::default().fg(Color::Yellow),

            kpi_revenue: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            kpi_units: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            kpi_customers: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            option_selected: Style::default().fg(Color::Green),
            option_unselected: Style::default().fg(Color::Gray),
            cursor: Style::default().fg(Color::Black).bg(Color::Cyan),

            line: Style::default().fg(Color::Cyan),
            axis: Style::default().fg(Color::Gray),
            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default().fg(Color::White).bg(Color::Blue),

            share_high: Style::default().fg(Color::Green),
            share_medium: Style::default().fg(Color::Yellow),
            share_low: Style::default().fg(Color::Blue),
            share_empty: Style::default().fg(Color::DarkGray),
            share_label: Style::default().fg(Color::Gray),
        }
    }

    /// Theme for light terminal backgrounds: dark text with saturated accents.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            title_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            warning: Style::default().fg(Color::Red),

            kpi_revenue: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            kpi_units: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            kpi_customers: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            option_selected: Style::default().fg(Color::Blue),
            option_unselected: Style::default().fg(Color::DarkGray),
            cursor: Style::default().fg(Color::White).bg(Color::Blue),

            line: Style::default().fg(Color::Blue),
            axis: Style::default().fg(Color::DarkGray),
            bar: Style::default().fg(Color::Magenta),
            bar_value: Style::default().fg(Color::White).bg(Color::Magenta),

            share_high: Style::default().fg(Color::Green),
            share_medium: Style::default().fg(Color::Magenta),
            share_low: Style::default().fg(Color::Blue),
            share_empty: Style::default().fg(Color::Gray),
            share_label: Style::default().fg(Color::DarkGray),
        }
    }

    /// Basic 8-colour ANSI palette with no bold text.
    pub fn classic() -> Self {
        Self {
            title: Style::default().fg(Color::Cyan),
            title_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            border: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),

            kpi_revenue: Style::default().fg(Color::Green),
            kpi_units: Style::default().fg(Color::Cyan),
            kpi_customers: Style::default().fg(Color::Magenta),

            option_selected: Style::default().fg(Color::Green),
            option_unselected: Style::default().fg(Color::White),
            cursor: Style::default().fg(Color::Black).bg(Color::White),

            line: Style::default().fg(Color::Green),
            axis: Style::default().fg(Color::White),
            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default().fg(Color::Black).bg(Color::Cyan),

            share_high: Style::default().fg(Color::Green),
            share_medium: Style::default().fg(Color::Yellow),
            share_low: Style::default().fg(Color::Cyan),
            share_empty: Style::default().fg(Color::DarkGray),
            share_label: Style::default().fg(Color::White),
        }
    }

    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Resolve a `--theme` value. Anything unrecognised, `auto` included,
    /// goes through [`Theme::auto_detect`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Fill style for a weekday's share of revenue, in percent.
    pub fn share_style(&self, percentage: f64) -> Style {
        if percentage >= 20.0 {
            self.share_high
        } else if percentage >= 10.0 {
            self.share_medium
        } else {
            self.share_low
        }
    }

    /// Sidebar style for an option depending on whether it is selected.
    pub fn option_style(&self, selected: bool) -> Style {
        if selected {
            self.option_selected
        } else {
            self.option_unselected
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Background detection ─────────────────────────────────────────────────

    #[test]
    fn test_parse_colorfgbg_dark_and_light() {
        assert_eq!(parse_colorfgbg("15;0"), Some(BackgroundType::Dark));
        assert_eq!(parse_colorfgbg("0;15"), Some(BackgroundType::Light));
        assert_eq!(parse_colorfgbg("12;default;7"), Some(BackgroundType::Light));
    }

    #[test]
    fn test_parse_colorfgbg_garbage() {
        assert_eq!(parse_colorfgbg(""), None);
        assert_eq!(parse_colorfgbg("white;black"), None);
    }

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.title.fg, Some(Color::Cyan));
        assert!(t.title.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.kpi_revenue.fg, Some(Color::Green));
        assert_eq!(t.cursor.bg, Some(Color::Cyan));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.title.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.line.fg, Some(Color::Blue));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        for style in [t.title, t.value, t.kpi_revenue, t.kpi_units, t.kpi_customers] {
            assert!(!style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light").title.fg, Some(Color::Blue));
        assert_eq!(Theme::from_name("DARK").title.fg, Some(Color::Cyan));
        let classic = Theme::from_name("classic");
        assert!(!classic.title.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("neon");
        assert!(t.title.fg.is_some());
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    #[test]
    fn test_share_style_thresholds() {
        let t = Theme::dark();
        assert_eq!(t.share_style(0.0).fg, Some(Color::Blue));
        assert_eq!(t.share_style(9.99).fg, Some(Color::Blue));
        assert_eq!(t.share_style(10.0).fg, Some(Color::Yellow));
        assert_eq!(t.share_style(19.9).fg, Some(Color::Yellow));
        assert_eq!(t.share_style(20.0).fg, Some(Color::Green));
        assert_eq!(t.share_style(100.0).fg, Some(Color::Green));
    }

    #[test]
    fn test_option_style() {
        let t = Theme::dark();
        assert_eq!(t.option_style(true).fg, Some(Color::Green));
        assert_eq!(t.option_style(false).fg, Some(Color::Gray));
    }
}

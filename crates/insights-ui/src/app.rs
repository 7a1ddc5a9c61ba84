//! Application state and the interactive terminal event loop.
//!
//! [`App`] owns the theme, the [`DashboardSession`] and the sidebar cursor.
//! Keys mutate the session's product selection; every frame is drawn from
//! the session's current snapshot.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use insights_core::formatting::format_count;
use insights_runtime::session::DashboardSession;

use crate::chart_view;
use crate::components::header::Header;
use crate::components::kpi_cards::KpiCards;
use crate::themes::Theme;

const KEY_HELP: &str = " ↑/↓ move · space toggle · a select all · c clear · q quit";

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub session: DashboardSession,
    /// Currency symbol for revenue figures.
    pub currency: String,
    /// Set to `true` to leave the event loop on the next iteration.
    pub should_quit: bool,
    source_label: String,
    list_state: ListState,
}

impl App {
    pub fn new(session: DashboardSession, theme_name: &str, currency: impl Into<String>) -> Self {
        let source_label = session.dataset().source.display().to_string();
        let mut list_state = ListState::default();
        if !session.options().is_empty() {
            list_state.select(Some(0));
        }
        Self {
            theme: Theme::from_name(theme_name),
            session,
            currency: currency.into(),
            should_quit: false,
            source_label,
            list_state,
        }
    }

    /// Index of the sidebar option under the cursor.
    pub fn cursor(&self) -> Option<usize> {
        self.list_state.selected()
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Take over the terminal and run until `q` or `Ctrl+C`.
    ///
    /// Polls for keys every 250 ms. The terminal is restored before
    /// returning, whatever the loop's outcome.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the cursor, the selection or the quit flag.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.session.options().len().saturating_sub(1)),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('a') => {
                self.session.select_all();
                tracing::debug!(selected = self.session.selection().len(), "selected all products");
            }
            KeyCode::Char('c') => {
                self.session.clear_selection();
                tracing::debug!("cleared product selection");
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.session.options().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.list_state.select(Some(next as usize));
    }

    fn move_to(&mut self, index: usize) {
        if !self.session.options().is_empty() {
            self.list_state.select(Some(index));
        }
    }

    fn toggle_current(&mut self) {
        let Some(product) = self
            .list_state
            .selected()
            .and_then(|i| self.session.options().get(i))
            .map(|p| p.description.clone())
        else {
            return;
        };
        let selected = self.session.toggle(&product);
        tracing::debug!(product = %product, selected, "toggled product");
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the whole dashboard into `frame`.
    pub fn render(&mut self, frame: &mut Frame) {
        let [header_area, kpi_area, body_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(
            &self.source_label,
            self.session.selection().len(),
            self.session.options().len(),
            &self.theme,
        );
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let snapshot = self.session.snapshot();
        KpiCards::new(&snapshot.kpis, &self.currency, &self.theme).render(frame, kpi_area);

        let [sidebar_area, charts_area] =
            Layout::horizontal([Constraint::Percentage(28), Constraint::Percentage(72)])
                .areas(body_area);
        let [trend_row, weekday_area] =
            Layout::vertical([Constraint::Min(8), Constraint::Length(9)]).areas(charts_area);
        let [monthly_area, products_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(trend_row);

        chart_view::render_monthly_chart(
            frame,
            monthly_area,
            &snapshot.monthly_revenue,
            &self.currency,
            &self.theme,
        );
        chart_view::render_top_products(frame, products_area, &snapshot.top_products, &self.theme);
        chart_view::render_weekday_share(frame, weekday_area, &snapshot.weekday_revenue, &self.theme);

        self.render_sidebar(frame, sidebar_area);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(KEY_HELP, self.theme.dim))),
            help_area,
        );
    }

    fn render_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .session
            .options()
            .iter()
            .map(|option| {
                let selected = self.session.is_selected(&option.description);
                let marker = if selected { "[x] " } else { "[ ] " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, self.theme.option_style(selected)),
                    Span::styled(option.description.clone(), self.theme.text),
                    Span::styled(format!(" ({})", format_count(option.quantity)), self.theme.dim),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border)
                    .title(Span::styled(" Select Products ", self.theme.title)),
            )
            .highlight_style(self.theme.cursor)
            .highlight_symbol("» ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

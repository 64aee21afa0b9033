//! Main application state and TUI event loop for the incident dashboard.
//!
//! [`App`] owns the [`DashboardSession`]; [`TerminalRenderer`] owns the
//! terminal and the purely visual state (theme, page, table cursor). Each
//! key press either becomes an [`Interaction`] on the session, which
//! recomputes the snapshot, or a view change that only redraws.

use std::ops::RangeInclusive;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, TableState},
    Frame, Terminal,
};

use dashboard_core::error::{DashboardError, Result};
use dashboard_data::snapshot::DashboardSnapshot;
use dashboard_data::views::YEAR_RANGE;
use dashboard_runtime::renderer::Renderer;
use dashboard_runtime::session::{DashboardSession, Interaction};

use crate::chart_view;
use crate::components::header::Header;
use crate::components::slider::{checkbox_line, Slider};
use crate::map_view;
use crate::table_view;
use crate::themes::Theme;

/// How long to wait for a key before redrawing.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Rows moved by PageUp/PageDown in the table.
const PAGE_SCROLL: isize = 10;

// ── Page ──────────────────────────────────────────────────────────────────────

/// Which group of visualizations is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Incident map (year) and density map (hour).
    Maps,
    /// Borough timeline and peak-hour comparison.
    Trends,
    /// Age and sex breakdowns.
    Demographics,
    /// Date × borough table.
    Table,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Maps, Page::Trends, Page::Demographics, Page::Table];

    pub fn title(self) -> &'static str {
        match self {
            Page::Maps => "Maps",
            Page::Trends => "Trends",
            Page::Demographics => "Demographics",
            Page::Table => "Table",
        }
    }

    fn index(self) -> usize {
        Page::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

// ── Key mapping ───────────────────────────────────────────────────────────────

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Interact(Interaction),
    NextPage,
    PrevPage,
    /// Move the table cursor by this many rows.
    Scroll(isize),
}

/// Map a key event to an action. Releases and repeats are ignored.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Right => Action::Interact(Interaction::NextYear),
        KeyCode::Left => Action::Interact(Interaction::PrevYear),
        KeyCode::Up => Action::Interact(Interaction::NextHour),
        KeyCode::Down => Action::Interact(Interaction::PrevHour),
        KeyCode::Char('t') => Action::Interact(Interaction::ToggleDateTable),
        KeyCode::Tab => Action::NextPage,
        KeyCode::BackTab => Action::PrevPage,
        KeyCode::Char('j') => Action::Scroll(1),
        KeyCode::Char('k') => Action::Scroll(-1),
        KeyCode::PageDown => Action::Scroll(PAGE_SCROLL),
        KeyCode::PageUp => Action::Scroll(-PAGE_SCROLL),
        _ => return None,
    };
    Some(action)
}

// ── DashboardView ─────────────────────────────────────────────────────────────

/// Visual state that never affects the computed tables.
pub struct DashboardView {
    pub theme: Theme,
    pub page: Page,
    /// Display name of the source file for the header.
    pub source: String,
    /// Bounds of the hour slider.
    pub hour_range: RangeInclusive<u32>,
    pub table_state: TableState,
}

impl DashboardView {
    pub fn new(theme: Theme, source: String, hour_range: RangeInclusive<u32>) -> Self {
        Self {
            theme,
            page: Page::Maps,
            source,
            hour_range,
            table_state: TableState::default(),
        }
    }

    /// Move the table cursor; the renderer clamps it to the row count.
    pub fn scroll(&mut self, delta: isize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(current.saturating_add_signed(delta)));
    }

    /// Draw the whole screen for `snapshot`.
    pub fn draw(&mut self, frame: &mut Frame, snapshot: &DashboardSnapshot) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.base()), area);

        let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let header = Header::new(snapshot.total_incidents, &self.source, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);
        frame.render_widget(Paragraph::new(self.tabs_line()), tabs_area);

        match self.page {
            Page::Maps => self.draw_maps(frame, body_area, snapshot),
            Page::Trends => self.draw_trends(frame, body_area, snapshot),
            Page::Demographics => self.draw_demographics(frame, body_area, snapshot),
            Page::Table => self.draw_table(frame, body_area, snapshot),
        }

        frame.render_widget(Paragraph::new(self.help_line()), footer_area);
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn tabs_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, page) in Page::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", self.theme.separator));
            }
            let style = if *page == self.page {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            spans.push(Span::styled(page.title(), style));
        }
        Line::from(spans)
    }

    fn help_line(&self) -> Line<'static> {
        Line::from(Span::styled(
            "←/→ year  ↑/↓ hour  t table  tab page  j/k scroll  q quit",
            self.theme.dim,
        ))
    }

    fn year_slider(&self, snapshot: &DashboardSnapshot, width: u16) -> Line<'_> {
        Slider::new(
            "Year",
            snapshot.filters.year as i64,
            *YEAR_RANGE.start() as i64,
            *YEAR_RANGE.end() as i64,
            &self.theme,
        )
        .width(slider_width(width))
        .to_line()
    }

    fn hour_slider(&self, snapshot: &DashboardSnapshot, width: u16) -> Line<'_> {
        Slider::new(
            "Hour",
            snapshot.filters.hour as i64,
            *self.hour_range.start() as i64,
            *self.hour_range.end() as i64,
            &self.theme,
        )
        .width(slider_width(width))
        .to_line()
    }

    fn draw_maps(&self, frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);
        let [year_area, point_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(left);
        let [hour_area, density_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(right);

        frame.render_widget(
            Paragraph::new(self.year_slider(snapshot, year_area.width)),
            year_area,
        );
        frame.render_widget(
            Paragraph::new(self.hour_slider(snapshot, hour_area.width)),
            hour_area,
        );
        map_view::render_incident_map(
            frame,
            point_area,
            snapshot.filters.year,
            &snapshot.incident_points,
            snapshot.map_view.as_ref(),
            &self.theme,
        );
        map_view::render_density_map(
            frame,
            density_area,
            snapshot.filters.hour,
            &snapshot.density_points,
            snapshot.map_view.as_ref(),
            &self.theme,
        );
    }

    fn draw_trends(&self, frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(area);
        chart_view::render_borough_timeline(frame, top, &snapshot.borough_timeline, &self.theme);
        chart_view::render_peak_hours(
            frame,
            bottom,
            &snapshot.peak_hours,
            snapshot.filters.compare_hours,
            &self.theme,
        );
    }

    fn draw_demographics(&self, frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(area);
        let halves = [Constraint::Percentage(50), Constraint::Percentage(50)];
        let [perp_age, vic_age] = Layout::horizontal(halves).areas(top);
        let [perp_sex, vic_sex] = Layout::horizontal(halves).areas(bottom);

        let theme = &self.theme;
        chart_view::render_age_chart(frame, perp_age, "Perpetrator age", &snapshot.perp_ages, theme);
        chart_view::render_age_chart(frame, vic_age, "Victim age", &snapshot.vic_ages, theme);
        chart_view::render_sex_shares(frame, perp_sex, "Perpetrator sex", &snapshot.perp_sex, theme);
        chart_view::render_sex_shares(frame, vic_sex, "Victim sex", &snapshot.vic_sex, theme);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let [checkbox_area, table_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(checkbox_line(
                "Show incidents by date and borough",
                snapshot.date_borough.is_some(),
                &self.theme,
            )),
            checkbox_area,
        );

        match snapshot.date_borough.as_deref() {
            Some(rows) => table_view::render_date_borough_table(
                frame,
                table_area,
                rows,
                &mut self.table_state,
                &self.theme,
            ),
            None => frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Press 't' to show the table",
                    self.theme.dim,
                ))),
                table_area,
            ),
        }
    }
}

/// Slider track width for a line `width` columns wide, leaving room for the
/// label and bounds.
fn slider_width(width: u16) -> u16 {
    width.saturating_sub(26).clamp(5, 40)
}

// ── TerminalRenderer ──────────────────────────────────────────────────────────

/// [`Renderer`] that draws snapshots into a ratatui terminal.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    view: DashboardView,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, view: DashboardView) -> Self {
        Self { terminal, view }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut DashboardView {
        &mut self.view
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        let view = &mut self.view;
        self.terminal
            .draw(|frame| view.draw(frame, snapshot))
            .map_err(|e| DashboardError::Terminal(e.to_string()))?;
        Ok(())
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    session: DashboardSession,
    theme_name: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(session: DashboardSession, theme_name: &str) -> Self {
        Self {
            session,
            theme_name: theme_name.to_string(),
            should_quit: false,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Visual state for this session's table.
    pub fn view(&self) -> DashboardView {
        let source = self
            .session
            .table()
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.session.table().source.display().to_string());
        DashboardView::new(
            Theme::from_name(&self.theme_name),
            source,
            self.session.hour_range(),
        )
    }

    /// Apply one action to the session or the view.
    pub fn handle_action(&mut self, view: &mut DashboardView, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Interact(interaction) => {
                self.session.apply(interaction);
                if interaction == Interaction::ToggleDateTable
                    && self.session.state().show_date_table
                {
                    view.page = Page::Table;
                }
            }
            Action::NextPage => view.page = view.page.next(),
            Action::PrevPage => view.page = view.page.prev(),
            Action::Scroll(delta) => view.scroll(delta),
        }
    }

    /// Run the dashboard in the alternate screen until `q`, `Esc` or
    /// `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout);
    /// every interaction recomputes the snapshot on this thread.
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| DashboardError::Terminal(e.to_string()))?;
        let mut renderer = TerminalRenderer::new(terminal, self.view());

        let result = self.event_loop(&mut renderer);

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(renderer.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
        renderer.terminal_mut().show_cursor()?;

        result
    }

    fn event_loop<B: Backend>(&mut self, renderer: &mut TerminalRenderer<B>) -> Result<()> {
        while !self.should_quit {
            self.session.render(renderer)?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(action) = action_for_key(key) {
                        tracing::debug!(?action, "key action");
                        self.handle_action(renderer.view_mut(), action);
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::models::IncidentTable;
    use dashboard_core::settings::Settings;
    use dashboard_data::reader::parse_incidents;
    use ratatui::backend::TestBackend;
    use std::path::Path;
    use std::sync::Arc;

    const CSV: &str = "\
INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,PERP_AGE_GROUP,PERP_SEX,VIC_AGE_GROUP,VIC_SEX,Latitude,Longitude
1,01/05/2006,23:10:00,BRONX,<18,M,18-24,M,40.85,-73.89
2,02/10/2006,09:30:00,BRONX,940,F,25-44,F,40.83,-73.92
3,12/31/2007,23:05:00,QUEENS,,,65+,U,,
4,06/15/2007,09:45:00,QUEENS,25-44,M,25-44,M,40.70,-73.80";

    fn table() -> Arc<IncidentTable> {
        Arc::new(parse_incidents(CSV.as_bytes(), Path::new("/data/incidents.csv")).unwrap())
    }

    fn app(args: &[&str]) -> App {
        let mut argv = vec!["shooting-dashboard"];
        argv.extend_from_slice(args);
        let settings = Settings::load_from_args(argv);
        App::new(DashboardSession::from_settings(table(), &settings), &settings.theme)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn renderer(app: &App, width: u16, height: u16) -> TerminalRenderer<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        TerminalRenderer::new(terminal, app.view())
    }

    fn screen(renderer: &TerminalRenderer<TestBackend>) -> String {
        renderer
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Page ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::Maps.next(), Page::Trends);
        assert_eq!(Page::Table.next(), Page::Maps);
        assert_eq!(Page::Maps.prev(), Page::Table);
        for page in Page::ALL {
            assert_eq!(page.next().prev(), page);
        }
    }

    // ── action_for_key ────────────────────────────────────────────────────────

    #[test]
    fn test_action_for_key_bindings() {
        assert_eq!(action_for_key(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            action_for_key(press(KeyCode::Right)),
            Some(Action::Interact(Interaction::NextYear))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Down)),
            Some(Action::Interact(Interaction::PrevHour))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('t'))),
            Some(Action::Interact(Interaction::ToggleDateTable))
        );
        assert_eq!(action_for_key(press(KeyCode::Tab)), Some(Action::NextPage));
        assert_eq!(action_for_key(press(KeyCode::Char('j'))), Some(Action::Scroll(1)));
        assert_eq!(action_for_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_action_for_key_ignores_release() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(key), None);
    }

    // ── handle_action ─────────────────────────────────────────────────────────

    #[test]
    fn test_year_keys_update_session() {
        let mut app = app(&[]);
        let mut view = app.view();
        app.handle_action(&mut view, Action::Interact(Interaction::NextYear));
        assert_eq!(app.session().state().year, 2007);
        assert_eq!(app.session().snapshot().filters.year, 2007);
        app.handle_action(&mut view, Action::Interact(Interaction::PrevYear));
        app.handle_action(&mut view, Action::Interact(Interaction::PrevYear));
        assert_eq!(app.session().state().year, 2006);
    }

    #[test]
    fn test_toggle_table_switches_page() {
        let mut app = app(&[]);
        let mut view = app.view();
        app.handle_action(&mut view, Action::Interact(Interaction::ToggleDateTable));
        assert_eq!(view.page, Page::Table);
        assert!(app.session().snapshot().date_borough.is_some());
    }

    #[test]
    fn test_quit_and_paging() {
        let mut app = app(&[]);
        let mut view = app.view();
        app.handle_action(&mut view, Action::NextPage);
        assert_eq!(view.page, Page::Trends);
        app.handle_action(&mut view, Action::PrevPage);
        assert_eq!(view.page, Page::Maps);
        assert!(!app.should_quit);
        app.handle_action(&mut view, Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_never_goes_negative() {
        let app = app(&[]);
        let mut view = app.view();
        view.scroll(-5);
        assert_eq!(view.table_state.selected(), Some(0));
        view.scroll(3);
        assert_eq!(view.table_state.selected(), Some(3));
    }

    #[test]
    fn test_view_uses_file_name_and_hour_range() {
        let app = app(&["--theme", "dark"]);
        let view = app.view();
        assert_eq!(view.source, "incidents.csv");
        assert_eq!(view.hour_range, 9..=23);
        assert_eq!(view.theme.background, Theme::dark().background);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_page() {
        let mut app = app(&["--show-date-table"]);
        let mut renderer = renderer(&app, 120, 40);
        for _ in Page::ALL {
            app.session().render(&mut renderer).unwrap();
            let text = screen(&renderer);
            assert!(text.contains("NYC SHOOTING INCIDENTS"));
            assert!(text.contains("4 incidents"));
            let view = renderer.view_mut();
            app.handle_action(view, Action::NextPage);
        }
    }

    #[test]
    fn test_render_maps_page_shows_sliders() {
        let app = app(&["--year", "2007"]);
        let mut renderer = renderer(&app, 120, 30);
        app.session().render(&mut renderer).unwrap();
        let text = screen(&renderer);
        assert!(text.contains("Year"));
        assert!(text.contains("[2007]"));
        assert!(text.contains("Hour"));
        assert!(text.contains("Incidents in 2007: 1"));
    }

    #[test]
    fn test_render_table_page_without_table() {
        let mut app = app(&[]);
        let mut renderer = renderer(&app, 100, 30);
        renderer.view_mut().page = Page::Table;
        app.session().render(&mut renderer).unwrap();
        assert!(screen(&renderer).contains("Press 't' to show the table"));

        app.handle_action(
            renderer.view_mut(),
            Action::Interact(Interaction::ToggleDateTable),
        );
        app.session().render(&mut renderer).unwrap();
        let text = screen(&renderer);
        assert!(text.contains("[x]"));
        assert!(text.contains("2006-01-05"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let app = app(&[]);
        let mut renderer = renderer(&app, 20, 8);
        app.session().render(&mut renderer).unwrap();
    }
}

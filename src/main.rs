use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Clear, Dataset as ChartDataset, GraphType, Paragraph, Row,
    Table, Tabs,
};
use tracing_subscriber::EnvFilter;

use wxfoot_terminal::config::AppConfig;
use wxfoot_terminal::dataset::Dataset;
use wxfoot_terminal::demo_data;
use wxfoot_terminal::export;
use wxfoot_terminal::projection::{self, BarSort, ChartTitle};
use wxfoot_terminal::state::{AppState, RawView, Screen, Tab};
use wxfoot_terminal::stats::Trendline;

const LIMIT_STEP: f64 = 1.0;
const DEMO_SEED: u64 = 2324;

const TEAM_PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::LightYellow,
    Color::White,
];

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.screen == Screen::Locked {
            self.on_locked_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.tab = Tab::SeasonScatter,
            KeyCode::Char('2') => self.state.tab = Tab::MatchScatter,
            KeyCode::Char('3') => self.state.tab = Tab::CorrelationBar,
            KeyCode::Char('4') => self.state.tab = Tab::RawData,
            KeyCode::Tab => self.state.next_tab(),
            KeyCode::BackTab => self.state.prev_tab(),
            KeyCode::Char('w') => self.state.cycle_weather(true),
            KeyCode::Char('W') => self.state.cycle_weather(false),
            KeyCode::Char('m') => self.state.cycle_performance(true),
            KeyCode::Char('M') => self.state.cycle_performance(false),
            KeyCode::Char('c') | KeyCode::Char('C') => self.state.toggle_upper_limit(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.adjust_upper_limit(LIMIT_STEP),
            KeyCode::Char('-') | KeyCode::Char('_') => self.state.adjust_upper_limit(-LIMIT_STEP),
            KeyCode::Char('t') | KeyCode::Char('T') => self.state.toggle_team_names(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.state.toggle_home_away(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.state.toggle_sort(),
            KeyCode::Char(']') | KeyCode::Right => self.state.cycle_team(true),
            KeyCode::Char('[') | KeyCode::Left => self.state.cycle_team(false),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_raw_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_raw_up(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.state.toggle_raw_view(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_locked_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.state.submit_password(),
            KeyCode::Backspace => {
                self.state.password_input.pop();
            }
            KeyCode::Char(ch) => self.state.password_input.push(ch),
            _ => {}
        }
    }

    fn export(&mut self) {
        let Some(analysis) = self.state.analysis.as_ref() else {
            self.state.push_log("[INFO] Nothing to export");
            return;
        };
        let name = format!(
            "wxfoot_export_{}.xlsx",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = Path::new(&name);
        match export::export_workbook(path, &self.state.clipped_rows, analysis) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} rows / {} teams to {}",
                report.match_rows,
                report.team_rows,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    AppConfig::load_dotenv();
    let config = AppConfig::from_env();
    let log_note = init_tracing(&config);

    let (dataset, source_label, load_note) = load_dataset(&config);
    let mut state = AppState::new(dataset, &config, source_label);
    for note in [log_note, load_note].into_iter().flatten() {
        state.push_log(note);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

// The alternate screen owns stdout, so tracing only goes to a file when one is configured.
// A log file that cannot be opened comes back as a console line.
fn init_tracing(config: &AppConfig) -> Option<String> {
    let path = config.log_path.as_ref()?;
    let file = match open_log_file(path) {
        Ok(file) => file,
        Err(err) => return Some(format!("[WARN] Logging disabled: {err:#}")),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    None
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("cannot open log file {}", path.display()))
}

fn load_dataset(config: &AppConfig) -> (Dataset, String, Option<String>) {
    if config.demo {
        return (
            demo_data::demo_dataset(DEMO_SEED),
            "demo feed".to_string(),
            None,
        );
    }
    match Dataset::load_csv(&config.data_path) {
        Ok(dataset) => (dataset, config.data_path.display().to_string(), None),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to demo data");
            (
                demo_data::demo_dataset(DEMO_SEED),
                "demo feed".to_string(),
                Some(format!("[WARN] {err}; showing demo data")),
            )
        }
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let area = frame.size();
    if state.screen == Screen::Locked {
        render_locked(frame, area, state);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let titles: Vec<String> = Tab::ALL.iter().map(|t| t.label().to_string()).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(30)])
        .split(chunks[2]);

    let sidebar = Paragraph::new(sidebar_text(state))
        .block(Block::default().title("Selection").borders(Borders::ALL));
    frame.render_widget(sidebar, body[0]);

    match state.tab {
        Tab::SeasonScatter => render_season(frame, body[1], state),
        Tab::MatchScatter => render_match(frame, body[1], state),
        Tab::CorrelationBar => render_correlation(frame, body[1], state),
        Tab::RawData => render_raw(frame, body[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(state));
    frame.render_widget(footer, chunks[4]);

    if state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let sel = &state.session.selection;
    let line1 = format!(
        "  ~~~  WEATHER vs FOOTBALL | {} | {} rows | {}",
        state.season_label,
        state.dataset.len(),
        state.source_label
    );
    let line2 = format!(
        " ~~~~~ {} vs {}",
        sel.performance.caption(),
        sel.weather.caption()
    );
    let line3 = "  | |".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.tab {
        Tab::SeasonScatter => {
            "1-4/Tab Views | w/m Metrics | c Limit | +/- Limit value | t Team colours | e Export | ? Help | q Quit".to_string()
        }
        Tab::MatchScatter => {
            "1-4/Tab Views | w/m Metrics | [/] Team | h Home/Away | c Limit | e Export | ? Help | q Quit".to_string()
        }
        Tab::CorrelationBar => {
            "1-4/Tab Views | w/m Metrics | s Sort | c Limit | e Export | ? Help | q Quit".to_string()
        }
        Tab::RawData => {
            "1-4/Tab Views | j/k Scroll | r Matches/Teams | s Sort teams | e Export | ? Help | q Quit".to_string()
        }
    }
}

fn sidebar_text(state: &AppState) -> String {
    let session = &state.session;
    let sel = &session.selection;
    let limit = if sel.upper_limit.enabled {
        format!("on ({})", sel.upper_limit.value)
    } else {
        format!("off ({})", sel.upper_limit.value)
    };
    let mut lines = vec![
        "Weather metric (w/W)".to_string(),
        format!("  {}", sel.weather.caption()),
        "Match metric (m/M)".to_string(),
        format!("  {}", sel.performance.caption()),
        String::new(),
        format!("Upper limit (c, +/-): {limit}"),
        format!(
            "Team colours (t): {}",
            if session.display_team_name { "on" } else { "off" }
        ),
        format!(
            "Team ([/]): {}",
            session.selected_team.as_deref().unwrap_or("-")
        ),
        format!(
            "Home/Away (h): {}",
            if session.split_home_away { "on" } else { "off" }
        ),
        format!(
            "Sort (s): {}",
            match session.bar_sort {
                BarSort::TeamName => "team name",
                BarSort::Correlation => "correlation",
            }
        ),
    ];
    if let Some(analysis) = state.analysis.as_ref() {
        lines.push(String::new());
        lines.push(format!("Season avg weather: {}", fmt_opt(analysis.average_weather_metric)));
        lines.push(format!("Season avg metric:  {}", fmt_opt(analysis.average_match_metric)));
        lines.push(format!(
            "Season Pearson:     {}",
            analysis
                .season_pearson
                .map(|r| format!("{}", projection_round(r)))
                .unwrap_or_else(|| "n/a".to_string())
        ));
    }
    lines.join("\n")
}

fn projection_round(r: f64) -> f64 {
    wxfoot_terminal::stats::round_to(r, 4)
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn chart_block(title: &ChartTitle) -> Block<'static> {
    Block::default()
        .title(format!("{} | {}", title.heading, title.subtitle))
        .borders(Borders::ALL)
}

fn render_season(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(chart) = state.season_chart() else {
        render_empty(frame, area, "No analysis available");
        return;
    };
    if chart.points.is_empty() {
        let empty = Paragraph::new("No team averages for this selection")
            .style(Style::default().fg(Color::DarkGray))
            .block(chart_block(&chart.title));
        frame.render_widget(empty, area);
        return;
    }

    let (x_bounds, y_bounds) = bounds(chart.points.iter().map(|p| (p.x, p.y)));
    let team_points: Vec<Vec<(f64, f64)>> =
        chart.points.iter().map(|p| vec![(p.x, p.y)]).collect();
    let all_points: Vec<(f64, f64)> = chart.points.iter().map(|p| (p.x, p.y)).collect();
    let trend = chart
        .trendline
        .map(|t| trend_segment(&t, x_bounds))
        .unwrap_or_default();

    let mut datasets = Vec::new();
    if chart.color_by_team {
        for (idx, (point, data)) in chart.points.iter().zip(team_points.iter()).enumerate() {
            datasets.push(
                ChartDataset::default()
                    .name(point.team_name.clone())
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(TEAM_PALETTE[idx % TEAM_PALETTE.len()]))
                    .data(data),
            );
        }
    } else {
        datasets.push(
            ChartDataset::default()
                .name("Teams")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Cyan))
                .data(&all_points),
        );
        if !trend.is_empty() {
            datasets.push(
                ChartDataset::default()
                    .name("OLS")
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::DarkGray))
                    .data(&trend),
            );
        }
    }

    let sel = &state.session.selection;
    let widget = Chart::new(datasets)
        .block(chart_block(&chart.title))
        .x_axis(axis(format!("Team Average {}", sel.weather.caption()), x_bounds))
        .y_axis(axis(format!("Team Average {}", sel.performance.caption()), y_bounds));
    frame.render_widget(widget, area);
}

fn render_match(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(chart) = state.match_chart() else {
        render_empty(frame, area, "No team selected");
        return;
    };
    if chart.point_count() == 0 {
        let empty = Paragraph::new("No matches with both values for this team")
            .style(Style::default().fg(Color::DarkGray))
            .block(chart_block(&chart.title));
        frame.render_widget(empty, area);
        return;
    }

    let (x_bounds, y_bounds) = bounds(
        chart
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| (p.x, p.y))),
    );
    let series_points: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.x, p.y)).collect())
        .collect();
    let series_trends: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| {
            s.trendline
                .map(|t| trend_segment(&t, x_bounds))
                .unwrap_or_default()
        })
        .collect();

    let mut datasets = Vec::new();
    for (idx, series) in chart.series.iter().enumerate() {
        let color = match series.label.as_str() {
            "Home" => Color::Green,
            "Away" => Color::Red,
            _ => Color::Cyan,
        };
        datasets.push(
            ChartDataset::default()
                .name(format!("{} ({})", series.label, series.points.len()))
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color))
                .data(&series_points[idx]),
        );
        if !series_trends[idx].is_empty() {
            datasets.push(
                ChartDataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color).add_modifier(Modifier::DIM))
                    .data(&series_trends[idx]),
            );
        }
    }

    let sel = &state.session.selection;
    let widget = Chart::new(datasets)
        .block(chart_block(&chart.title))
        .x_axis(axis(sel.weather.caption(), x_bounds))
        .y_axis(axis(sel.performance.caption(), y_bounds));
    frame.render_widget(widget, area);
}

fn render_correlation(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(chart) = state.correlation_chart() else {
        render_empty(frame, area, "No analysis available");
        return;
    };
    let block = chart_block(&chart.title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    const NAME_WIDTH: usize = 22;
    const VALUE_WIDTH: usize = 8;
    let bar_width = (inner.width as usize).saturating_sub(NAME_WIDTH + VALUE_WIDTH + 2);

    let mut lines = vec![Line::from(Span::styled(
        chart.reference_label(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for bar in &chart.bars {
        let name = truncate(&bar.team_name, NAME_WIDTH);
        let style = match bar.correlation {
            Some(r) if r >= 0.0 => Style::default().fg(Color::Green),
            Some(_) => Style::default().fg(Color::Red),
            None => Style::default().fg(Color::DarkGray),
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{name:<NAME_WIDTH$} ")),
            Span::styled(
                diverging_bar(bar.correlation, chart.season_pearson, bar_width),
                style,
            ),
            Span::raw(format!(" {:>7}", projection::format_correlation(bar.correlation))),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_raw(frame: &mut Frame, area: Rect, state: &AppState) {
    let table = state.raw_table();
    let title = match state.raw_view {
        RawView::Matches => "Full match metrics and weather observations",
        RawView::Teams => "Team metrics/correlations",
    };
    let block = Block::default()
        .title(format!("{title} ({} rows)", table.rows.len()))
        .borders(Borders::ALL);
    if table.rows.is_empty() {
        let empty = Paragraph::new("No rows")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible = area.height.saturating_sub(3) as usize;
    let start = state.raw_scroll.min(table.rows.len().saturating_sub(1));
    let end = (start + visible).min(table.rows.len());

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = table.rows[start..end]
        .iter()
        .map(|r| Row::new(r.iter().map(|c| Cell::from(c.clone())).collect::<Vec<_>>()))
        .collect();
    let widths: Vec<Constraint> = table
        .headers
        .iter()
        .map(|_| Constraint::Ratio(1, table.headers.len() as u32))
        .collect();

    let widget = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(widget, area);
}

fn render_locked(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup);
    let masked: String = state.password_input.chars().map(|_| '*').collect();
    let mut lines = vec![
        "Weather vs Football - Data Analysis".to_string(),
        String::new(),
        format!("Password: {masked}"),
        String::new(),
        "Enter submit | Esc quit".to_string(),
    ];
    if state.password_failed {
        lines.push(String::new());
        lines.push("Password incorrect".to_string());
    }
    let widget = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Locked").borders(Borders::ALL));
    frame.render_widget(widget, popup);
}

fn render_empty(frame: &mut Frame, area: Rect, msg: &str) {
    let empty = Paragraph::new(msg.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(empty, area);
}

fn axis(title: String, bounds: [f64; 2]) -> Axis<'static> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    Axis::default()
        .title(title)
        .style(Style::default().fg(Color::Gray))
        .bounds(bounds)
        .labels(vec![
            Span::raw(format!("{:.2}", bounds[0])),
            Span::raw(format!("{mid:.2}")),
            Span::raw(format!("{:.2}", bounds[1])),
        ])
}

/// Padded axis bounds; a degenerate range is widened so points stay visible.
fn bounds(points: impl Iterator<Item = (f64, f64)>) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = [f64::INFINITY, f64::NEG_INFINITY];
    for (px, py) in points {
        x = [x[0].min(px), x[1].max(px)];
        y = [y[0].min(py), y[1].max(py)];
    }
    (pad(x), pad(y))
}

fn pad(range: [f64; 2]) -> [f64; 2] {
    if !range[0].is_finite() || !range[1].is_finite() {
        return [0.0, 1.0];
    }
    let span = range[1] - range[0];
    let margin = if span > 0.0 { span * 0.05 } else { range[0].abs().max(1.0) * 0.1 };
    [range[0] - margin, range[1] + margin]
}

fn trend_segment(trend: &Trendline, x_bounds: [f64; 2]) -> Vec<(f64, f64)> {
    trend.segment(x_bounds[0], x_bounds[1]).to_vec()
}

/// Horizontal bar on a [-1, 1] axis centred in `width` cells. Undefined values leave the
/// slot empty apart from the axis; the season-wide reference is drawn as `┊`.
fn diverging_bar(value: Option<f64>, reference: Option<f64>, width: usize) -> String {
    if width < 3 {
        return String::new();
    }
    let half = (width - 1) / 2;
    let center = half;
    let mut cells: Vec<char> = vec![' '; half * 2 + 1];
    cells[center] = '│';

    if let Some(v) = value {
        let len = (v.abs().min(1.0) * half as f64).round() as usize;
        for step in 1..=len {
            let idx = if v >= 0.0 { center + step } else { center - step };
            cells[idx] = '█';
        }
    }
    if let Some(r) = reference {
        let offset = (r.abs().min(1.0) * half as f64).round() as usize;
        let idx = if r >= 0.0 { center + offset } else { center - offset };
        if idx != center && cells[idx] == ' ' {
            cells[idx] = '┊';
        }
    }
    cells.into_iter().collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Weather vs Football - Help",
        "",
        "Views:",
        "  1-4 / Tab    Season, Per-Match, Correlation, Raw Data",
        "",
        "Selection:",
        "  w / W        Next / previous weather metric",
        "  m / M        Next / previous match metric",
        "  c            Toggle weather upper limit",
        "  + / -        Raise / lower the upper limit",
        "  t            Colour season points by team",
        "  [ / ]        Previous / next team (per-match)",
        "  h            Split per-match points Home/Away",
        "  s            Sort by team name / correlation",
        "",
        "Raw data:",
        "  j/k or ↑/↓   Scroll",
        "  r            Match rows / team summaries",
        "",
        "  e            Export workbook (.xlsx)",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

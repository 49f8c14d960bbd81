use std::collections::VecDeque;

use crate::aggregate::{self, Analysis};
use crate::clip;
use crate::config::AppConfig;
use crate::dataset::{Dataset, MatchRow};
use crate::projection::{self, CorrelationChart, MatchChart, SeasonChart, TextTable};
use crate::session::{PasswordGate, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Locked,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    SeasonScatter,
    MatchScatter,
    CorrelationBar,
    RawData,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::SeasonScatter,
        Tab::MatchScatter,
        Tab::CorrelationBar,
        Tab::RawData,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::SeasonScatter => "Season Scatter Chart",
            Tab::MatchScatter => "Per-Match Scatter Chart",
            Tab::CorrelationBar => "Correlation Bar Chart",
            Tab::RawData => "Raw Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawView {
    Matches,
    Teams,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub tab: Tab,
    pub season_label: String,
    pub source_label: String,
    pub dataset: Dataset,
    pub teams: Vec<String>,
    pub session: Session,
    pub analysis: Option<Analysis>,
    pub clipped_rows: Vec<MatchRow>,
    pub raw_view: RawView,
    pub raw_scroll: usize,
    pub gate: Option<PasswordGate>,
    pub password_input: String,
    pub password_failed: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(dataset: Dataset, config: &AppConfig, source_label: impl Into<String>) -> Self {
        let teams = dataset.team_names();
        let mut session = Session::default();
        session.selection.upper_limit.value = config.default_upper_limit;
        session.ensure_team(&teams);

        let gate = config.password.as_deref().map(PasswordGate::new);
        let mut state = Self {
            screen: if gate.is_some() {
                Screen::Locked
            } else {
                Screen::Dashboard
            },
            tab: Tab::SeasonScatter,
            season_label: config.season_label.clone(),
            source_label: source_label.into(),
            dataset,
            teams,
            session,
            analysis: None,
            clipped_rows: Vec::new(),
            raw_view: RawView::Matches,
            raw_scroll: 0,
            gate,
            password_input: String::new(),
            password_failed: false,
            logs: VecDeque::new(),
            help_overlay: false,
        };
        state.push_log(format!(
            "[INFO] Loaded {} rows ({} teams) from {}",
            state.dataset.len(),
            state.teams.len(),
            state.source_label
        ));
        if state.dataset.skipped > 0 {
            state.push_log(format!("[WARN] Skipped {} malformed rows", state.dataset.skipped));
        }
        state.recompute();
        state
    }

    /// Full recomputation from the immutable table for the current selection.
    pub fn recompute(&mut self) {
        let selection = self.session.selection;
        match clip::clip_rows(&self.dataset.rows, selection.weather, selection.upper_limit) {
            Ok(clipped) => {
                self.analysis = Some(aggregate::analyze_clipped(&clipped, selection));
                self.clipped_rows = clipped;
            }
            Err(err) => {
                self.clipped_rows.clear();
                self.analysis = None;
                self.push_log(format!("[WARN] Analysis failed: {err}"));
            }
        }
        self.clamp_raw_scroll();
    }

    pub fn submit_password(&mut self) {
        let Some(gate) = &self.gate else {
            self.screen = Screen::Dashboard;
            return;
        };
        if gate.check(&self.password_input) {
            self.screen = Screen::Dashboard;
            self.password_failed = false;
            self.push_log("[INFO] Unlocked");
        } else {
            self.password_failed = true;
        }
        // The attempt is never kept around.
        self.password_input.clear();
    }

    pub fn next_tab(&mut self) {
        self.tab = Tab::ALL[(self.tab.index() + 1) % Tab::ALL.len()];
    }

    pub fn prev_tab(&mut self) {
        self.tab = Tab::ALL[(self.tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len()];
    }

    pub fn cycle_weather(&mut self, forward: bool) {
        let current = self.session.selection.weather;
        self.session.selection.weather = if forward { current.next() } else { current.prev() };
        self.push_log(format!(
            "[INFO] Weather metric: {}",
            self.session.selection.weather.column()
        ));
        self.recompute();
    }

    pub fn cycle_performance(&mut self, forward: bool) {
        let current = self.session.selection.performance;
        self.session.selection.performance = if forward { current.next() } else { current.prev() };
        self.push_log(format!(
            "[INFO] Match metric: {}",
            self.session.selection.performance.column()
        ));
        self.recompute();
    }

    pub fn toggle_upper_limit(&mut self) {
        let limit = &mut self.session.selection.upper_limit;
        limit.enabled = !limit.enabled;
        let msg = if limit.enabled {
            format!("[INFO] Upper limit on ({})", limit.value)
        } else {
            "[INFO] Upper limit off".to_string()
        };
        self.push_log(msg);
        self.recompute();
    }

    /// Nudges the limit value; it never drops below zero. Only recomputes when the limit is
    /// actually in effect.
    pub fn adjust_upper_limit(&mut self, delta: f64) {
        let limit = &mut self.session.selection.upper_limit;
        limit.value = (limit.value + delta).max(0.0);
        if limit.enabled {
            self.recompute();
        }
    }

    pub fn toggle_team_names(&mut self) {
        self.session.display_team_name = !self.session.display_team_name;
    }

    pub fn toggle_home_away(&mut self) {
        self.session.split_home_away = !self.session.split_home_away;
    }

    pub fn toggle_sort(&mut self) {
        self.session.bar_sort = self.session.bar_sort.toggle();
    }

    pub fn cycle_team(&mut self, forward: bool) {
        self.session.cycle_team(&self.teams, forward);
    }

    pub fn toggle_raw_view(&mut self) {
        self.raw_view = match self.raw_view {
            RawView::Matches => RawView::Teams,
            RawView::Teams => RawView::Matches,
        };
        self.raw_scroll = 0;
    }

    pub fn scroll_raw_down(&mut self) {
        self.raw_scroll = self.raw_scroll.saturating_add(1);
        self.clamp_raw_scroll();
    }

    pub fn scroll_raw_up(&mut self) {
        self.raw_scroll = self.raw_scroll.saturating_sub(1);
    }

    fn clamp_raw_scroll(&mut self) {
        let total = self.raw_table().rows.len();
        if total == 0 {
            self.raw_scroll = 0;
        } else if self.raw_scroll >= total {
            self.raw_scroll = total - 1;
        }
    }

    pub fn season_chart(&self) -> Option<SeasonChart> {
        let analysis = self.analysis.as_ref()?;
        Some(projection::season_chart(
            analysis,
            &self.season_label,
            self.session.display_team_name,
        ))
    }

    pub fn match_chart(&self) -> Option<MatchChart> {
        let team = self.session.selected_team.as_deref()?;
        Some(projection::match_chart(
            &self.clipped_rows,
            team,
            &self.session.selection,
            &self.season_label,
            self.session.split_home_away,
        ))
    }

    pub fn correlation_chart(&self) -> Option<CorrelationChart> {
        let analysis = self.analysis.as_ref()?;
        Some(projection::correlation_chart(
            analysis,
            &self.season_label,
            self.session.bar_sort,
        ))
    }

    /// Raw tab: the clipped match rows narrowed to the selected columns, or the team table.
    pub fn raw_table(&self) -> TextTable {
        match self.raw_view {
            RawView::Teams => {
                let mut summaries = self
                    .analysis
                    .as_ref()
                    .map(|a| a.summaries.clone())
                    .unwrap_or_default();
                projection::sort_summaries(&mut summaries, self.session.bar_sort);
                projection::summary_table(&summaries)
            }
            RawView::Matches => {
                let sel = &self.session.selection;
                let full = projection::raw_match_table(&self.clipped_rows);
                let keep = [
                    "match_date",
                    "team_name",
                    "opposition_name",
                    "competition_name",
                    "home_away",
                    sel.weather.column(),
                    sel.performance.column(),
                ];
                let idx: Vec<usize> = keep
                    .iter()
                    .filter_map(|name| full.headers.iter().position(|h| h == name))
                    .collect();
                TextTable {
                    headers: idx.iter().map(|i| full.headers[*i].clone()).collect(),
                    rows: full
                        .rows
                        .iter()
                        .map(|row| idx.iter().map(|i| row[*i].clone()).collect())
                        .collect(),
                }
            }
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

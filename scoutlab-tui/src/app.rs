//! Application state: single-owner, main-thread only.
//!
//! All dashboard state lives here. The pipeline worker communicates via
//! channels; its results replace the gold table snapshot wholesale.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use scoutlab_core::domain::{ContractStatus, GLeagueCategory, PlayerStatsRow, RankedPlayer, TeamSeasonStat};
use scoutlab_core::profile::{self, PlayerProfile};
use scoutlab_core::targets::{self, TargetFilter, TargetSummary};
use scoutlab_runner::export::{comparison_report, export_targets_csv, profile_report, write_report};
use scoutlab_runner::{ModelStatus, RunSummary};

use crate::config::DashboardConfig;
use crate::data_loader::GoldTables;
use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Teams,
    Players,
    Profile,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Teams, Panel::Players, Panel::Profile, Panel::Help];

    pub fn index(self) -> usize {
        match self {
            Panel::Teams => 0,
            Panel::Players => 1,
            Panel::Profile => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Teams => "Teams",
            Panel::Players => "Players",
            Panel::Profile => "Profile",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Panel {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Pipeline,
    Export,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Pipeline => "PIPE",
            ErrorCategory::Export => "EXP",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    ErrorHistory,
}

/// Teams panel state.
#[derive(Debug, Clone, Default)]
pub struct TeamsState {
    pub season_idx: usize,
    pub competition_idx: usize,
    pub cursor: usize,
}

/// Players panel state.
#[derive(Debug, Clone, Default)]
pub struct PlayersState {
    pub filter: TargetFilter,
    pub cursor: usize,
}

/// Profile panel state.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub season_idx: usize,
    pub cursor: usize,
    /// Player pinned for side-by-side comparison.
    pub compare: Option<String>,
}

/// Step an optional selection through `options`, wrapping back to `None`.
pub fn cycle_option<T: Clone + PartialEq>(current: &Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(value) => options
            .iter()
            .position(|o| o == value)
            .and_then(|i| options.get(i + 1))
            .cloned(),
    }
}

fn step(idx: usize, len: usize, direction: i32) -> usize {
    if len == 0 {
        return 0;
    }
    if direction >= 0 {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Data
    pub config: DashboardConfig,
    pub tables: GoldTables,

    // Panel states
    pub teams: TeamsState,
    pub players: PlayersState,
    pub profile: ProfileState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub pipeline_running: bool,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        tables: GoldTables,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let mut app = Self {
            active_panel: Panel::Teams,
            running: true,
            config,
            tables: GoldTables::default(),
            teams: TeamsState::default(),
            players: PlayersState::default(),
            profile: ProfileState::default(),
            worker_tx,
            worker_rx,
            pipeline_running: false,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        };
        app.replace_tables(tables);
        app
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Swap in a fresh snapshot and pull every cursor back into range.
    pub fn replace_tables(&mut self, tables: GoldTables) {
        let current_player = self.current_player().map(str::to_string);
        let current_season = self.profile_season();
        self.tables = tables;

        let seasons = self.tables.team_seasons();
        self.teams.season_idx = self.teams.season_idx.min(seasons.len().saturating_sub(1));
        let competitions = self.tables.competitions().len();
        self.teams.competition_idx = self.teams.competition_idx.min(competitions.saturating_sub(1));
        self.clamp_team_cursor();
        self.clamp_player_cursor();

        self.profile.season_idx = 0;
        self.profile.cursor = 0;
        if let (Some(player), Some(season)) = (current_player, current_season) {
            self.open_profile(&player, season);
        }
        if !self.tables.missing.is_empty() {
            self.set_warning(format!(
                "Missing tables: {} (press r to run the pipeline)",
                self.tables.missing.join(", ")
            ));
        }
    }

    // ─── Teams ───

    pub fn team_season(&self) -> Option<i32> {
        self.tables.team_seasons().get(self.teams.season_idx).copied()
    }

    pub fn competition(&self) -> Option<&str> {
        self.tables.competitions().get(self.teams.competition_idx).copied()
    }

    pub fn visible_teams(&self) -> Vec<&TeamSeasonStat> {
        match (self.team_season(), self.competition()) {
            (Some(season), Some(competition)) => self.tables.teams_for(season, competition),
            _ => Vec::new(),
        }
    }

    pub fn cycle_team_season(&mut self, direction: i32) {
        let len = self.tables.team_seasons().len();
        self.teams.season_idx = step(self.teams.season_idx, len, direction);
        self.clamp_team_cursor();
    }

    pub fn cycle_competition(&mut self) {
        let len = self.tables.competitions().len();
        self.teams.competition_idx = step(self.teams.competition_idx, len, 1);
        self.clamp_team_cursor();
    }

    /// Select a competition by name, if present.
    pub fn select_competition(&mut self, name: &str) {
        if let Some(i) = self.tables.competitions().iter().position(|c| *c == name) {
            self.teams.competition_idx = i;
        }
    }

    pub fn move_team_cursor(&mut self, delta: i32) {
        let len = self.visible_teams().len();
        self.teams.cursor = move_cursor(self.teams.cursor, len, delta);
    }

    fn clamp_team_cursor(&mut self) {
        let len = self.visible_teams().len();
        self.teams.cursor = self.teams.cursor.min(len.saturating_sub(1));
    }

    // ─── Players ───

    pub fn visible_targets(&self) -> Vec<&RankedPlayer> {
        self.players.filter.apply(&self.tables.targets)
    }

    pub fn target_summary(&self) -> TargetSummary {
        targets::summarize(&self.visible_targets())
    }

    pub fn cycle_category(&mut self) {
        let options: Vec<GLeagueCategory> = GLeagueCategory::ALL
            .into_iter()
            .filter(|c| c.is_target())
            .collect();
        self.players.filter.category = cycle_option(&self.players.filter.category, &options);
        self.clamp_player_cursor();
    }

    pub fn cycle_position(&mut self) {
        let options = targets::positions(&self.tables.targets);
        self.players.filter.position = cycle_option(&self.players.filter.position, &options);
        self.clamp_player_cursor();
    }

    pub fn cycle_contract(&mut self) {
        self.players.filter.contract =
            cycle_option(&self.players.filter.contract, &ContractStatus::ALL);
        self.clamp_player_cursor();
    }

    pub fn cycle_sort(&mut self) {
        self.players.filter.sort = self.players.filter.sort.next();
    }

    pub fn toggle_order(&mut self) {
        self.players.filter.descending = !self.players.filter.descending;
    }

    pub fn reset_filters(&mut self) {
        self.players.filter = TargetFilter::default();
        self.players.cursor = 0;
    }

    pub fn move_player_cursor(&mut self, delta: i32) {
        let len = self.visible_targets().len();
        self.players.cursor = move_cursor(self.players.cursor, len, delta);
    }

    fn clamp_player_cursor(&mut self) {
        let len = self.visible_targets().len();
        self.players.cursor = self.players.cursor.min(len.saturating_sub(1));
    }

    pub fn selected_target(&self) -> Option<&RankedPlayer> {
        self.visible_targets().get(self.players.cursor).copied()
    }

    /// Write the filtered targets as CSV. Returns the file written.
    pub fn export_targets(&self) -> Result<PathBuf> {
        let rows = self.visible_targets();
        let csv = export_targets_csv(&rows)?;
        let path = self
            .config
            .export_dir
            .join(format!("g_league_targets_{}.csv", self.config.pipeline.pipeline.season));
        write_report(&path, &csv)?;
        Ok(path)
    }

    // ─── Profile ───

    pub fn profile_seasons(&self) -> Vec<i32> {
        profile::seasons(&self.tables.stats)
    }

    pub fn profile_season(&self) -> Option<i32> {
        self.profile_seasons().get(self.profile.season_idx).copied()
    }

    pub fn profile_players(&self) -> Vec<&PlayerStatsRow> {
        match self.profile_season() {
            Some(season) => profile::players_in_season(&self.tables.stats, season),
            None => Vec::new(),
        }
    }

    pub fn current_player(&self) -> Option<&str> {
        self.profile_players()
            .get(self.profile.cursor)
            .map(|r| r.player.as_str())
    }

    pub fn current_profile(&self) -> Option<PlayerProfile> {
        let season = self.profile_season()?;
        let player = self.current_player()?;
        profile::build_profile(&self.tables.stats, player, season)
    }

    /// Profile of the pinned comparison player, in the current season.
    pub fn compare_profile(&self) -> Option<PlayerProfile> {
        let season = self.profile_season()?;
        let other = self.profile.compare.as_deref()?;
        if Some(other) == self.current_player() {
            return None;
        }
        profile::build_profile(&self.tables.stats, other, season)
    }

    pub fn cycle_profile_season(&mut self, direction: i32) {
        let player = self.current_player().map(str::to_string);
        let len = self.profile_seasons().len();
        self.profile.season_idx = step(self.profile.season_idx, len, direction);
        self.profile.cursor = player
            .and_then(|p| self.profile_players().iter().position(|r| r.player == p))
            .unwrap_or(0);
    }

    pub fn move_profile_cursor(&mut self, delta: i32) {
        let len = self.profile_players().len();
        self.profile.cursor = move_cursor(self.profile.cursor, len, delta);
    }

    /// Pin the current player for comparison, or unpin if already pinned.
    pub fn toggle_compare(&mut self) {
        let Some(player) = self.current_player().map(str::to_string) else {
            return;
        };
        if self.profile.compare.as_deref() == Some(player.as_str()) {
            self.profile.compare = None;
        } else {
            self.profile.compare = Some(player);
        }
    }

    /// Point the profile panel at `player` in `season`. Returns false if
    /// the player has no line that season.
    pub fn open_profile(&mut self, player: &str, season: i32) -> bool {
        let Some(season_idx) = self.profile_seasons().iter().position(|s| *s == season) else {
            return false;
        };
        self.profile.season_idx = season_idx;
        match self.profile_players().iter().position(|r| r.player == player) {
            Some(cursor) => {
                self.profile.cursor = cursor;
                true
            }
            None => false,
        }
    }

    /// Write the current profile (or comparison) as Markdown.
    pub fn export_profile(&self) -> Result<PathBuf> {
        let profile = self.current_profile().context("no player selected")?;
        let (content, stem) = match self.compare_profile() {
            Some(other) => (
                comparison_report(&profile, &other),
                format!("{}_vs_{}", file_stem(&profile.line.player), file_stem(&other.line.player)),
            ),
            None => (profile_report(&profile), file_stem(&profile.line.player)),
        };
        let path = self
            .config
            .export_dir
            .join(format!("profile_{stem}_{}.md", profile.line.season));
        write_report(&path, &content)?;
        Ok(path)
    }

    // ─── Pipeline worker ───

    pub fn request_rerun(&mut self) {
        if self.pipeline_running {
            self.set_warning("Pipeline already running");
            return;
        }
        let cmd = WorkerCommand::RunPipeline {
            config: Box::new(self.config.pipeline.clone()),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Pipeline,
                "Pipeline worker is not running".into(),
                "rerun".into(),
            );
            return;
        }
        self.pipeline_running = true;
        self.set_status("Running pipeline...");
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::PipelineDone { summary } => {
                self.pipeline_running = false;
                self.replace_tables(GoldTables::load(self.config.warehouse_dir()));
                self.report_run(&summary);
            }
            WorkerResponse::PipelineError { error } => {
                self.pipeline_running = false;
                self.push_error(ErrorCategory::Pipeline, error, "pipeline run".into());
            }
        }
    }

    fn report_run(&mut self, summary: &RunSummary) {
        let ok = summary.count(ModelStatus::Success);
        let failed = summary.count(ModelStatus::Failed);
        let skipped = summary.count(ModelStatus::Skipped);
        for m in summary.models.iter().filter(|m| m.status == ModelStatus::Failed) {
            self.push_error(
                ErrorCategory::Data,
                m.error.clone().unwrap_or_else(|| "failed".into()),
                m.model.clone(),
            );
        }
        let msg = format!(
            "Run {}: {ok} ok, {failed} failed, {skipped} skipped in {} ms",
            summary.run_id.short(),
            summary.elapsed_ms
        );
        if failed == 0 {
            self.set_status(msg);
        } else {
            self.set_warning(msg);
        }
    }
}

fn move_cursor(cursor: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    if delta >= 0 {
        cursor.saturating_add(delta as usize).min(max)
    } else {
        cursor.saturating_sub(delta.unsigned_abs() as usize).min(max)
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::mpsc;

    pub fn stat(season: i32, player: &str, pts: f64, g: i64) -> PlayerStatsRow {
        PlayerStatsRow {
            season,
            player: player.into(),
            team: Some("BOS".into()),
            pos: Some("PG".into()),
            games_played: g,
            total_points: Some(pts * g as f64),
            total_rebounds: Some(4.0 * g as f64),
            total_assists: Some(3.0 * g as f64),
            points_per_game: Some(pts),
            rebounds_per_game: Some(4.0),
            assists_per_game: Some(3.0),
        }
    }

    pub fn target(player: &str, pos: &str, pts: f64, category: GLeagueCategory, status: ContractStatus) -> RankedPlayer {
        RankedPlayer {
            player: player.into(),
            season: 2024,
            age: Some(25),
            pos: Some(pos.into()),
            team: Some("BOS".into()),
            g: Some(50),
            pts: Some(pts),
            trb: Some(4.0),
            ast: Some(3.0),
            stl: Some(1.0),
            blk: Some(0.5),
            ts_pct: Some(0.55),
            contract_team: None,
            salary_y1: None,
            salary_y2: None,
            salary_y3: None,
            guaranteed: None,
            contract_status: status,
            pts_percentile: 20,
            trb_percentile: 50,
            ast_percentile: 50,
            stl_percentile: 50,
            blk_percentile: 50,
            ts_percentile: 50,
            g_league_category: category,
        }
    }

    pub fn sample_tables() -> GoldTables {
        GoldTables {
            targets: vec![
                target("Ann", "PG", 8.0, GLeagueCategory::Struggling, ContractStatus::FreeAgent),
                target("Bea", "C", 12.0, GLeagueCategory::WellRounded, ContractStatus::Expiring),
                target("Cal", "PG", 10.0, GLeagueCategory::WellRounded, ContractStatus::Uncontracted),
            ],
            stats: vec![
                stat(2024, "Ann", 8.0, 50),
                stat(2024, "Bea", 12.0, 60),
                stat(2024, "Cal", 10.0, 40),
                stat(2023, "Bea", 11.0, 70),
            ],
            ..Default::default()
        }
    }

    pub fn app_with(dir: &std::path::Path, tables: GoldTables) -> AppState {
        let (tx, _rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        let mut pipeline = scoutlab_runner::PipelineConfig::default();
        pipeline.pipeline.warehouse_dir = dir.join("warehouse");
        let config = DashboardConfig::in_dir(dir, pipeline);
        AppState::new(config, tables, tx, rx2)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Teams.next(), Panel::Players);
        assert_eq!(Panel::Help.next(), Panel::Teams);
        assert_eq!(Panel::Teams.prev(), Panel::Help);
        for (i, p) in Panel::ALL.iter().enumerate() {
            assert_eq!(Panel::from_index(i), Some(*p));
        }
        assert!(Panel::from_index(4).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), GoldTables::default());
        for i in 0..60 {
            app.push_error(ErrorCategory::Data, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn filters_narrow_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        let names = |app: &AppState| -> Vec<String> {
            app.visible_targets().iter().map(|r| r.player.clone()).collect()
        };
        assert_eq!(names(&app), vec!["Bea", "Cal", "Ann"]);

        app.cycle_category();
        assert_eq!(app.players.filter.category, Some(GLeagueCategory::Struggling));
        assert_eq!(names(&app), vec!["Ann"]);

        app.cycle_category();
        app.cycle_position();
        assert_eq!(app.players.filter.position.as_deref(), Some("C"));
        assert_eq!(names(&app), vec!["Bea"]);

        app.reset_filters();
        app.toggle_order();
        assert_eq!(names(&app), vec!["Ann", "Cal", "Bea"]);

        let summary = app.target_summary();
        assert_eq!(summary.found, 3);
        assert_eq!(summary.available, 2);
        assert_eq!(summary.development, 1);
    }

    #[test]
    fn cursor_is_clamped_when_filter_shrinks() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        app.move_player_cursor(10);
        assert_eq!(app.players.cursor, 2);
        app.cycle_category();
        assert_eq!(app.players.cursor, 0);
        assert_eq!(app.selected_target().map(|r| r.player.as_str()), Some("Ann"));
    }

    #[test]
    fn profile_navigation_and_compare() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());
        assert_eq!(app.profile_season(), Some(2024));
        assert_eq!(app.current_player(), Some("Ann"));

        app.toggle_compare();
        app.move_profile_cursor(1);
        assert_eq!(app.current_player(), Some("Bea"));
        let other = app.compare_profile().expect("Ann pinned");
        assert_eq!(other.line.player, "Ann");

        // Bea also played 2023, so the cursor follows her across seasons.
        app.cycle_profile_season(1);
        assert_eq!(app.profile_season(), Some(2023));
        assert_eq!(app.current_player(), Some("Bea"));

        assert!(app.open_profile("Cal", 2024));
        assert_eq!(app.current_player(), Some("Cal"));
        assert!(!app.open_profile("Cal", 2023));
    }

    #[test]
    fn exports_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(dir.path(), sample_tables());

        let csv = app.export_targets().unwrap();
        let content = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(content.lines().count(), 4);

        app.toggle_compare();
        app.move_profile_cursor(1);
        let md = app.export_profile().unwrap();
        assert!(md.to_string_lossy().contains("bea_vs_ann"));
        assert!(std::fs::read_to_string(md).unwrap().contains("Bea"));
    }

    #[test]
    fn rerun_without_worker_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        let (_tx2, rx2) = std::sync::mpsc::channel();
        let config = DashboardConfig::in_dir(dir.path(), scoutlab_runner::PipelineConfig::default());
        let mut app = AppState::new(config, GoldTables::default(), tx, rx2);
        app.request_rerun();
        assert!(!app.pipeline_running);
        assert_eq!(app.error_history.len(), 1);
    }

    #[test]
    fn missing_tables_raise_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let tables = GoldTables {
            missing: vec!["gold_player_stats".into()],
            ..Default::default()
        };
        let app = app_with(dir.path(), tables);
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
        assert!(msg.contains("gold_player_stats"));
    }

    proptest! {
        #[test]
        fn cycle_option_returns_to_none(len in 0usize..8) {
            let options: Vec<usize> = (0..len).collect();
            let mut current = None;
            for i in 0..len {
                current = cycle_option(&current, &options);
                prop_assert_eq!(current, Some(i));
            }
            prop_assert_eq!(cycle_option(&current, &options), None);
        }

        #[test]
        fn cursor_stays_in_range(len in 0usize..50, moves in prop::collection::vec(-20i32..20, 0..20)) {
            let mut cursor = 0;
            for m in moves {
                cursor = move_cursor(cursor, len, m);
                prop_assert!(cursor < len.max(1));
            }
        }
    }
}

//! Read the gold tables the dashboard shows.
//!
//! The dashboard never touches bronze or silver. A missing table is not an
//! error: the panel shows an empty state and the name is listed so the user
//! knows to run the pipeline.

use std::cmp::Ordering;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use scoutlab_core::data::{Layer, Warehouse};
use scoutlab_core::domain::{PlayerStatsRow, RankedPlayer, TeamSeasonStat};
use scoutlab_runner::{ModelId, RunSummary};

/// Snapshot of the warehouse as the dashboard sees it.
#[derive(Debug, Clone, Default)]
pub struct GoldTables {
    pub teams: Vec<TeamSeasonStat>,
    pub targets: Vec<RankedPlayer>,
    pub stats: Vec<PlayerStatsRow>,
    pub last_run: Option<RunSummary>,
    /// Gold tables that could not be read.
    pub missing: Vec<String>,
}

impl GoldTables {
    pub fn load(warehouse_dir: &Path) -> Self {
        let warehouse = Warehouse::new(warehouse_dir);
        let mut missing = Vec::new();
        let teams = read_or_empty(&warehouse, ModelId::GoldTeamStatsAll, &mut missing);
        let targets = read_or_empty(&warehouse, ModelId::GoldGLeagueTargets, &mut missing);
        let stats = read_or_empty(&warehouse, ModelId::GoldPlayerStats, &mut missing);

        let last_run = RunSummary::load(warehouse_dir).unwrap_or_else(|e| {
            warn!(error = %e, "run manifest unreadable");
            None
        });

        info!(
            teams = teams.len(),
            targets = targets.len(),
            stats = stats.len(),
            missing = missing.len(),
            "gold tables loaded"
        );
        Self {
            teams,
            targets,
            stats,
            last_run,
            missing,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.targets.is_empty() && self.stats.is_empty()
    }

    /// Seasons with team data, newest first.
    pub fn team_seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = self.teams.iter().map(|t| t.season).collect();
        seasons.sort_unstable_by(|a, b| b.cmp(a));
        seasons.dedup();
        seasons
    }

    /// Competition types present, in first-seen order.
    pub fn competitions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in &self.teams {
            if !out.contains(&t.competition_type.as_str()) {
                out.push(&t.competition_type);
            }
        }
        out
    }

    /// Teams of one season and competition, best win% first. Teams without
    /// a win% go last, then by name.
    pub fn teams_for(&self, season: i32, competition: &str) -> Vec<&TeamSeasonStat> {
        let mut out: Vec<&TeamSeasonStat> = self
            .teams
            .iter()
            .filter(|t| t.season == season && t.competition_type == competition)
            .collect();
        out.sort_by(|a, b| {
            let by_pct = match (a.win_pct, b.win_pct) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_pct.then_with(|| a.team.cmp(&b.team))
        });
        out
    }
}

fn read_or_empty<T: DeserializeOwned>(
    warehouse: &Warehouse,
    model: ModelId,
    missing: &mut Vec<String>,
) -> Vec<T> {
    match warehouse.read_table(Layer::Gold, model.name()) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(model = model.name(), error = %e, "gold table unavailable");
            missing.push(model.name().to_string());
            Vec::new()
        }
    }
}

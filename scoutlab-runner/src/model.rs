//! Model registry: the fourteen pipeline models and how each is computed.
//!
//! A model is a pure function of its declared inputs. Bronze models read one
//! raw source; every other model reads the in-memory outputs of its upstream
//! models. The registry order is the declaration order the executor uses
//! for tie-breaking and materialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use scoutlab_core::classify::{canonical_season_rows, g_league_targets, join_contracts, rank_players};
use scoutlab_core::data::{DataError, Layer, TableMeta, Warehouse};
use scoutlab_core::domain::{
    BoxScore, CareerStats, ContractRecord, JoinedPlayer, PlayerSeasonStat, PlayerSeasonTotals,
    PlayerStatsRow, RankedPlayer, TeamSeasonStat, TeamStatLine, TopScorer,
};
use scoutlab_core::{bronze, gold, silver};

use crate::config::PipelineConfig;
use crate::data_loader::RawSources;

/// How a model's output is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    /// Written to the warehouse.
    Table,
    /// Computed for downstream models only.
    View,
}

impl fmt::Display for Materialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Materialization::Table => "table",
            Materialization::View => "view",
        })
    }
}

/// External raw inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    BoxScores,
    PlayerSeason,
    Contracts,
    TeamStats,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::BoxScores,
        SourceKind::PlayerSeason,
        SourceKind::Contracts,
        SourceKind::TeamStats,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::BoxScores => "box_scores",
            SourceKind::PlayerSeason => "player_season",
            SourceKind::Contracts => "contracts",
            SourceKind::TeamStats => "team_stats",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Every registered model, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelId {
    BronzeBoxScores,
    BronzePlayerSeason,
    BronzeContracts,
    BronzeTeamStats,
    SilverPlayerSeasonTotals,
    SilverPlayerSeason,
    SilverPlayerContracts,
    SilverTeamSeason,
    GoldPlayerStats,
    GoldCareerStats,
    GoldTopScorers,
    GoldTeamStatsAll,
    GoldPlayerPercentiles,
    GoldGLeagueTargets,
}

impl ModelId {
    pub const ALL: [ModelId; 14] = [
        ModelId::BronzeBoxScores,
        ModelId::BronzePlayerSeason,
        ModelId::BronzeContracts,
        ModelId::BronzeTeamStats,
        ModelId::SilverPlayerSeasonTotals,
        ModelId::SilverPlayerSeason,
        ModelId::SilverPlayerContracts,
        ModelId::SilverTeamSeason,
        ModelId::GoldPlayerStats,
        ModelId::GoldCareerStats,
        ModelId::GoldTopScorers,
        ModelId::GoldTeamStatsAll,
        ModelId::GoldPlayerPercentiles,
        ModelId::GoldGLeagueTargets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelId::BronzeBoxScores => "bronze_box_scores",
            ModelId::BronzePlayerSeason => "bronze_player_season",
            ModelId::BronzeContracts => "bronze_contracts",
            ModelId::BronzeTeamStats => "bronze_team_stats",
            ModelId::SilverPlayerSeasonTotals => "silver_player_season_totals",
            ModelId::SilverPlayerSeason => "silver_player_season",
            ModelId::SilverPlayerContracts => "silver_player_contracts",
            ModelId::SilverTeamSeason => "silver_team_season",
            ModelId::GoldPlayerStats => "gold_player_stats",
            ModelId::GoldCareerStats => "gold_career_stats",
            ModelId::GoldTopScorers => "gold_top_scorers",
            ModelId::GoldTeamStatsAll => "gold_team_stats_all",
            ModelId::GoldPlayerPercentiles => "gold_player_percentiles",
            ModelId::GoldGLeagueTargets => "gold_g_league_targets",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    pub fn layer(self) -> Layer {
        match self {
            ModelId::BronzeBoxScores
            | ModelId::BronzePlayerSeason
            | ModelId::BronzeContracts
            | ModelId::BronzeTeamStats => Layer::Bronze,
            ModelId::SilverPlayerSeasonTotals
            | ModelId::SilverPlayerSeason
            | ModelId::SilverPlayerContracts
            | ModelId::SilverTeamSeason => Layer::Silver,
            _ => Layer::Gold,
        }
    }

    /// Upstream models this model reads.
    pub fn deps(self) -> &'static [ModelId] {
        use ModelId::*;
        match self {
            BronzeBoxScores | BronzePlayerSeason | BronzeContracts | BronzeTeamStats => &[],
            SilverPlayerSeasonTotals => &[BronzeBoxScores],
            SilverPlayerSeason => &[BronzePlayerSeason],
            SilverPlayerContracts => &[SilverPlayerSeason, BronzeContracts],
            SilverTeamSeason => &[BronzeTeamStats],
            GoldPlayerStats => &[SilverPlayerSeasonTotals, BronzePlayerSeason],
            GoldCareerStats | GoldTopScorers => &[GoldPlayerStats],
            GoldTeamStatsAll => &[SilverTeamSeason],
            GoldPlayerPercentiles => &[SilverPlayerContracts],
            GoldGLeagueTargets => &[GoldPlayerPercentiles],
        }
    }

    /// The raw source a bronze model reads.
    pub fn source(self) -> Option<SourceKind> {
        match self {
            ModelId::BronzeBoxScores => Some(SourceKind::BoxScores),
            ModelId::BronzePlayerSeason => Some(SourceKind::PlayerSeason),
            ModelId::BronzeContracts => Some(SourceKind::Contracts),
            ModelId::BronzeTeamStats => Some(SourceKind::TeamStats),
            _ => None,
        }
    }

    pub fn default_materialization(self) -> Materialization {
        match self {
            ModelId::GoldPlayerPercentiles => Materialization::View,
            _ => Materialization::Table,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelId::BronzeBoxScores => "Per-game box scores, cast and null-filtered",
            ModelId::BronzePlayerSeason => "Season lines per team with true-shooting%",
            ModelId::BronzeContracts => "Contracts with six salary years and flags",
            ModelId::BronzeTeamStats => "Team lines tagged with competition type",
            ModelId::SilverPlayerSeasonTotals => "Box scores rolled up per player, season, team",
            ModelId::SilverPlayerSeason => "One canonical line per player for the target season",
            ModelId::SilverPlayerContracts => "Canonical lines fuzzy-joined to contracts",
            ModelId::SilverTeamSeason => "Team lines with efficiency ratios",
            ModelId::GoldPlayerStats => "Per-season player stats across teams",
            ModelId::GoldCareerStats => "Career totals and averages",
            ModelId::GoldTopScorers => "Scoring leaders by points per game",
            ModelId::GoldTeamStatsAll => "Team stats across every competition",
            ModelId::GoldPlayerPercentiles => "Position-partitioned percentiles and categories",
            ModelId::GoldGLeagueTargets => "Players classified as G-League targets",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Errors from computing or persisting one model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing upstream output: {0}")]
    MissingInput(ModelId),
    #[error("upstream {0} produced an unexpected row type")]
    WrongShape(ModelId),
    #[error("source {kind} unavailable: {reason}")]
    Source { kind: SourceKind, reason: String },
    #[error("materialization failed: {0}")]
    Materialize(#[from] DataError),
}

/// The in-memory output of a model.
#[derive(Debug, Clone)]
pub enum Dataset {
    BoxScores(Vec<BoxScore>),
    PlayerSeasons(Vec<PlayerSeasonStat>),
    Contracts(Vec<ContractRecord>),
    TeamLines(Vec<TeamStatLine>),
    SeasonTotals(Vec<PlayerSeasonTotals>),
    Joined(Vec<JoinedPlayer>),
    TeamSeasons(Vec<TeamSeasonStat>),
    PlayerStats(Vec<PlayerStatsRow>),
    Careers(Vec<CareerStats>),
    TopScorers(Vec<TopScorer>),
    Ranked(Vec<RankedPlayer>),
}

macro_rules! dataset_accessor {
    ($fn_name:ident, $variant:ident, $row:ty) => {
        pub fn $fn_name(&self) -> Option<&[$row]> {
            match self {
                Dataset::$variant(rows) => Some(rows),
                _ => None,
            }
        }
    };
}

impl Dataset {
    pub fn len(&self) -> usize {
        match self {
            Dataset::BoxScores(r) => r.len(),
            Dataset::PlayerSeasons(r) => r.len(),
            Dataset::Contracts(r) => r.len(),
            Dataset::TeamLines(r) => r.len(),
            Dataset::SeasonTotals(r) => r.len(),
            Dataset::Joined(r) => r.len(),
            Dataset::TeamSeasons(r) => r.len(),
            Dataset::PlayerStats(r) => r.len(),
            Dataset::Careers(r) => r.len(),
            Dataset::TopScorers(r) => r.len(),
            Dataset::Ranked(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    dataset_accessor!(box_scores, BoxScores, BoxScore);
    dataset_accessor!(player_seasons, PlayerSeasons, PlayerSeasonStat);
    dataset_accessor!(contracts, Contracts, ContractRecord);
    dataset_accessor!(team_lines, TeamLines, TeamStatLine);
    dataset_accessor!(season_totals, SeasonTotals, PlayerSeasonTotals);
    dataset_accessor!(joined, Joined, JoinedPlayer);
    dataset_accessor!(team_seasons, TeamSeasons, TeamSeasonStat);
    dataset_accessor!(player_stats, PlayerStats, PlayerStatsRow);
    dataset_accessor!(ranked, Ranked, RankedPlayer);

    /// Persist as a warehouse table under the model's layer and name.
    pub fn write_to(
        &self,
        warehouse: &Warehouse,
        model: ModelId,
        run_id: &str,
        parquet: bool,
    ) -> Result<TableMeta, DataError> {
        let (layer, name) = (model.layer(), model.name());
        match self {
            Dataset::BoxScores(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::PlayerSeasons(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::Contracts(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::TeamLines(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::SeasonTotals(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::Joined(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::TeamSeasons(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::PlayerStats(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::Careers(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::TopScorers(r) => warehouse.write_table(layer, name, r, run_id, parquet),
            Dataset::Ranked(r) => warehouse.write_table(layer, name, r, run_id, parquet),
        }
    }
}

/// Everything a model may read while it is computed.
pub struct BuildContext<'a> {
    pub config: &'a PipelineConfig,
    pub sources: &'a RawSources,
    pub upstream: &'a HashMap<ModelId, Dataset>,
}

impl BuildContext<'_> {
    fn input<'s, T: 's>(
        &'s self,
        model: ModelId,
        pick: impl Fn(&'s Dataset) -> Option<&'s [T]>,
    ) -> Result<&'s [T], ModelError> {
        let dataset = self
            .upstream
            .get(&model)
            .ok_or(ModelError::MissingInput(model))?;
        pick(dataset).ok_or(ModelError::WrongShape(model))
    }

    fn source<'s, T>(&'s self, kind: SourceKind, rows: &'s Option<T>) -> Result<&'s T, ModelError> {
        rows.as_ref().ok_or_else(|| ModelError::Source {
            kind,
            reason: self
                .sources
                .failures
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| "not loaded".to_string()),
        })
    }
}

/// Compute one model from its inputs.
pub fn build(model: ModelId, ctx: &BuildContext<'_>) -> Result<Dataset, ModelError> {
    use ModelId::*;
    let config = ctx.config;
    let dataset = match model {
        BronzeBoxScores => {
            let raw = ctx.source(SourceKind::BoxScores, &ctx.sources.box_scores)?;
            Dataset::BoxScores(bronze::box_scores(raw))
        }
        BronzePlayerSeason => {
            let raw = ctx.source(SourceKind::PlayerSeason, &ctx.sources.player_season)?;
            Dataset::PlayerSeasons(bronze::player_seasons(raw))
        }
        BronzeContracts => {
            let raw = ctx.source(SourceKind::Contracts, &ctx.sources.contracts)?;
            Dataset::Contracts(bronze::contracts(raw))
        }
        BronzeTeamStats => {
            let files = ctx.source(SourceKind::TeamStats, &ctx.sources.team_stats)?;
            let lines = files
                .iter()
                .flat_map(|(competition, raw)| bronze::team_stats(raw, competition))
                .collect();
            Dataset::TeamLines(lines)
        }
        SilverPlayerSeasonTotals => {
            let games = ctx.input(BronzeBoxScores, Dataset::box_scores)?;
            Dataset::SeasonTotals(silver::player_season_totals(games))
        }
        SilverPlayerSeason => {
            let lines = ctx.input(BronzePlayerSeason, Dataset::player_seasons)?;
            Dataset::PlayerSeasons(canonical_season_rows(lines, config.pipeline.season))
        }
        SilverPlayerContracts => {
            let canon = ctx.input(SilverPlayerSeason, Dataset::player_seasons)?;
            let contracts = ctx.input(BronzeContracts, Dataset::contracts)?;
            Dataset::Joined(join_contracts(canon, contracts))
        }
        SilverTeamSeason => {
            let lines = ctx.input(BronzeTeamStats, Dataset::team_lines)?;
            Dataset::TeamSeasons(silver::team_seasons(lines))
        }
        GoldPlayerStats => {
            let totals = ctx.input(SilverPlayerSeasonTotals, Dataset::season_totals)?;
            let lines = ctx.input(BronzePlayerSeason, Dataset::player_seasons)?;
            Dataset::PlayerStats(gold::player_stats(totals, lines))
        }
        GoldCareerStats => {
            let stats = ctx.input(GoldPlayerStats, Dataset::player_stats)?;
            Dataset::Careers(gold::career_stats(stats))
        }
        GoldTopScorers => {
            let stats = ctx.input(GoldPlayerStats, Dataset::player_stats)?;
            Dataset::TopScorers(gold::top_scorers(
                stats,
                config.top_scorers.min_games,
                config.top_scorers.limit,
            ))
        }
        GoldTeamStatsAll => {
            let teams = ctx.input(SilverTeamSeason, Dataset::team_seasons)?;
            Dataset::TeamSeasons(gold::team_stats_all(teams))
        }
        GoldPlayerPercentiles => {
            let joined = ctx.input(SilverPlayerContracts, Dataset::joined)?;
            Dataset::Ranked(rank_players(joined))
        }
        GoldGLeagueTargets => {
            let ranked = ctx.input(GoldPlayerPercentiles, Dataset::ranked)?;
            Dataset::Ranked(g_league_targets(ranked))
        }
    };
    Ok(dataset)
}

//! Domain types for players, contracts, teams and classification results.

pub mod category;
pub mod contract;
pub mod ids;
pub mod player;
pub mod team;

pub use category::{GLeagueCategory, Percentiles, RankedPlayer};
pub use contract::{ContractRecord, ContractStatus, JoinedPlayer, MatchLevel, SALARY_YEARS};
pub use ids::{DatasetHash, RunId};
pub use player::{
    BoxScore, CareerStats, PlayerSeasonStat, PlayerSeasonTotals, PlayerStatsRow, TopScorer,
    TRADED_MARKER,
};
pub use team::{TeamSeasonStat, TeamStatLine};

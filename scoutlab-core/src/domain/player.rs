//! Player rows: game lines, season lines and the gold aggregates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::table::{Cell, Field, Record};

/// Suffix of the aggregate row a traded player gets (`2TM`, `3TM`, ...).
pub const TRADED_MARKER: &str = "TM";

/// One player in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub season: i32,
    pub game_date: Option<NaiveDate>,
    pub player: String,
    pub team: Option<String>,
    pub minutes: Option<f64>,
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub fgm: Option<f64>,
    pub fga: Option<f64>,
    pub ftm: Option<f64>,
    pub fta: Option<f64>,
    pub tov: Option<f64>,
}

impl Record for BoxScore {
    const SCHEMA: &'static [Field] = &[
        Field::int("season"),
        Field::text("game_date"),
        Field::text("player"),
        Field::text("team"),
        Field::float("minutes"),
        Field::float("pts"),
        Field::float("reb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("fgm"),
        Field::float("fga"),
        Field::float("ftm"),
        Field::float("fta"),
        Field::float("tov"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(Some(self.season.into())),
            Cell::Text(self.game_date.map(|d| d.to_string())),
            Cell::text(&self.player),
            Cell::opt_text(self.team.as_deref()),
            Cell::Float(self.minutes),
            Cell::Float(self.pts),
            Cell::Float(self.reb),
            Cell::Float(self.ast),
            Cell::Float(self.stl),
            Cell::Float(self.blk),
            Cell::Float(self.fgm),
            Cell::Float(self.fga),
            Cell::Float(self.ftm),
            Cell::Float(self.fta),
            Cell::Float(self.tov),
        ]
    }
}

/// One player, one season, one team, per-game averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStat {
    pub player: String,
    pub season: i32,
    pub team: Option<String>,
    pub pos: Option<String>,
    pub age: Option<i32>,
    pub g: Option<i64>,
    pub fga: Option<f64>,
    pub fta: Option<f64>,
    pub pts: Option<f64>,
    pub trb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub ts_pct: Option<f64>,
}

impl PlayerSeasonStat {
    /// Whether this is a multi-team aggregate row (`2TM`, `3TM`, ...).
    pub fn is_traded_aggregate(&self) -> bool {
        self.team
            .as_deref()
            .is_some_and(|t| t.trim().to_ascii_uppercase().ends_with(TRADED_MARKER))
    }
}

impl Record for PlayerSeasonStat {
    const SCHEMA: &'static [Field] = &[
        Field::text("player"),
        Field::int("season"),
        Field::text("team"),
        Field::text("pos"),
        Field::int("age"),
        Field::int("g"),
        Field::float("fga"),
        Field::float("fta"),
        Field::float("pts"),
        Field::float("trb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("ts_pct"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.player),
            Cell::Int(Some(self.season.into())),
            Cell::opt_text(self.team.as_deref()),
            Cell::opt_text(self.pos.as_deref()),
            Cell::Int(self.age.map(i64::from)),
            Cell::Int(self.g),
            Cell::Float(self.fga),
            Cell::Float(self.fta),
            Cell::Float(self.pts),
            Cell::Float(self.trb),
            Cell::Float(self.ast),
            Cell::Float(self.stl),
            Cell::Float(self.blk),
            Cell::Float(self.ts_pct),
        ]
    }
}

/// Box scores rolled up per (season, player, team).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonTotals {
    pub season: i32,
    pub player: String,
    pub team: Option<String>,
    pub games_played: i64,
    pub minutes: Option<f64>,
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub fgm: Option<f64>,
    pub fga: Option<f64>,
    pub ftm: Option<f64>,
    pub fta: Option<f64>,
    pub tov: Option<f64>,
    pub minutes_per_game: Option<f64>,
    pub points_per_game: Option<f64>,
    pub rebounds_per_game: Option<f64>,
    pub assists_per_game: Option<f64>,
    pub points_per_minute: Option<f64>,
    pub ts_pct: Option<f64>,
}

impl Record for PlayerSeasonTotals {
    const SCHEMA: &'static [Field] = &[
        Field::int("season"),
        Field::text("player"),
        Field::text("team"),
        Field::int("games_played"),
        Field::float("minutes"),
        Field::float("pts"),
        Field::float("reb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("fgm"),
        Field::float("fga"),
        Field::float("ftm"),
        Field::float("fta"),
        Field::float("tov"),
        Field::float("minutes_per_game"),
        Field::float("points_per_game"),
        Field::float("rebounds_per_game"),
        Field::float("assists_per_game"),
        Field::float("points_per_minute"),
        Field::float("ts_pct"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(Some(self.season.into())),
            Cell::text(&self.player),
            Cell::opt_text(self.team.as_deref()),
            Cell::Int(Some(self.games_played)),
            Cell::Float(self.minutes),
            Cell::Float(self.pts),
            Cell::Float(self.reb),
            Cell::Float(self.ast),
            Cell::Float(self.stl),
            Cell::Float(self.blk),
            Cell::Float(self.fgm),
            Cell::Float(self.fga),
            Cell::Float(self.ftm),
            Cell::Float(self.fta),
            Cell::Float(self.tov),
            Cell::Float(self.minutes_per_game),
            Cell::Float(self.points_per_game),
            Cell::Float(self.rebounds_per_game),
            Cell::Float(self.assists_per_game),
            Cell::Float(self.points_per_minute),
            Cell::Float(self.ts_pct),
        ]
    }
}

/// Gold per-season player line across all teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsRow {
    pub season: i32,
    pub player: String,
    pub team: Option<String>,
    pub pos: Option<String>,
    pub games_played: i64,
    pub total_points: Option<f64>,
    pub total_rebounds: Option<f64>,
    pub total_assists: Option<f64>,
    pub points_per_game: Option<f64>,
    pub rebounds_per_game: Option<f64>,
    pub assists_per_game: Option<f64>,
}

impl PlayerStatsRow {
    /// Points + rebounds + assists over the season, nulls as zero.
    pub fn production(&self) -> f64 {
        self.total_points.unwrap_or(0.0)
            + self.total_rebounds.unwrap_or(0.0)
            + self.total_assists.unwrap_or(0.0)
    }
}

impl Record for PlayerStatsRow {
    const SCHEMA: &'static [Field] = &[
        Field::int("season"),
        Field::text("player"),
        Field::text("team"),
        Field::text("pos"),
        Field::int("games_played"),
        Field::float("total_points"),
        Field::float("total_rebounds"),
        Field::float("total_assists"),
        Field::float("points_per_game"),
        Field::float("rebounds_per_game"),
        Field::float("assists_per_game"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(Some(self.season.into())),
            Cell::text(&self.player),
            Cell::opt_text(self.team.as_deref()),
            Cell::opt_text(self.pos.as_deref()),
            Cell::Int(Some(self.games_played)),
            Cell::Float(self.total_points),
            Cell::Float(self.total_rebounds),
            Cell::Float(self.total_assists),
            Cell::Float(self.points_per_game),
            Cell::Float(self.rebounds_per_game),
            Cell::Float(self.assists_per_game),
        ]
    }
}

/// Career aggregate per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerStats {
    pub player: String,
    pub seasons_played: i64,
    pub first_season: i32,
    pub last_season: i32,
    pub games_played: i64,
    pub total_points: Option<f64>,
    pub total_rebounds: Option<f64>,
    pub total_assists: Option<f64>,
    pub points_per_game: Option<f64>,
    pub rebounds_per_game: Option<f64>,
    pub assists_per_game: Option<f64>,
}

impl Record for CareerStats {
    const SCHEMA: &'static [Field] = &[
        Field::text("player"),
        Field::int("seasons_played"),
        Field::int("first_season"),
        Field::int("last_season"),
        Field::int("games_played"),
        Field::float("total_points"),
        Field::float("total_rebounds"),
        Field::float("total_assists"),
        Field::float("points_per_game"),
        Field::float("rebounds_per_game"),
        Field::float("assists_per_game"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.player),
            Cell::Int(Some(self.seasons_played)),
            Cell::Int(Some(self.first_season.into())),
            Cell::Int(Some(self.last_season.into())),
            Cell::Int(Some(self.games_played)),
            Cell::Float(self.total_points),
            Cell::Float(self.total_rebounds),
            Cell::Float(self.total_assists),
            Cell::Float(self.points_per_game),
            Cell::Float(self.rebounds_per_game),
            Cell::Float(self.assists_per_game),
        ]
    }
}

/// Ranked scoring leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopScorer {
    pub rank: i64,
    pub season: i32,
    pub player: String,
    pub team: Option<String>,
    pub games_played: i64,
    pub points_per_game: Option<f64>,
    pub total_points: Option<f64>,
}

impl Record for TopScorer {
    const SCHEMA: &'static [Field] = &[
        Field::int("rank"),
        Field::int("season"),
        Field::text("player"),
        Field::text("team"),
        Field::int("games_played"),
        Field::float("points_per_game"),
        Field::float("total_points"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(Some(self.rank)),
            Cell::Int(Some(self.season.into())),
            Cell::text(&self.player),
            Cell::opt_text(self.team.as_deref()),
            Cell::Int(Some(self.games_played)),
            Cell::Float(self.points_per_game),
            Cell::Float(self.total_points),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(team: Option<&str>) -> PlayerSeasonStat {
        PlayerSeasonStat {
            player: "A".into(),
            season: 2024,
            team: team.map(str::to_string),
            pos: None,
            age: None,
            g: None,
            fga: None,
            fta: None,
            pts: None,
            trb: None,
            ast: None,
            stl: None,
            blk: None,
            ts_pct: None,
        }
    }

    #[test]
    fn traded_marker_detection() {
        assert!(stat(Some("2TM")).is_traded_aggregate());
        assert!(stat(Some("3tm ")).is_traded_aggregate());
        assert!(!stat(Some("BOS")).is_traded_aggregate());
        assert!(!stat(None).is_traded_aggregate());
    }

    #[test]
    fn cells_match_schema_width() {
        assert_eq!(stat(None).cells().len(), PlayerSeasonStat::SCHEMA.len());
    }
}

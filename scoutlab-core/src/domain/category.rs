//! Percentile ranks, G-League categories and the ranked player row.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::contract::ContractStatus;
use crate::data::table::{Cell, Field, Record};

/// Per-statistic percentile ranks, each in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Percentiles {
    pub pts: u8,
    pub trb: u8,
    pub ast: u8,
    pub stl: u8,
    pub blk: u8,
    pub ts: u8,
}

/// G-League classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GLeagueCategory {
    #[serde(rename = "NBA Struggling / G-League Potential")]
    Struggling,
    #[serde(rename = "Well-Rounded Average")]
    WellRounded,
    #[serde(rename = "Not G-League Target")]
    NotTarget,
}

impl GLeagueCategory {
    pub const ALL: [GLeagueCategory; 3] = [
        GLeagueCategory::Struggling,
        GLeagueCategory::WellRounded,
        GLeagueCategory::NotTarget,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GLeagueCategory::Struggling => "NBA Struggling / G-League Potential",
            GLeagueCategory::WellRounded => "Well-Rounded Average",
            GLeagueCategory::NotTarget => "Not G-League Target",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            GLeagueCategory::Struggling => "Struggling",
            GLeagueCategory::WellRounded => "Well-Rounded",
            GLeagueCategory::NotTarget => "Not Target",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn is_target(self) -> bool {
        self != GLeagueCategory::NotTarget
    }
}

impl fmt::Display for GLeagueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A joined player with percentile ranks and a category, flattened.
///
/// This is the row shape of both `gold_player_percentiles` and
/// `gold_g_league_targets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub player: String,
    pub season: i32,
    pub age: Option<i32>,
    pub pos: Option<String>,
    pub team: Option<String>,
    pub g: Option<i64>,
    pub pts: Option<f64>,
    pub trb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub ts_pct: Option<f64>,
    pub contract_team: Option<String>,
    pub salary_y1: Option<f64>,
    pub salary_y2: Option<f64>,
    pub salary_y3: Option<f64>,
    pub guaranteed: Option<bool>,
    pub contract_status: ContractStatus,
    pub pts_percentile: u8,
    pub trb_percentile: u8,
    pub ast_percentile: u8,
    pub stl_percentile: u8,
    pub blk_percentile: u8,
    pub ts_percentile: u8,
    pub g_league_category: GLeagueCategory,
}

impl RankedPlayer {
    pub fn percentiles(&self) -> Percentiles {
        Percentiles {
            pts: self.pts_percentile,
            trb: self.trb_percentile,
            ast: self.ast_percentile,
            stl: self.stl_percentile,
            blk: self.blk_percentile,
            ts: self.ts_percentile,
        }
    }

    pub fn is_available(&self) -> bool {
        self.contract_status.is_available()
    }
}

impl Record for RankedPlayer {
    const SCHEMA: &'static [Field] = &[
        Field::text("player"),
        Field::int("season"),
        Field::int("age"),
        Field::text("pos"),
        Field::text("team"),
        Field::int("g"),
        Field::float("pts"),
        Field::float("trb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("ts_pct"),
        Field::text("contract_team"),
        Field::float("salary_y1"),
        Field::float("salary_y2"),
        Field::float("salary_y3"),
        Field::bool("guaranteed"),
        Field::text("contract_status"),
        Field::int("pts_percentile"),
        Field::int("trb_percentile"),
        Field::int("ast_percentile"),
        Field::int("stl_percentile"),
        Field::int("blk_percentile"),
        Field::int("ts_percentile"),
        Field::text("g_league_category"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.player),
            Cell::Int(Some(self.season.into())),
            Cell::Int(self.age.map(i64::from)),
            Cell::opt_text(self.pos.as_deref()),
            Cell::opt_text(self.team.as_deref()),
            Cell::Int(self.g),
            Cell::Float(self.pts),
            Cell::Float(self.trb),
            Cell::Float(self.ast),
            Cell::Float(self.stl),
            Cell::Float(self.blk),
            Cell::Float(self.ts_pct),
            Cell::opt_text(self.contract_team.as_deref()),
            Cell::Float(self.salary_y1),
            Cell::Float(self.salary_y2),
            Cell::Float(self.salary_y3),
            Cell::Bool(self.guaranteed),
            Cell::text(self.contract_status.label()),
            Cell::Int(Some(self.pts_percentile.into())),
            Cell::Int(Some(self.trb_percentile.into())),
            Cell::Int(Some(self.ast_percentile.into())),
            Cell::Int(Some(self.stl_percentile.into())),
            Cell::Int(Some(self.blk_percentile.into())),
            Cell::Int(Some(self.ts_percentile.into())),
            Cell::text(self.g_league_category.label()),
        ]
    }
}

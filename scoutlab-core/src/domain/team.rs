//! Team rows per competition.

use serde::{Deserialize, Serialize};

use crate::data::table::{Cell, Field, Record};

/// Cleaned team line from one competition source (bronze).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatLine {
    pub season: i32,
    pub team: String,
    pub competition_type: String,
    pub gp: i64,
    pub w: Option<i64>,
    pub l: Option<i64>,
    pub win_pct: Option<f64>,
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub tov: Option<f64>,
    pub fga: Option<f64>,
    pub fta: Option<f64>,
}

impl Record for TeamStatLine {
    const SCHEMA: &'static [Field] = &[
        Field::int("season"),
        Field::text("team"),
        Field::text("competition_type"),
        Field::int("gp"),
        Field::int("w"),
        Field::int("l"),
        Field::float("win_pct"),
        Field::float("pts"),
        Field::float("reb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("tov"),
        Field::float("fga"),
        Field::float("fta"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(Some(self.season.into())),
            Cell::text(&self.team),
            Cell::text(&self.competition_type),
            Cell::Int(Some(self.gp)),
            Cell::Int(self.w),
            Cell::Int(self.l),
            Cell::Float(self.win_pct),
            Cell::Float(self.pts),
            Cell::Float(self.reb),
            Cell::Float(self.ast),
            Cell::Float(self.stl),
            Cell::Float(self.blk),
            Cell::Float(self.tov),
            Cell::Float(self.fga),
            Cell::Float(self.fta),
        ]
    }
}

/// Team line with derived efficiency ratios (silver and gold).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonStat {
    pub season: i32,
    pub team: String,
    pub competition_type: String,
    pub gp: i64,
    pub w: Option<i64>,
    pub l: Option<i64>,
    pub win_pct: Option<f64>,
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub tov: Option<f64>,
    pub fga: Option<f64>,
    pub fta: Option<f64>,
    pub ts_pct: Option<f64>,
    pub ast_to_tov: Option<f64>,
}

impl Record for TeamSeasonStat {
    const SCHEMA: &'static [Field] = &[
        Field::int("season"),
        Field::text("team"),
        Field::text("competition_type"),
        Field::int("gp"),
        Field::int("w"),
        Field::int("l"),
        Field::float("win_pct"),
        Field::float("pts"),
        Field::float("reb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("tov"),
        Field::float("fga"),
        Field::float("fta"),
        Field::float("ts_pct"),
        Field::float("ast_to_tov"),
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Int(Some(self.season.into())),
            Cell::text(&self.team),
            Cell::text(&self.competition_type),
            Cell::Int(Some(self.gp)),
            Cell::Int(self.w),
            Cell::Int(self.l),
            Cell::Float(self.win_pct),
            Cell::Float(self.pts),
            Cell::Float(self.reb),
            Cell::Float(self.ast),
            Cell::Float(self.stl),
            Cell::Float(self.blk),
            Cell::Float(self.tov),
            Cell::Float(self.fga),
            Cell::Float(self.fta),
            Cell::Float(self.ts_pct),
            Cell::Float(self.ast_to_tov),
        ]
    }
}

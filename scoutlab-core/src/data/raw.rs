//! Raw source records, as read from CSV after header canonicalization.
//!
//! All fields are optional text. Casting happens in the bronze layer so a
//! bad cell never fails deserialization of the whole file.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawBoxScore {
    pub season: Option<String>,
    #[serde(alias = "date")]
    pub game_date: Option<String>,
    #[serde(alias = "player_name")]
    pub player: Option<String>,
    #[serde(alias = "tm", alias = "team_abbreviation")]
    pub team: Option<String>,
    #[serde(alias = "minutes")]
    pub min: Option<String>,
    pub pts: Option<String>,
    #[serde(alias = "trb")]
    pub reb: Option<String>,
    pub ast: Option<String>,
    pub stl: Option<String>,
    pub blk: Option<String>,
    pub fgm: Option<String>,
    pub fga: Option<String>,
    pub ftm: Option<String>,
    pub fta: Option<String>,
    #[serde(alias = "to")]
    pub tov: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawPlayerSeason {
    pub season: Option<String>,
    #[serde(alias = "player_name")]
    pub player: Option<String>,
    pub age: Option<String>,
    #[serde(alias = "tm")]
    pub team: Option<String>,
    #[serde(alias = "position")]
    pub pos: Option<String>,
    #[serde(alias = "gp")]
    pub g: Option<String>,
    pub fga: Option<String>,
    pub fta: Option<String>,
    pub pts: Option<String>,
    #[serde(alias = "reb")]
    pub trb: Option<String>,
    pub ast: Option<String>,
    pub stl: Option<String>,
    pub blk: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawContract {
    #[serde(alias = "player_name")]
    pub player: Option<String>,
    #[serde(alias = "tm")]
    pub team: Option<String>,
    pub salary_y1: Option<String>,
    pub salary_y2: Option<String>,
    pub salary_y3: Option<String>,
    pub salary_y4: Option<String>,
    pub salary_y5: Option<String>,
    pub salary_y6: Option<String>,
    pub guaranteed: Option<String>,
    pub uncontracted: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTeamStat {
    pub season: Option<String>,
    #[serde(alias = "team_name", alias = "tm")]
    pub team: Option<String>,
    #[serde(alias = "g")]
    pub gp: Option<String>,
    pub w: Option<String>,
    pub l: Option<String>,
    #[serde(alias = "win_pct", alias = "w_pct")]
    pub win: Option<String>,
    pub pts: Option<String>,
    pub fga: Option<String>,
    pub fta: Option<String>,
    #[serde(alias = "trb")]
    pub reb: Option<String>,
    pub ast: Option<String>,
    #[serde(alias = "to")]
    pub tov: Option<String>,
    pub stl: Option<String>,
    pub blk: Option<String>,
}

//! Bronze layer: typed, null-filtered copies of the raw sources.
//!
//! Every cell goes through a safe cast. Rows missing their identifying
//! columns are dropped; everything else is kept with nulls where the raw
//! value could not be read.

use crate::data::cast::{
    to_bool, to_date, to_f64, to_flag, to_i32, to_i64, to_money, to_season, to_text,
    true_shooting,
};
use crate::data::raw::{RawBoxScore, RawContract, RawPlayerSeason, RawTeamStat};
use crate::domain::{BoxScore, ContractRecord, PlayerSeasonStat, TeamStatLine};

pub fn box_scores(raw: &[RawBoxScore]) -> Vec<BoxScore> {
    let rows: Vec<BoxScore> = raw
        .iter()
        .filter_map(|r| {
            Some(BoxScore {
                season: to_season(r.season.as_deref())?,
                player: to_text(r.player.as_deref())?,
                game_date: to_date(r.game_date.as_deref()),
                team: to_text(r.team.as_deref()),
                minutes: to_f64(r.min.as_deref()),
                pts: to_f64(r.pts.as_deref()),
                reb: to_f64(r.reb.as_deref()),
                ast: to_f64(r.ast.as_deref()),
                stl: to_f64(r.stl.as_deref()),
                blk: to_f64(r.blk.as_deref()),
                fgm: to_f64(r.fgm.as_deref()),
                fga: to_f64(r.fga.as_deref()),
                ftm: to_f64(r.ftm.as_deref()),
                fta: to_f64(r.fta.as_deref()),
                tov: to_f64(r.tov.as_deref()),
            })
        })
        .collect();
    log_dropped("box_scores", raw.len(), rows.len());
    rows
}

/// Season lines with true-shooting% derived per row.
pub fn player_seasons(raw: &[RawPlayerSeason]) -> Vec<PlayerSeasonStat> {
    let rows: Vec<PlayerSeasonStat> = raw
        .iter()
        .filter_map(|r| {
            let pts = to_f64(r.pts.as_deref());
            let fga = to_f64(r.fga.as_deref());
            let fta = to_f64(r.fta.as_deref());
            Some(PlayerSeasonStat {
                player: to_text(r.player.as_deref())?,
                season: to_season(r.season.as_deref())?,
                team: to_text(r.team.as_deref()),
                pos: to_text(r.pos.as_deref()),
                age: to_i32(r.age.as_deref()),
                g: to_i64(r.g.as_deref()),
                fga,
                fta,
                pts,
                trb: to_f64(r.trb.as_deref()),
                ast: to_f64(r.ast.as_deref()),
                stl: to_f64(r.stl.as_deref()),
                blk: to_f64(r.blk.as_deref()),
                ts_pct: true_shooting(pts, fga, fta),
            })
        })
        .collect();
    log_dropped("player_season", raw.len(), rows.len());
    rows
}

pub fn contracts(raw: &[RawContract]) -> Vec<ContractRecord> {
    let rows: Vec<ContractRecord> = raw
        .iter()
        .filter_map(|r| {
            Some(ContractRecord {
                player: to_text(r.player.as_deref())?,
                team: to_text(r.team.as_deref()),
                salaries: [
                    to_money(r.salary_y1.as_deref()),
                    to_money(r.salary_y2.as_deref()),
                    to_money(r.salary_y3.as_deref()),
                    to_money(r.salary_y4.as_deref()),
                    to_money(r.salary_y5.as_deref()),
                    to_money(r.salary_y6.as_deref()),
                ],
                guaranteed: to_flag(r.guaranteed.as_deref()),
                uncontracted: to_bool(r.uncontracted.as_deref()),
            })
        })
        .collect();
    log_dropped("contracts", raw.len(), rows.len());
    rows
}

/// Team lines from one competition source, tagged with its competition type.
pub fn team_stats(raw: &[RawTeamStat], competition_type: &str) -> Vec<TeamStatLine> {
    let rows: Vec<TeamStatLine> = raw
        .iter()
        .filter_map(|r| {
            Some(TeamStatLine {
                season: to_season(r.season.as_deref())?,
                team: to_text(r.team.as_deref())?,
                gp: to_i64(r.gp.as_deref())?,
                competition_type: competition_type.to_string(),
                w: to_i64(r.w.as_deref()),
                l: to_i64(r.l.as_deref()),
                win_pct: to_f64(r.win.as_deref()),
                pts: to_f64(r.pts.as_deref()),
                reb: to_f64(r.reb.as_deref()),
                ast: to_f64(r.ast.as_deref()),
                stl: to_f64(r.stl.as_deref()),
                blk: to_f64(r.blk.as_deref()),
                tov: to_f64(r.tov.as_deref()),
                fga: to_f64(r.fga.as_deref()),
                fta: to_f64(r.fta.as_deref()),
            })
        })
        .collect();
    log_dropped(competition_type, raw.len(), rows.len());
    rows
}

fn log_dropped(source: &str, before: usize, after: usize) {
    if before > after {
        tracing::debug!(source, dropped = before - after, "dropped rows without keys");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn player_season_casts_and_derives_ts() {
        let raw = vec![
            RawPlayerSeason {
                season: s("2023-24"),
                player: s(" Jane Doe "),
                age: s("24"),
                team: s("BOS"),
                pos: s("PG"),
                g: s("60"),
                fga: s("10"),
                fta: s("5"),
                pts: s("20"),
                trb: s("x"),
                ..Default::default()
            },
            RawPlayerSeason {
                season: s("2024"),
                player: s(""),
                ..Default::default()
            },
        ];
        let rows = player_seasons(&raw);
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.player, "Jane Doe");
        assert_eq!(r.season, 2024);
        assert_eq!(r.trb, None);
        let ts = r.ts_pct.unwrap();
        assert!((ts - 20.0 / (2.0 * (10.0 + 2.2))).abs() < 1e-12);
    }

    #[test]
    fn zero_attempts_give_null_ts() {
        let raw = vec![RawPlayerSeason {
            season: s("2024"),
            player: s("Bench Guy"),
            fga: s("0"),
            fta: s("0"),
            pts: s("0"),
            ..Default::default()
        }];
        assert_eq!(player_seasons(&raw)[0].ts_pct, None);
    }

    #[test]
    fn contract_money_and_flags() {
        let raw = vec![RawContract {
            player: s("A"),
            salary_y1: s("$1,000,000"),
            salary_y2: s(""),
            guaranteed: s("$1,000,000"),
            uncontracted: s("no"),
            ..Default::default()
        }];
        let rows = contracts(&raw);
        assert_eq!(rows[0].salaries[0], Some(1_000_000.0));
        assert_eq!(rows[0].salaries[1], None);
        assert_eq!(rows[0].guaranteed, Some(true));
        assert_eq!(rows[0].uncontracted, Some(false));
    }

    #[test]
    fn team_rows_need_team_and_gp() {
        let raw = vec![
            RawTeamStat {
                season: s("2024"),
                team: s("Boston Celtics"),
                gp: s("82"),
                w: s("64"),
                ..Default::default()
            },
            RawTeamStat {
                season: s("2024"),
                team: s("Ghosts"),
                gp: s("n/a"),
                ..Default::default()
            },
            RawTeamStat {
                season: s("2024"),
                gp: s("82"),
                ..Default::default()
            },
        ];
        let rows = team_stats(&raw, "Playoffs");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].competition_type, "Playoffs");
        assert_eq!(rows[0].w, Some(64));
    }

    #[test]
    fn box_scores_need_player_and_season() {
        let raw = vec![
            RawBoxScore {
                season: s("2024"),
                player: s("A"),
                game_date: s("01/15/2024"),
                pts: s("30"),
                ..Default::default()
            },
            RawBoxScore {
                season: s("bad"),
                player: s("B"),
                ..Default::default()
            },
        ];
        let rows = box_scores(&raw);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].game_date.is_some());
    }
}

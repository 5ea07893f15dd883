//! Silver layer: per-entity aggregation and ratio derivation.
//!
//! Season filtering, deduplication and the contract join live in
//! [`crate::classify`] because they feed the percentile pipeline directly.

use std::collections::BTreeMap;

use crate::data::cast::{ratio, sum_present, true_shooting};
use crate::domain::{BoxScore, PlayerSeasonTotals, TeamSeasonStat, TeamStatLine};

/// Roll box scores up to one row per (season, player, team).
///
/// Games played is the number of game lines. Output is ordered by season,
/// player, then team.
pub fn player_season_totals(box_scores: &[BoxScore]) -> Vec<PlayerSeasonTotals> {
    let mut groups: BTreeMap<(i32, &str, Option<&str>), Vec<&BoxScore>> = BTreeMap::new();
    for row in box_scores {
        groups
            .entry((row.season, row.player.as_str(), row.team.as_deref()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((season, player, team), games)| {
            let sum = |f: fn(&BoxScore) -> Option<f64>| sum_present(games.iter().map(|g| f(g)));
            let games_played = games.len() as i64;
            let gp = Some(games_played as f64);

            let minutes = sum(|g| g.minutes);
            let pts = sum(|g| g.pts);
            let reb = sum(|g| g.reb);
            let ast = sum(|g| g.ast);
            let fga = sum(|g| g.fga);
            let fta = sum(|g| g.fta);

            PlayerSeasonTotals {
                season,
                player: player.to_string(),
                team: team.map(str::to_string),
                games_played,
                minutes,
                pts,
                reb,
                ast,
                stl: sum(|g| g.stl),
                blk: sum(|g| g.blk),
                fgm: sum(|g| g.fgm),
                fga,
                ftm: sum(|g| g.ftm),
                fta,
                tov: sum(|g| g.tov),
                minutes_per_game: ratio(minutes, gp),
                points_per_game: ratio(pts, gp),
                rebounds_per_game: ratio(reb, gp),
                assists_per_game: ratio(ast, gp),
                points_per_minute: ratio(pts, minutes),
                ts_pct: true_shooting(pts, fga, fta),
            }
        })
        .collect()
}

/// Derive true-shooting% and assist-to-turnover ratio for every team line.
pub fn team_seasons(lines: &[TeamStatLine]) -> Vec<TeamSeasonStat> {
    lines
        .iter()
        .map(|t| TeamSeasonStat {
            season: t.season,
            team: t.team.clone(),
            competition_type: t.competition_type.clone(),
            gp: t.gp,
            w: t.w,
            l: t.l,
            win_pct: t.win_pct.or_else(|| {
                let w = t.w? as f64;
                ratio(Some(w), Some(t.gp as f64))
            }),
            pts: t.pts,
            reb: t.reb,
            ast: t.ast,
            stl: t.stl,
            blk: t.blk,
            tov: t.tov,
            fga: t.fga,
            fta: t.fta,
            ts_pct: true_shooting(t.pts, t.fga, t.fta),
            ast_to_tov: ratio(t.ast, t.tov),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(player: &str, team: &str, pts: Option<f64>, min: Option<f64>) -> BoxScore {
        BoxScore {
            season: 2024,
            game_date: None,
            player: player.into(),
            team: Some(team.into()),
            minutes: min,
            pts,
            reb: None,
            ast: Some(2.0),
            stl: None,
            blk: None,
            fgm: None,
            fga: Some(10.0),
            ftm: None,
            fta: Some(0.0),
            tov: None,
        }
    }

    #[test]
    fn totals_group_by_player_and_team() {
        let rows = vec![
            game("A", "BOS", Some(10.0), Some(30.0)),
            game("A", "BOS", Some(20.0), Some(30.0)),
            game("A", "NYK", Some(5.0), None),
            game("B", "BOS", None, Some(10.0)),
        ];
        let totals = player_season_totals(&rows);
        assert_eq!(totals.len(), 3);

        let a_bos = &totals[0];
        assert_eq!(a_bos.team.as_deref(), Some("BOS"));
        assert_eq!(a_bos.games_played, 2);
        assert_eq!(a_bos.pts, Some(30.0));
        assert_eq!(a_bos.points_per_game, Some(15.0));
        assert_eq!(a_bos.points_per_minute, Some(0.5));
        assert_eq!(a_bos.reb, None, "all-null sum stays null");

        let a_nyk = &totals[1];
        assert_eq!(a_nyk.minutes, None);
        assert_eq!(a_nyk.points_per_minute, None);

        let b = &totals[2];
        assert_eq!(b.pts, None);
        assert_eq!(b.ts_pct, None);
    }

    #[test]
    fn team_ratios_null_on_zero_denominator() {
        let line = TeamStatLine {
            season: 2024,
            team: "BOS".into(),
            competition_type: "Regular Season".into(),
            gp: 82,
            w: Some(41),
            l: Some(41),
            win_pct: None,
            pts: Some(9000.0),
            reb: None,
            ast: Some(2000.0),
            stl: None,
            blk: None,
            tov: Some(0.0),
            fga: Some(7000.0),
            fta: Some(1500.0),
        };
        let out = team_seasons(&[line]);
        assert_eq!(out[0].ast_to_tov, None);
        assert_eq!(out[0].win_pct, Some(0.5));
        assert!(out[0].ts_pct.is_some());
    }
}

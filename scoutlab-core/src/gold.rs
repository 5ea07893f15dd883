//! Gold layer aggregates: per-season player lines, careers, scoring leaders
//! and the team/competition union.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::data::cast::{ratio, sum_present};
use crate::domain::{
    CareerStats, PlayerSeasonStat, PlayerSeasonTotals, PlayerStatsRow, TeamSeasonStat, TopScorer,
};

fn desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One row per (season, player) across all teams the player appeared for.
///
/// The primary team is the one with the most games (ties alphabetical).
/// Position comes from the season lines by exact name and season.
pub fn player_stats(
    totals: &[PlayerSeasonTotals],
    season_lines: &[PlayerSeasonStat],
) -> Vec<PlayerStatsRow> {
    let mut positions: HashMap<(i32, &str), &str> = HashMap::new();
    for line in season_lines {
        if let Some(pos) = line.pos.as_deref() {
            positions.entry((line.season, line.player.as_str())).or_insert(pos);
        }
    }

    let mut groups: BTreeMap<(i32, &str), Vec<&PlayerSeasonTotals>> = BTreeMap::new();
    for t in totals {
        groups.entry((t.season, t.player.as_str())).or_default().push(t);
    }

    groups
        .into_iter()
        .map(|((season, player), stints)| {
            let primary = stints
                .iter()
                .min_by(|a, b| {
                    b.games_played
                        .cmp(&a.games_played)
                        .then_with(|| match (&a.team, &b.team) {
                            (Some(x), Some(y)) => x.cmp(y),
                            (Some(_), None) => Ordering::Less,
                            (None, Some(_)) => Ordering::Greater,
                            (None, None) => Ordering::Equal,
                        })
                })
                .and_then(|t| t.team.clone());

            let games_played: i64 = stints.iter().map(|t| t.games_played).sum();
            let gp = Some(games_played as f64);
            let total_points = sum_present(stints.iter().map(|t| t.pts));
            let total_rebounds = sum_present(stints.iter().map(|t| t.reb));
            let total_assists = sum_present(stints.iter().map(|t| t.ast));

            PlayerStatsRow {
                season,
                player: player.to_string(),
                team: primary,
                pos: positions.get(&(season, player)).map(|p| p.to_string()),
                games_played,
                total_points,
                total_rebounds,
                total_assists,
                points_per_game: ratio(total_points, gp),
                rebounds_per_game: ratio(total_rebounds, gp),
                assists_per_game: ratio(total_assists, gp),
            }
        })
        .collect()
}

/// Career aggregate per player, ordered by player name.
pub fn career_stats(stats: &[PlayerStatsRow]) -> Vec<CareerStats> {
    let mut groups: BTreeMap<&str, Vec<&PlayerStatsRow>> = BTreeMap::new();
    for row in stats {
        groups.entry(row.player.as_str()).or_default().push(row);
    }

    groups
        .into_iter()
        .filter_map(|(player, rows)| {
            let seasons: BTreeSet<i32> = rows.iter().map(|r| r.season).collect();
            let first_season = *seasons.first()?;
            let last_season = *seasons.last()?;
            let games_played: i64 = rows.iter().map(|r| r.games_played).sum();
            let gp = Some(games_played as f64);
            let total_points = sum_present(rows.iter().map(|r| r.total_points));
            let total_rebounds = sum_present(rows.iter().map(|r| r.total_rebounds));
            let total_assists = sum_present(rows.iter().map(|r| r.total_assists));
            Some(CareerStats {
                player: player.to_string(),
                seasons_played: seasons.len() as i64,
                first_season,
                last_season,
                games_played,
                total_points,
                total_rebounds,
                total_assists,
                points_per_game: ratio(total_points, gp),
                rebounds_per_game: ratio(total_rebounds, gp),
                assists_per_game: ratio(total_assists, gp),
            })
        })
        .collect()
}

/// Scoring leaders with at least `min_games`, ranked from 1.
pub fn top_scorers(stats: &[PlayerStatsRow], min_games: i64, limit: usize) -> Vec<TopScorer> {
    let mut eligible: Vec<&PlayerStatsRow> =
        stats.iter().filter(|r| r.games_played >= min_games).collect();
    eligible.sort_by(|a, b| {
        desc_nulls_last(a.points_per_game, b.points_per_game)
            .then_with(|| desc_nulls_last(a.total_points, b.total_points))
            .then_with(|| a.player.cmp(&b.player))
            .then_with(|| b.season.cmp(&a.season))
    });

    eligible
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, r)| TopScorer {
            rank: i as i64 + 1,
            season: r.season,
            player: r.player.clone(),
            team: r.team.clone(),
            games_played: r.games_played,
            points_per_game: r.points_per_game,
            total_points: r.total_points,
        })
        .collect()
}

/// All competitions in one table: newest season first, competitions
/// alphabetical, best record first.
pub fn team_stats_all(teams: &[TeamSeasonStat]) -> Vec<TeamSeasonStat> {
    let mut out = teams.to_vec();
    out.sort_by(|a, b| {
        b.season
            .cmp(&a.season)
            .then_with(|| a.competition_type.cmp(&b.competition_type))
            .then_with(|| desc_nulls_last(a.win_pct, b.win_pct))
            .then_with(|| a.team.cmp(&b.team))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stint(player: &str, team: Option<&str>, season: i32, games: i64, pts: f64) -> PlayerSeasonTotals {
        PlayerSeasonTotals {
            season,
            player: player.into(),
            team: team.map(str::to_string),
            games_played: games,
            minutes: None,
            pts: Some(pts),
            reb: Some(games as f64),
            ast: None,
            stl: None,
            blk: None,
            fgm: None,
            fga: None,
            ftm: None,
            fta: None,
            tov: None,
            minutes_per_game: None,
            points_per_game: None,
            rebounds_per_game: None,
            assists_per_game: None,
            points_per_minute: None,
            ts_pct: None,
        }
    }

    fn line(player: &str, season: i32, pos: Option<&str>) -> PlayerSeasonStat {
        PlayerSeasonStat {
            player: player.into(),
            season,
            team: None,
            pos: pos.map(str::to_string),
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

    fn stats_row(player: &str, season: i32, games: i64, ppg: Option<f64>) -> PlayerStatsRow {
        PlayerStatsRow {
            season,
            player: player.into(),
            team: None,
            pos: None,
            games_played: games,
            total_points: ppg.map(|p| p * games as f64),
            total_rebounds: None,
            total_assists: None,
            points_per_game: ppg,
            rebounds_per_game: None,
            assists_per_game: None,
        }
    }

    #[test]
    fn player_stats_merge_stints() {
        let totals = vec![
            stint("A", Some("NYK"), 2024, 30, 300.0),
            stint("A", Some("BOS"), 2024, 30, 600.0),
            stint("A", Some("LAL"), 2024, 10, 100.0),
        ];
        let lines = vec![line("A", 2024, None), line("A", 2024, Some("SG"))];
        let out = player_stats(&totals, &lines);
        assert_eq!(out.len(), 1);
        let r = &out[0];
        assert_eq!(r.team.as_deref(), Some("BOS"), "tie on games goes alphabetical");
        assert_eq!(r.pos.as_deref(), Some("SG"));
        assert_eq!(r.games_played, 70);
        assert_eq!(r.total_points, Some(1000.0));
        assert_eq!(r.total_assists, None);
        assert_eq!(r.assists_per_game, None);
        assert!((r.points_per_game.unwrap() - 1000.0 / 70.0).abs() < 1e-12);
    }

    #[test]
    fn position_lookup_is_exact_name_and_season() {
        let totals = vec![stint("A", Some("BOS"), 2024, 10, 10.0)];
        let lines = vec![line("a", 2024, Some("C")), line("A", 2023, Some("PF"))];
        assert_eq!(player_stats(&totals, &lines)[0].pos, None);
    }

    #[test]
    fn career_spans_seasons() {
        let stats = vec![
            stats_row("A", 2022, 50, Some(10.0)),
            stats_row("A", 2024, 50, Some(20.0)),
            stats_row("B", 2023, 10, None),
        ];
        let careers = career_stats(&stats);
        assert_eq!(careers.len(), 2);
        let a = &careers[0];
        assert_eq!(a.seasons_played, 2);
        assert_eq!((a.first_season, a.last_season), (2022, 2024));
        assert_eq!(a.points_per_game, Some(15.0));
        assert_eq!(careers[1].total_points, None);
    }

    #[test]
    fn top_scorers_filter_sort_and_limit() {
        let stats = vec![
            stats_row("Low", 2024, 50, Some(5.0)),
            stats_row("Few", 2024, 5, Some(40.0)),
            stats_row("High", 2024, 50, Some(30.0)),
            stats_row("Mid", 2024, 50, Some(20.0)),
            stats_row("Null", 2024, 50, None),
        ];
        let top = top_scorers(&stats, 10, 3);
        let names: Vec<&str> = top.iter().map(|t| t.player.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[2].rank, 3);
    }

    #[test]
    fn team_union_ordering() {
        let team = |season, comp: &str, name: &str, win: Option<f64>| TeamSeasonStat {
            season,
            team: name.into(),
            competition_type: comp.into(),
            gp: 82,
            w: None,
            l: None,
            win_pct: win,
            pts: None,
            reb: None,
            ast: None,
            stl: None,
            blk: None,
            tov: None,
            fga: None,
            fta: None,
            ts_pct: None,
            ast_to_tov: None,
        };
        let teams = vec![
            team(2023, "Regular Season", "X", Some(0.9)),
            team(2024, "Regular Season", "A", Some(0.4)),
            team(2024, "Playoffs", "B", Some(0.5)),
            team(2024, "Regular Season", "C", Some(0.6)),
            team(2024, "Regular Season", "D", None),
        ];
        let out = team_stats_all(&teams);
        let order: Vec<&str> = out.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A", "D", "X"]);
    }
}

//! Player profile analytics over the per-season gold player lines.
//!
//! A profile compares one player against every player of the same season:
//! radar scores centred on the league mean, availability and production
//! metrics, league percentiles and ranks, plus the player's season history.

use serde::Serialize;

use crate::domain::PlayerStatsRow;

/// Regular-season length. Availability scaling never assumes more games.
pub const SEASON_GAMES: i64 = 82;
/// Minutes assumed per game when estimating scoring rate.
pub const ASSUMED_MINUTES_PER_GAME: f64 = 25.0;

/// Map `value` to 0..=100 with `min` at 0, `avg` at 50 and `max` at 100,
/// linear on each side of the mean. Degenerate spans give 50.
pub fn normalize_to_scale(value: f64, min: f64, avg: f64, max: f64) -> f64 {
    if max == min {
        return 50.0;
    }
    let scaled = if value <= avg {
        if avg == min {
            50.0
        } else {
            50.0 * (value - min) / (avg - min)
        }
    } else if max == avg {
        50.0
    } else {
        50.0 + 50.0 * (value - avg) / (max - avg)
    };
    scaled.clamp(0.0, 100.0)
}

/// Share of `population` strictly below `value`, as a percentage.
pub fn share_below(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let below = population.iter().filter(|&&v| v < value).count();
    below as f64 / population.len() as f64 * 100.0
}

/// Descending rank (1 = highest) with ties sharing their average rank.
pub fn average_rank(value: f64, population: &[f64]) -> f64 {
    let higher = population.iter().filter(|&&v| v > value).count();
    let equal = population.iter().filter(|&&v| v == value).count().max(1);
    higher as f64 + (equal as f64 + 1.0) / 2.0
}

#[derive(Debug, Clone, Copy)]
struct Spread {
    min: f64,
    avg: f64,
    max: f64,
}

impl Spread {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { min, avg, max })
    }

    fn scale(&self, value: f64) -> f64 {
        normalize_to_scale(value, self.min, self.avg, self.max)
    }
}

/// Radar axes, each 0..=100 with 50 at the league mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarScores {
    pub scoring: f64,
    pub rebounding: f64,
    pub playmaking: f64,
    pub availability: f64,
    pub production: f64,
}

impl RadarScores {
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("Scoring", self.scoring),
            ("Rebounding", self.rebounding),
            ("Playmaking", self.playmaking),
            ("Availability", self.availability),
            ("Production", self.production),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdvancedMetrics {
    pub games_played: i64,
    /// Games over the season's most games played, as a percentage.
    pub availability_pct: f64,
    pub production_per_game: f64,
    /// Points per minute assuming a fixed minutes load.
    pub est_points_per_minute: f64,
    pub points_percentile: f64,
    pub rebounds_percentile: f64,
    pub assists_percentile: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueRanks {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub out_of: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueAverages {
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
    pub games_played: f64,
}

/// Everything the profile views and reports show for one player-season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub line: PlayerStatsRow,
    pub league: LeagueAverages,
    pub radar: RadarScores,
    pub advanced: AdvancedMetrics,
    pub ranks: LeagueRanks,
    /// Every season of the player, newest first.
    pub history: Vec<PlayerStatsRow>,
}

/// Seasons present, newest first.
pub fn seasons(rows: &[PlayerStatsRow]) -> Vec<i32> {
    let mut seasons: Vec<i32> = rows.iter().map(|r| r.season).collect();
    seasons.sort_unstable_by(|a, b| b.cmp(a));
    seasons.dedup();
    seasons
}

/// Players of one season, sorted by name.
pub fn players_in_season(rows: &[PlayerStatsRow], season: i32) -> Vec<&PlayerStatsRow> {
    let mut out: Vec<&PlayerStatsRow> = rows.iter().filter(|r| r.season == season).collect();
    out.sort_by(|a, b| a.player.cmp(&b.player));
    out
}

fn column(rows: &[&PlayerStatsRow], f: impl Fn(&PlayerStatsRow) -> Option<f64>) -> Vec<f64> {
    rows.iter().filter_map(|r| f(r)).collect()
}

/// Build the profile of `player` in `season`. `None` if the player has no
/// line that season.
pub fn build_profile(rows: &[PlayerStatsRow], player: &str, season: i32) -> Option<PlayerProfile> {
    let league: Vec<&PlayerStatsRow> = rows.iter().filter(|r| r.season == season).collect();
    let line = league.iter().find(|r| r.player == player).copied()?.clone();

    let ppg = column(&league, |r| r.points_per_game);
    let rpg = column(&league, |r| r.rebounds_per_game);
    let apg = column(&league, |r| r.assists_per_game);
    let games = column(&league, |r| Some(r.games_played as f64));
    let production = column(&league, |r| Some(r.production()));

    let p_ppg = line.points_per_game.unwrap_or(0.0);
    let p_rpg = line.rebounds_per_game.unwrap_or(0.0);
    let p_apg = line.assists_per_game.unwrap_or(0.0);
    let p_games = line.games_played as f64;
    let p_production = line.production();

    let scale = |values: &[f64], v: f64| Spread::of(values).map_or(50.0, |s| s.scale(v));
    let availability = Spread::of(&games).map_or(50.0, |s| {
        let capped_max = s.max.min(SEASON_GAMES as f64);
        normalize_to_scale(p_games, s.min, s.avg, capped_max)
    });

    let radar = RadarScores {
        scoring: scale(&ppg, p_ppg),
        rebounding: scale(&rpg, p_rpg),
        playmaking: scale(&apg, p_apg),
        availability,
        production: scale(&production, p_production),
    };

    let max_games = games.iter().copied().fold(0.0, f64::max);
    let max_games = if max_games > 0.0 { max_games } else { SEASON_GAMES as f64 };
    let (production_per_game, est_points_per_minute) = if line.games_played > 0 {
        (
            p_production / p_games,
            line.total_points.unwrap_or(0.0) / (p_games * ASSUMED_MINUTES_PER_GAME),
        )
    } else {
        (0.0, 0.0)
    };

    let advanced = AdvancedMetrics {
        games_played: line.games_played,
        availability_pct: p_games / max_games * 100.0,
        production_per_game,
        est_points_per_minute,
        points_percentile: share_below(p_ppg, &ppg),
        rebounds_percentile: share_below(p_rpg, &rpg),
        assists_percentile: share_below(p_apg, &apg),
    };

    let ranks = LeagueRanks {
        points: average_rank(p_ppg, &ppg),
        rebounds: average_rank(p_rpg, &rpg),
        assists: average_rank(p_apg, &apg),
        out_of: league.len(),
    };

    let mean = |values: &[f64]| Spread::of(values).map_or(0.0, |s| s.avg);
    let averages = LeagueAverages {
        points_per_game: mean(&ppg),
        rebounds_per_game: mean(&rpg),
        assists_per_game: mean(&apg),
        games_played: mean(&games),
    };

    let mut history: Vec<PlayerStatsRow> =
        rows.iter().filter(|r| r.player == player).cloned().collect();
    history.sort_by(|a, b| b.season.cmp(&a.season));

    Some(PlayerProfile {
        line,
        league: averages,
        radar,
        advanced,
        ranks,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: &str, season: i32, games: i64, ppg: f64, rpg: f64, apg: f64) -> PlayerStatsRow {
        let g = games as f64;
        PlayerStatsRow {
            season,
            player: player.into(),
            team: Some("BOS".into()),
            pos: Some("G".into()),
            games_played: games,
            total_points: Some(ppg * g),
            total_rebounds: Some(rpg * g),
            total_assists: Some(apg * g),
            points_per_game: Some(ppg),
            rebounds_per_game: Some(rpg),
            assists_per_game: Some(apg),
        }
    }

    fn league() -> Vec<PlayerStatsRow> {
        vec![
            row("A", 2024, 80, 30.0, 10.0, 8.0),
            row("B", 2024, 60, 20.0, 5.0, 4.0),
            row("C", 2024, 40, 10.0, 3.0, 2.0),
            row("D", 2024, 60, 20.0, 4.0, 1.0),
            row("A", 2023, 70, 25.0, 9.0, 7.0),
        ]
    }

    #[test]
    fn scale_anchors() {
        assert_eq!(normalize_to_scale(0.0, 0.0, 10.0, 40.0), 0.0);
        assert_eq!(normalize_to_scale(10.0, 0.0, 10.0, 40.0), 50.0);
        assert_eq!(normalize_to_scale(40.0, 0.0, 10.0, 40.0), 100.0);
        assert_eq!(normalize_to_scale(5.0, 0.0, 10.0, 40.0), 25.0);
        assert_eq!(normalize_to_scale(25.0, 0.0, 10.0, 40.0), 75.0);
    }

    #[test]
    fn scale_degenerate_spans() {
        assert_eq!(normalize_to_scale(3.0, 3.0, 3.0, 3.0), 50.0);
        assert_eq!(normalize_to_scale(1.0, 1.0, 1.0, 5.0), 50.0);
        assert_eq!(normalize_to_scale(5.0, 1.0, 5.0, 5.0), 50.0);
    }

    #[test]
    fn scale_is_clamped() {
        assert_eq!(normalize_to_scale(90.0, 0.0, 40.0, 82.0), 100.0);
    }

    #[test]
    fn share_below_is_strict() {
        let pop = [10.0, 20.0, 20.0, 30.0];
        assert_eq!(share_below(20.0, &pop), 25.0);
        assert_eq!(share_below(5.0, &pop), 0.0);
        assert_eq!(share_below(1.0, &[]), 0.0);
    }

    #[test]
    fn ranks_average_ties() {
        let pop = [30.0, 20.0, 20.0, 10.0];
        assert_eq!(average_rank(30.0, &pop), 1.0);
        assert_eq!(average_rank(20.0, &pop), 2.5);
        assert_eq!(average_rank(10.0, &pop), 4.0);
    }

    #[test]
    fn profile_compares_within_season() {
        let rows = league();
        let p = build_profile(&rows, "B", 2024).unwrap();
        assert_eq!(p.ranks.out_of, 4);
        assert_eq!(p.ranks.points, 2.5);
        assert_eq!(p.advanced.points_percentile, 25.0);
        assert_eq!(p.advanced.availability_pct, 75.0);
        assert_eq!(p.league.points_per_game, 20.0);
        assert_eq!(p.radar.scoring, 50.0);
        assert_eq!(p.history.len(), 1);
    }

    #[test]
    fn history_is_newest_first() {
        let rows = league();
        let p = build_profile(&rows, "A", 2023).unwrap();
        let seasons: Vec<i32> = p.history.iter().map(|r| r.season).collect();
        assert_eq!(seasons, vec![2024, 2023]);
        assert_eq!(p.ranks.out_of, 1);
        assert_eq!(p.radar.scoring, 50.0);
    }

    #[test]
    fn unknown_player_has_no_profile() {
        assert!(build_profile(&league(), "Z", 2024).is_none());
        assert!(build_profile(&league(), "C", 2023).is_none());
    }

    #[test]
    fn season_listing() {
        let rows = league();
        assert_eq!(seasons(&rows), vec![2024, 2023]);
        let names: Vec<&str> = players_in_season(&rows, 2024)
            .into_iter()
            .map(|r| r.player.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }
}

//! Classification pipeline: dedup, contract join, percentiles, categories.
//!
//! ```text
//! season lines ─ dedup ─┐
//!                       ├─ join ─ contract status ─ percentiles ─ category ─ targets
//! contracts ────────────┘
//! ```

pub mod contract_status;
pub mod dedup;
pub mod g_league;
pub mod join;
pub mod names;
pub mod percentile;

use std::cmp::Ordering;

pub use dedup::canonical_season_rows;
pub use join::join_contracts;

use crate::domain::{JoinedPlayer, Percentiles, RankedPlayer};

fn tiebreak(a: &&JoinedPlayer, b: &&JoinedPlayer) -> Ordering {
    a.stat
        .player
        .cmp(&b.stat.player)
        .then_with(|| a.stat.team.cmp(&b.stat.team))
}

fn position<'a>(j: &'a &JoinedPlayer) -> Option<&'a str> {
    j.stat.pos.as_deref()
}

/// Rank every joined player with a defined true-shooting% and classify it.
///
/// Counting stats are ranked within position; true-shooting% league-wide.
/// Rows without true-shooting% are dropped. Input order is preserved.
pub fn rank_players(joined: &[JoinedPlayer]) -> Vec<RankedPlayer> {
    let eligible: Vec<&JoinedPlayer> = joined.iter().filter(|j| j.stat.ts_pct.is_some()).collect();

    let rank = |value: fn(&JoinedPlayer) -> Option<f64>| {
        percentile::ntile_ranks(&eligible, position, |j| value(j), tiebreak)
    };
    let pts = rank(|j| j.stat.pts);
    let trb = rank(|j| j.stat.trb);
    let ast = rank(|j| j.stat.ast);
    let stl = rank(|j| j.stat.stl);
    let blk = rank(|j| j.stat.blk);
    let ts = percentile::ntile_ranks(&eligible, |_| None, |j| j.stat.ts_pct, tiebreak);

    eligible
        .iter()
        .enumerate()
        .map(|(i, j)| {
            let p = Percentiles {
                pts: pts[i],
                trb: trb[i],
                ast: ast[i],
                stl: stl[i],
                blk: blk[i],
                ts: ts[i],
            };
            to_ranked(j, p)
        })
        .collect()
}

fn to_ranked(j: &JoinedPlayer, p: Percentiles) -> RankedPlayer {
    let s = &j.stat;
    let c = j.contract.as_ref();
    RankedPlayer {
        player: s.player.clone(),
        season: s.season,
        age: s.age,
        pos: s.pos.clone(),
        team: s.team.clone(),
        g: s.g,
        pts: s.pts,
        trb: s.trb,
        ast: s.ast,
        stl: s.stl,
        blk: s.blk,
        ts_pct: s.ts_pct,
        contract_team: c.and_then(|c| c.team.clone()),
        salary_y1: c.and_then(|c| c.salaries[0]),
        salary_y2: c.and_then(|c| c.salaries[1]),
        salary_y3: c.and_then(|c| c.salaries[2]),
        guaranteed: c.and_then(|c| c.guaranteed),
        contract_status: j.contract_status,
        pts_percentile: p.pts,
        trb_percentile: p.trb,
        ast_percentile: p.ast,
        stl_percentile: p.stl,
        blk_percentile: p.blk,
        ts_percentile: p.ts,
        g_league_category: g_league::classify(&p, j.contract_status, s.age),
    }
}

/// Keep only rows classified as a G-League target.
pub fn g_league_targets(ranked: &[RankedPlayer]) -> Vec<RankedPlayer> {
    ranked
        .iter()
        .filter(|r| r.g_league_category.is_target())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContractStatus, GLeagueCategory, PlayerSeasonStat};

    fn joined(player: &str, pos: &str, pts: f64, ts: Option<f64>, age: i32) -> JoinedPlayer {
        JoinedPlayer {
            stat: PlayerSeasonStat {
                player: player.into(),
                season: 2024,
                team: Some("BOS".into()),
                pos: Some(pos.into()),
                age: Some(age),
                g: Some(40),
                fga: Some(8.0),
                fta: Some(2.0),
                pts: Some(pts),
                trb: Some(pts / 2.0),
                ast: Some(pts / 3.0),
                stl: Some(1.0),
                blk: Some(0.5),
                ts_pct: ts,
            },
            contract: None,
            match_level: None,
            contract_status: ContractStatus::NoContractData,
        }
    }

    #[test]
    fn null_ts_rows_are_excluded() {
        let rows = vec![
            joined("A", "G", 10.0, Some(0.5), 22),
            joined("B", "G", 12.0, None, 22),
        ];
        let ranked = rank_players(&rows);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].player, "A");
    }

    #[test]
    fn counting_stats_rank_within_position() {
        let rows = vec![
            joined("A", "G", 30.0, Some(0.5), 22),
            joined("B", "C", 5.0, Some(0.6), 22),
            joined("C", "G", 20.0, Some(0.7), 22),
        ];
        let ranked = rank_players(&rows);
        assert_eq!(ranked[0].pts_percentile, 2);
        assert_eq!(ranked[1].pts_percentile, 1);
        assert_eq!(ranked[2].pts_percentile, 1);
        // true shooting is league-wide
        assert_eq!(ranked[0].ts_percentile, 1);
        assert_eq!(ranked[1].ts_percentile, 2);
        assert_eq!(ranked[2].ts_percentile, 3);
    }

    #[test]
    fn targets_drop_not_target_rows() {
        let rows = vec![
            joined("Young", "G", 10.0, Some(0.5), 22),
            joined("Old", "G", 5.0, Some(0.5), 33),
        ];
        let ranked = rank_players(&rows);
        let targets = g_league_targets(&ranked);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].player, "Young");
        assert_eq!(targets[0].g_league_category, GLeagueCategory::Struggling);
    }
}

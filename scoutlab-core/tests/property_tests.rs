//! Property tests for classification invariants.
//!
//! Uses proptest to verify:
//! 1. Percentile buckets: always in 1..=100, monotone in the sorted order
//! 2. True-shooting null rule: null iff an input is null or the denominator is 0
//! 3. Category gates: targets are always young enough and signable
//! 4. Dedup: exactly one line per player survives
//! 5. Join: every stat row appears exactly once

use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;

use scoutlab_core::classify::percentile::{ntile, ntile_ranks, BUCKETS};
use scoutlab_core::classify::{canonical_season_rows, g_league, join_contracts, rank_players};
use scoutlab_core::data::cast::true_shooting;
use scoutlab_core::domain::{
    ContractRecord, ContractStatus, GLeagueCategory, PlayerSeasonStat, Percentiles,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_status() -> impl Strategy<Value = ContractStatus> {
    prop::sample::select(ContractStatus::ALL.to_vec())
}

fn arb_percentiles() -> impl Strategy<Value = Percentiles> {
    (1u8..=100, 1u8..=100, 1u8..=100, 1u8..=100, 1u8..=100, 1u8..=100).prop_map(
        |(pts, trb, ast, stl, blk, ts)| Percentiles { pts, trb, ast, stl, blk, ts },
    )
}

fn arb_stat() -> impl Strategy<Value = PlayerSeasonStat> {
    (
        0usize..12,
        prop::sample::select(vec!["BOS", "NYK", "2TM", "LAL"]),
        prop::option::of(prop::sample::select(vec!["PG", "SG", "C"])),
        prop::option::of(1i64..82),
        prop::option::of(0.0..35.0f64),
        prop::option::of(0.0..0.8f64),
        18i32..40,
    )
        .prop_map(|(name, team, pos, g, pts, ts, age)| PlayerSeasonStat {
            player: format!("Player {name}"),
            season: 2024,
            team: Some(team.to_string()),
            pos: pos.map(str::to_string),
            age: Some(age),
            g,
            fga: Some(10.0),
            fta: Some(2.0),
            pts,
            trb: pts.map(|p| p / 2.0),
            ast: pts.map(|p| p / 4.0),
            stl: Some(1.0),
            blk: Some(0.4),
            ts_pct: ts,
        })
}

fn arb_contract() -> impl Strategy<Value = ContractRecord> {
    (0usize..12, prop::collection::vec(prop::option::of(0.0..5.0e7f64), 6), any::<bool>())
        .prop_map(|(name, salaries, uncontracted)| ContractRecord {
            player: format!("PLAYER {name}"),
            team: None,
            salaries: [
                salaries[0], salaries[1], salaries[2], salaries[3], salaries[4], salaries[5],
            ],
            guaranteed: None,
            uncontracted: Some(uncontracted),
        })
}

// ── 1. Percentile buckets ────────────────────────────────────────────

proptest! {
    #[test]
    fn ntile_stays_in_range_and_is_monotone(len in 1usize..700) {
        let mut prev = 0;
        for pos in 0..len {
            let b = ntile(pos, len, BUCKETS);
            prop_assert!((1..=BUCKETS).contains(&b));
            prop_assert!(b >= prev);
            prev = b;
        }
        // the top bucket is 100 once there are enough rows, else n
        prop_assert_eq!(prev, len.min(BUCKETS));
    }

    #[test]
    fn bucket_sizes_differ_by_at_most_one(len in 100usize..700) {
        let mut sizes = vec![0usize; BUCKETS];
        for pos in 0..len {
            sizes[ntile(pos, len, BUCKETS) - 1] += 1;
        }
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn higher_values_never_rank_lower(values in prop::collection::vec(prop::option::of(-50.0..50.0f64), 1..300)) {
        let ranks = ntile_ranks(&values, |_| None, |v| *v, |_, _| Ordering::Equal);
        for i in 0..values.len() {
            for j in 0..values.len() {
                if let (Some(a), Some(b)) = (values[i], values[j]) {
                    if a < b {
                        prop_assert!(ranks[i] <= ranks[j]);
                    }
                }
                if values[i].is_none() && values[j].is_some() {
                    prop_assert!(ranks[i] <= ranks[j]);
                }
            }
        }
    }
}

// ── 2. True shooting ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn true_shooting_null_rule(
        pts in prop::option::of(0.0..40.0f64),
        fga in prop::option::of(0.0..30.0f64),
        fta in prop::option::of(0.0..15.0f64),
    ) {
        let ts = true_shooting(pts, fga, fta);
        let expect_null = match (pts, fga, fta) {
            (Some(_), Some(a), Some(t)) => a + 0.44 * t == 0.0,
            _ => true,
        };
        prop_assert_eq!(ts.is_none(), expect_null);
    }
}

// ── 3. Category gates ────────────────────────────────────────────────

proptest! {
    #[test]
    fn targets_are_young_and_signable(
        p in arb_percentiles(),
        status in arb_status(),
        age in prop::option::of(18i32..40),
    ) {
        let c = g_league::classify(&p, status, age);
        if c.is_target() {
            prop_assert!(status.is_available());
            prop_assert!(age.is_some_and(|a| a <= g_league::MAX_TARGET_AGE));
        }
        if c == GLeagueCategory::WellRounded {
            for v in [p.pts, p.trb, p.ast, p.ts] {
                prop_assert!(v > 25 && v < 75);
            }
        }
        if c == GLeagueCategory::Struggling {
            prop_assert!(p.pts <= 25 || p.trb <= 25 || p.ast <= 25);
        }
    }
}

// ── 4 & 5. Dedup and join cardinality ────────────────────────────────

proptest! {
    #[test]
    fn dedup_keeps_one_line_per_player(stats in prop::collection::vec(arb_stat(), 0..60)) {
        let canon = canonical_season_rows(&stats, 2024);
        let names: HashSet<&str> = stats.iter().map(|s| s.player.as_str()).collect();
        prop_assert_eq!(canon.len(), names.len());
        let unique: HashSet<&str> = canon.iter().map(|s| s.player.as_str()).collect();
        prop_assert_eq!(unique.len(), canon.len());
    }

    #[test]
    fn join_preserves_rows_and_ranks_drop_null_ts(
        stats in prop::collection::vec(arb_stat(), 0..60),
        contracts in prop::collection::vec(arb_contract(), 0..20),
    ) {
        let canon = canonical_season_rows(&stats, 2024);
        let joined = join_contracts(&canon, &contracts);
        prop_assert_eq!(joined.len(), canon.len());
        for j in &joined {
            prop_assert_eq!(j.contract.is_none(), j.contract_status == ContractStatus::NoContractData);
        }

        let ranked = rank_players(&joined);
        let with_ts = joined.iter().filter(|j| j.stat.ts_pct.is_some()).count();
        prop_assert_eq!(ranked.len(), with_ts);
        for r in &ranked {
            prop_assert!(r.ts_pct.is_some());
            for v in [r.pts_percentile, r.trb_percentile, r.ast_percentile,
                      r.stl_percentile, r.blk_percentile, r.ts_percentile] {
                prop_assert!((1..=100).contains(&v));
            }
        }
    }
}

//! Criterion benchmarks for ScoutLab hot paths.
//!
//! Benchmarks:
//! 1. Bronze casting of raw season lines
//! 2. Dedup + fuzzy contract join
//! 3. Percentile ranking + G-League classification
//! 4. Box-score rollup to season totals

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scoutlab_core::classify::{canonical_season_rows, g_league_targets, join_contracts, rank_players};
use scoutlab_core::data::raw::{RawBoxScore, RawContract, RawPlayerSeason};
use scoutlab_core::data::read_csv;
use scoutlab_core::sample::{write_sample, SampleConfig};
use scoutlab_core::{bronze, silver};

// ── Helpers ──────────────────────────────────────────────────────────

struct Inputs {
    games: Vec<RawBoxScore>,
    seasons: Vec<RawPlayerSeason>,
    contracts: Vec<RawContract>,
}

fn load_inputs(players: usize) -> Inputs {
    let dir = tempfile::tempdir().unwrap();
    let config = SampleConfig { players, ..Default::default() };
    let files = write_sample(dir.path(), &config).unwrap();
    Inputs {
        games: read_csv(&files.box_scores).unwrap(),
        seasons: read_csv(&files.player_season).unwrap(),
        contracts: read_csv(&files.contracts).unwrap(),
    }
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_bronze(c: &mut Criterion) {
    let inputs = load_inputs(400);
    c.bench_function("bronze_player_seasons", |b| {
        b.iter(|| bronze::player_seasons(black_box(&inputs.seasons)))
    });
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    for players in [100usize, 400] {
        let inputs = load_inputs(players);
        let seasons = bronze::player_seasons(&inputs.seasons);
        let contracts = bronze::contracts(&inputs.contracts);

        group.bench_with_input(BenchmarkId::new("join", players), &players, |b, _| {
            b.iter(|| {
                let canon = canonical_season_rows(black_box(&seasons), 2024);
                join_contracts(&canon, black_box(&contracts))
            })
        });

        let joined = join_contracts(&canonical_season_rows(&seasons, 2024), &contracts);
        group.bench_with_input(BenchmarkId::new("rank", players), &players, |b, _| {
            b.iter(|| g_league_targets(&rank_players(black_box(&joined))))
        });
    }
    group.finish();
}

fn bench_rollup(c: &mut Criterion) {
    let inputs = load_inputs(200);
    let games = bronze::box_scores(&inputs.games);
    c.bench_function("silver_player_season_totals", |b| {
        b.iter(|| silver::player_season_totals(black_box(&games)))
    });
}

criterion_group!(benches, bench_bronze, bench_classification, bench_rollup);
criterion_main!(benches);

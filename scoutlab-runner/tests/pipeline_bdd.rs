//! BDD tests for the pipeline executor.
//!
//! These tests run the full model graph over the generated dataset and check:
//! - Every model materializes (views excepted) and the manifest records it
//! - `select` limits the run to a model and its ancestors
//! - A failing source fails its bronze model and skips the descendants only
//! - `fail_fast` skips every later wave
//! - A view removes its stale table; reruns are deterministic

use std::fs;
use std::path::Path;

use scoutlab_core::data::Layer;
use scoutlab_core::data::Warehouse;
use scoutlab_core::domain::{GLeagueCategory, PlayerStatsRow, RankedPlayer, TopScorer};
use scoutlab_core::sample::{write_sample, SampleConfig};
use scoutlab_runner::{
    run_pipeline, Materialization, ModelId, ModelStatus, PipelineConfig, RunHistory, RunSummary,
};

fn setup(root: &Path, players: usize) -> PipelineConfig {
    let input = root.join("raw");
    write_sample(&input, &SampleConfig { players, ..Default::default() }).unwrap();
    let mut config = PipelineConfig::default();
    config.pipeline.input_dir = input;
    config.pipeline.warehouse_dir = root.join("warehouse");
    config
}

#[test]
fn bdd_full_run_materializes_every_table() {
    // GIVEN a generated dataset and a default config
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), 80);

    // WHEN the whole graph runs
    let summary = run_pipeline(&config, &[]).expect("run should succeed");

    // THEN every model succeeds
    assert!(summary.is_success(), "{:#?}", summary.models);
    assert_eq!(summary.models.len(), ModelId::ALL.len());

    // AND every table model has a CSV, while the view has none
    let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);
    for model in ModelId::ALL {
        let present = warehouse.has_table(model.layer(), model.name());
        let is_table = config.materialization_for(model) == Materialization::Table;
        assert_eq!(present, is_table, "{model}");
    }

    // AND the metadata sidecar carries the run id and row count
    let meta = warehouse.meta(Layer::Gold, "gold_player_stats").unwrap();
    assert_eq!(meta.run_id, summary.run_id.0);
    assert_eq!(Some(meta.rows), summary.model("gold_player_stats").map(|m| m.rows));

    // AND the gold tables read back as typed rows
    let targets: Vec<RankedPlayer> = warehouse.read_table(Layer::Gold, "gold_g_league_targets").unwrap();
    assert!(targets.iter().all(|t| t.g_league_category != GLeagueCategory::NotTarget));
    assert!(targets.iter().all(|t| t.season == 2024));

    let scorers: Vec<TopScorer> = warehouse.read_table(Layer::Gold, "gold_top_scorers").unwrap();
    assert!(scorers.len() <= 100);
    assert!(scorers.iter().all(|s| s.games_played >= 10));
    assert!(scorers.windows(2).all(|w| w[0].rank < w[1].rank));

    let stats: Vec<PlayerStatsRow> = warehouse.read_table(Layer::Gold, "gold_player_stats").unwrap();
    assert!(!stats.is_empty());
}

#[test]
fn bdd_manifest_and_history_are_written() {
    // GIVEN a finished run
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), 30);
    let first = run_pipeline(&config, &[]).unwrap();

    // WHEN the manifest is loaded back
    let manifest = RunSummary::load(&config.pipeline.warehouse_dir).unwrap().unwrap();

    // THEN it matches the returned summary
    assert_eq!(manifest, first);
    assert_eq!(manifest.sources.len(), 5);

    // WHEN the same inputs run again
    let second = run_pipeline(&config, &[]).unwrap();

    // THEN the run id and every table's content are identical
    assert_eq!(first.run_id, second.run_id);
    assert_eq!(first.dataset_hash, second.dataset_hash);
    let rows = |s: &RunSummary| s.models.iter().map(|m| m.rows).collect::<Vec<_>>();
    assert_eq!(rows(&first), rows(&second));

    // AND the history holds one line per run
    let history = RunHistory::in_warehouse(&config.pipeline.warehouse_dir);
    let entries = history.read_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.is_clean()));
    assert_eq!(entries[1].run_id, second.run_id.0);
}

#[test]
fn bdd_select_runs_only_ancestors() {
    // GIVEN a dataset without box scores
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), 40);
    fs::remove_file(config.pipeline.input_dir.join("box_scores.csv")).unwrap();

    // WHEN only the targets are selected
    let summary = run_pipeline(&config, &[ModelId::GoldGLeagueTargets]).unwrap();

    // THEN the run succeeds, since box scores are never needed
    assert!(summary.is_success(), "{:#?}", summary.models);
    let names: Vec<&str> = summary.models.iter().map(|m| m.model.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "bronze_player_season",
            "bronze_contracts",
            "silver_player_season",
            "silver_player_contracts",
            "gold_player_percentiles",
            "gold_g_league_targets",
        ]
    );
    assert_eq!(summary.selected, vec!["gold_g_league_targets"]);
    assert!(!summary.sources.iter().any(|s| s.name == "box_scores"));
}

#[test]
fn bdd_failed_source_skips_descendants_only() {
    // GIVEN a dataset whose contracts file is missing
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), 40);
    fs::remove_file(config.pipeline.input_dir.join("contracts.csv")).unwrap();

    // WHEN the whole graph runs
    let summary = run_pipeline(&config, &[]).unwrap();

    // THEN the contracts model fails and its descendants are skipped
    let status = |name: &str| summary.model(name).map(|m| m.status);
    assert_eq!(status("bronze_contracts"), Some(ModelStatus::Failed));
    assert_eq!(status("silver_player_contracts"), Some(ModelStatus::Skipped));
    assert_eq!(status("gold_player_percentiles"), Some(ModelStatus::Skipped));
    assert_eq!(status("gold_g_league_targets"), Some(ModelStatus::Skipped));
    assert!(summary
        .model("gold_g_league_targets")
        .and_then(|m| m.error.as_deref())
        .is_some_and(|e| e.contains("failed")));

    // AND independent branches still succeed
    assert_eq!(status("gold_top_scorers"), Some(ModelStatus::Success));
    assert_eq!(status("gold_team_stats_all"), Some(ModelStatus::Success));
    assert!(summary.source_failures.contains_key("contracts"));

    // AND the failure is recorded in history
    let entries = RunHistory::in_warehouse(&config.pipeline.warehouse_dir).read_all().unwrap();
    assert_eq!(entries[0].failed, 1);
    assert_eq!(entries[0].skipped, 3);
}

#[test]
fn bdd_fail_fast_skips_later_waves() {
    // GIVEN a missing contracts file and fail_fast enabled
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path(), 30);
    config.pipeline.fail_fast = true;
    fs::remove_file(config.pipeline.input_dir.join("contracts.csv")).unwrap();

    // WHEN the whole graph runs
    let summary = run_pipeline(&config, &[]).unwrap();

    // THEN the other bronze models of the first wave still finish
    assert_eq!(
        summary.model("bronze_player_season").map(|m| m.status),
        Some(ModelStatus::Success)
    );
    // AND nothing after the first wave runs
    let later: Vec<_> = summary.models.iter().filter(|m| m.layer != Layer::Bronze).collect();
    assert!(!later.is_empty());
    assert!(later.iter().all(|m| m.status == ModelStatus::Skipped));
}

#[test]
fn bdd_view_removes_stale_table() {
    // GIVEN a run where the percentiles were materialized as a table
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path(), 30);
    config
        .materialization
        .insert("gold_player_percentiles".into(), Materialization::Table);
    run_pipeline(&config, &[]).unwrap();
    let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);
    assert!(warehouse.has_table(Layer::Gold, "gold_player_percentiles"));

    // WHEN the model goes back to a view
    config.materialization.clear();
    let summary = run_pipeline(&config, &[]).unwrap();

    // THEN the old table files are gone and downstream models still built
    assert!(!warehouse.has_table(Layer::Gold, "gold_player_percentiles"));
    assert!(warehouse.meta(Layer::Gold, "gold_player_percentiles").is_none());
    assert_eq!(
        summary.model("gold_g_league_targets").map(|m| m.status),
        Some(ModelStatus::Success)
    );
}

#[test]
fn bdd_parquet_copies_when_enabled() {
    // GIVEN parquet output enabled
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(dir.path(), 20);
    config.pipeline.parquet = true;

    // WHEN a small selection runs
    run_pipeline(&config, &[ModelId::GoldTeamStatsAll]).unwrap();

    // THEN the parquet copy reads back with the CSV's row count
    let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);
    let meta = warehouse.meta(Layer::Gold, "gold_team_stats_all").unwrap();
    assert!(meta.parquet);
    let df = warehouse.read_parquet(Layer::Gold, "gold_team_stats_all").unwrap();
    assert_eq!(df.height(), meta.rows);
}

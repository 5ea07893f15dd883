//! Pipeline executor: plans the model DAG, computes waves in parallel,
//! materializes outputs and records the run.
//!
//! Execution order:
//! 1. Validate config, build the registry DAG, close `select` under ancestors
//! 2. Load only the sources the planned bronze models read
//! 3. Per wave: compute models on rayon workers, then materialize the
//!    results one by one in declaration order
//! 4. A failing model marks its descendants skipped; with `fail_fast` every
//!    later wave is skipped too
//! 5. Write `run_manifest.json` and append to `run_history.jsonl`

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scoutlab_core::data::warehouse::atomic_write;
use scoutlab_core::data::{DataError, Layer, Warehouse};
use scoutlab_core::domain::{DatasetHash, RunId};
use scoutlab_core::fingerprint::SourceDigest;

use crate::config::{ConfigError, PipelineConfig};
use crate::dag::{Dag, DagError};
use crate::data_loader::load_sources;
use crate::history::{HistoryEntry, RunHistory};
use crate::model::{build, BuildContext, Dataset, Materialization, ModelError, ModelId};

/// File name of the manifest inside the warehouse root.
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Errors that abort a whole run. Model failures are reported per model.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("dag error: {0}")]
    Dag(#[from] DagError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("history error: {0}")]
    History(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Success,
    Failed,
    Skipped,
}

impl ModelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelStatus::Success => "success",
            ModelStatus::Failed => "failed",
            ModelStatus::Skipped => "skipped",
        }
    }
}

/// Outcome of one model within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRun {
    pub model: String,
    pub layer: Layer,
    pub status: ModelStatus,
    pub rows: usize,
    pub materialization: Materialization,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

/// The run manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub dataset_hash: DatasetHash,
    pub season: i32,
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub elapsed_ms: u64,
    /// Models named on the command line; empty means the full graph.
    pub selected: Vec<String>,
    /// Planned models in declaration order.
    pub models: Vec<ModelRun>,
    pub sources: Vec<SourceDigest>,
    pub source_failures: BTreeMap<String, String>,
}

impl RunSummary {
    pub fn model(&self, name: &str) -> Option<&ModelRun> {
        self.models.iter().find(|m| m.model == name)
    }

    pub fn count(&self, status: ModelStatus) -> usize {
        self.models.iter().filter(|m| m.status == status).count()
    }

    pub fn is_success(&self) -> bool {
        self.models.iter().all(|m| m.status == ModelStatus::Success)
    }

    /// Read the manifest of the last run, if any.
    pub fn load(warehouse_root: &Path) -> Result<Option<Self>, DataError> {
        let path = warehouse_root.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| DataError::io(&path, e))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| DataError::Metadata(format!("{}: {e}", path.display())))
    }
}

/// The model DAG of the registry. Node `i` is `ModelId::ALL[i]`.
pub fn registry_dag() -> Result<Dag, DagError> {
    Dag::build(
        ModelId::ALL
            .iter()
            .map(|m| (m.name(), m.deps().iter().map(|d| d.name()))),
    )
}

fn node_of(model: ModelId) -> usize {
    ModelId::ALL.iter().position(|m| *m == model).unwrap_or_default()
}

/// Planned waves for a selection (empty selection means every model).
pub fn plan(select: &[ModelId]) -> Result<Vec<Vec<ModelId>>, DagError> {
    let dag = registry_dag()?;
    let included = included_nodes(&dag, select);
    Ok(dag
        .plan(&included)
        .into_iter()
        .map(|w| w.into_iter().map(|n| ModelId::ALL[n]).collect())
        .collect())
}

fn included_nodes(dag: &Dag, select: &[ModelId]) -> BTreeSet<usize> {
    if select.is_empty() {
        (0..dag.len()).collect()
    } else {
        let nodes: Vec<usize> = select.iter().map(|m| node_of(*m)).collect();
        dag.with_ancestors(&nodes)
    }
}

fn millis(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Run the pipeline for `select` (plus ancestors) and record the run.
pub fn run_pipeline(config: &PipelineConfig, select: &[ModelId]) -> Result<RunSummary, RunError> {
    config.validate()?;
    let dag = registry_dag()?;
    let included = included_nodes(&dag, select);
    let waves = dag.plan(&included);

    let started = Instant::now();
    let started_at = chrono::Local::now().naive_local();

    let kinds: BTreeSet<_> = included
        .iter()
        .filter_map(|&n| ModelId::ALL[n].source())
        .collect();
    let sources = load_sources(config, &kinds);
    let dataset_hash = sources.fingerprint.finish();
    let run_id = RunId::derive(&config.canonical_json(), &dataset_hash);
    let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);

    tracing::info!(
        run_id = run_id.short(),
        dataset = dataset_hash.short(),
        models = included.len(),
        waves = waves.len(),
        "starting pipeline run"
    );

    let mut outputs: HashMap<ModelId, Dataset> = HashMap::new();
    let mut runs: BTreeMap<usize, ModelRun> = BTreeMap::new();
    // node -> the failed upstream model that blocks it
    let mut blocked: BTreeMap<usize, String> = BTreeMap::new();
    let mut aborted = false;

    for wave in &waves {
        let mut runnable = Vec::with_capacity(wave.len());
        for &node in wave {
            let model = ModelId::ALL[node];
            let reason = if aborted {
                Some("run aborted by fail_fast".to_string())
            } else {
                blocked.get(&node).map(|up| format!("upstream {up} failed"))
            };
            match reason {
                Some(reason) => {
                    tracing::warn!(model = model.name(), reason = %reason, "skipping model");
                    runs.insert(node, skipped(model, config, reason));
                }
                None => runnable.push(node),
            }
        }

        let ctx = BuildContext {
            config,
            sources: &sources,
            upstream: &outputs,
        };
        let computed: Vec<(usize, Result<Dataset, ModelError>, Instant)> = runnable
            .par_iter()
            .map(|&node| {
                let start = Instant::now();
                (node, build(ModelId::ALL[node], &ctx), start)
            })
            .collect();

        for (node, result, start) in computed {
            let model = ModelId::ALL[node];
            let materialization = config.materialization_for(model);
            let outcome = result.and_then(|dataset| {
                materialize(&warehouse, model, &dataset, materialization, &run_id, config)?;
                Ok(dataset)
            });
            let elapsed_ms = millis(start);

            match outcome {
                Ok(dataset) => {
                    tracing::info!(
                        model = model.name(),
                        rows = dataset.len(),
                        materialization = %materialization,
                        elapsed_ms,
                        "model built"
                    );
                    runs.insert(
                        node,
                        ModelRun {
                            model: model.name().to_string(),
                            layer: model.layer(),
                            status: ModelStatus::Success,
                            rows: dataset.len(),
                            materialization,
                            elapsed_ms,
                            error: None,
                        },
                    );
                    outputs.insert(model, dataset);
                }
                Err(e) => {
                    tracing::warn!(model = model.name(), error = %e, "model failed");
                    for d in dag.descendants(node) {
                        blocked.entry(d).or_insert_with(|| model.name().to_string());
                    }
                    if config.pipeline.fail_fast {
                        aborted = true;
                    }
                    runs.insert(
                        node,
                        ModelRun {
                            model: model.name().to_string(),
                            layer: model.layer(),
                            status: ModelStatus::Failed,
                            rows: 0,
                            materialization,
                            elapsed_ms,
                            error: Some(e.to_string()),
                        },
                    );
                }
            }
        }
    }

    let summary = RunSummary {
        run_id,
        dataset_hash,
        season: config.pipeline.season,
        started_at,
        finished_at: chrono::Local::now().naive_local(),
        elapsed_ms: millis(started),
        selected: select.iter().map(|m| m.name().to_string()).collect(),
        models: runs.into_values().collect(),
        sources: sources.fingerprint.digests(),
        source_failures: sources
            .failures
            .iter()
            .map(|(k, v)| (k.name().to_string(), v.clone()))
            .collect(),
    };

    write_manifest(warehouse.root(), &summary)?;
    RunHistory::in_warehouse(warehouse.root()).append(&HistoryEntry::from_summary(&summary))?;

    tracing::info!(
        run_id = summary.run_id.short(),
        succeeded = summary.count(ModelStatus::Success),
        failed = summary.count(ModelStatus::Failed),
        skipped = summary.count(ModelStatus::Skipped),
        elapsed_ms = summary.elapsed_ms,
        "pipeline run finished"
    );
    Ok(summary)
}

fn skipped(model: ModelId, config: &PipelineConfig, reason: String) -> ModelRun {
    ModelRun {
        model: model.name().to_string(),
        layer: model.layer(),
        status: ModelStatus::Skipped,
        rows: 0,
        materialization: config.materialization_for(model),
        elapsed_ms: 0,
        error: Some(reason),
    }
}

fn materialize(
    warehouse: &Warehouse,
    model: ModelId,
    dataset: &Dataset,
    materialization: Materialization,
    run_id: &RunId,
    config: &PipelineConfig,
) -> Result<(), ModelError> {
    match materialization {
        Materialization::Table => {
            dataset.write_to(warehouse, model, &run_id.0, config.pipeline.parquet)?;
        }
        Materialization::View => {
            if warehouse.remove_table(model.layer(), model.name())? {
                tracing::info!(model = model.name(), "removed stale table of view model");
            }
        }
    }
    Ok(())
}

fn write_manifest(root: &Path, summary: &RunSummary) -> Result<(), DataError> {
    let json = serde_json::to_vec_pretty(summary)
        .map_err(|e| DataError::Metadata(format!("manifest serialization: {e}")))?;
    atomic_write(&root.join(MANIFEST_FILE), &json)
}

//! ScoutLab Runner: pipeline orchestration, run records and reports.
//!
//! This crate builds on `scoutlab-core` to provide:
//! - TOML pipeline configuration with defaults and validation
//! - The model registry and its dependency graph
//! - Source loading with dataset fingerprinting
//! - The wave executor with per-model status and materialization
//! - Run manifest and JSONL run history
//! - Markdown reports and CSV export

pub mod config;
pub mod dag;
pub mod data_loader;
pub mod export;
pub mod history;
pub mod model;
pub mod runner;

pub use config::{ConfigError, PipelineConfig, TeamSource};
pub use dag::{Dag, DagError};
pub use data_loader::{load_sources, LoadError, RawSources};
pub use history::{HistoryEntry, RunHistory};
pub use model::{Dataset, Materialization, ModelError, ModelId, SourceKind};
pub use runner::{plan, run_pipeline, ModelRun, ModelStatus, RunError, RunSummary};

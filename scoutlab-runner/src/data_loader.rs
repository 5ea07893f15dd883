//! Raw source loading for a pipeline run.
//!
//! Only the sources the planned models need are read. Each file is read
//! once: its bytes feed the dataset fingerprint and are then parsed with
//! header canonicalization. A source that fails to load is recorded rather
//! than aborting the run, so only the bronze model reading it fails.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use scoutlab_core::data::raw::{RawBoxScore, RawContract, RawPlayerSeason, RawTeamStat};
use scoutlab_core::data::{read_csv_from_reader, DataError};
use scoutlab_core::fingerprint::DatasetFingerprint;
use serde::de::DeserializeOwned;

use crate::config::PipelineConfig;
use crate::model::SourceKind;

/// Errors from loading one source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source '{kind}' not found at {path}")]
    Missing { kind: SourceKind, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: DataError,
    },
}

/// Parsed raw sources. `None` means the source was not requested or failed.
#[derive(Debug, Default)]
pub struct RawSources {
    pub box_scores: Option<Vec<RawBoxScore>>,
    pub player_season: Option<Vec<RawPlayerSeason>>,
    pub contracts: Option<Vec<RawContract>>,
    /// (competition type, rows) per configured team file.
    pub team_stats: Option<Vec<(String, Vec<RawTeamStat>)>>,
    /// Error message per source that failed to load.
    pub failures: BTreeMap<SourceKind, String>,
    pub fingerprint: DatasetFingerprint,
}

impl RawSources {
    pub fn loaded(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|k| match k {
                SourceKind::BoxScores => self.box_scores.is_some(),
                SourceKind::PlayerSeason => self.player_season.is_some(),
                SourceKind::Contracts => self.contracts.is_some(),
                SourceKind::TeamStats => self.team_stats.is_some(),
            })
            .collect()
    }
}

fn read_source<T: DeserializeOwned>(
    kind: SourceKind,
    label: &str,
    path: PathBuf,
    fingerprint: &mut DatasetFingerprint,
) -> Result<Vec<T>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing { kind, path });
    }
    let bytes = fs::read(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    let rows = read_csv_from_reader(bytes.as_slice())
        .map_err(|source| LoadError::Parse { path: path.clone(), source })?;
    fingerprint.add(label, &bytes);
    tracing::debug!(source = label, path = %path.display(), rows = rows.len(), "loaded source");
    Ok(rows)
}

fn single<T: DeserializeOwned>(
    config: &PipelineConfig,
    kind: SourceKind,
    fingerprint: &mut DatasetFingerprint,
) -> Result<Vec<T>, LoadError> {
    let path = config
        .source_files(kind)
        .into_iter()
        .next()
        .map(|(_, p)| p)
        .unwrap_or_default();
    read_source(kind, kind.name(), path, fingerprint)
}

fn team_files(
    config: &PipelineConfig,
    fingerprint: &mut DatasetFingerprint,
) -> Result<Vec<(String, Vec<RawTeamStat>)>, LoadError> {
    let mut out = Vec::new();
    for (competition, path) in config.source_files(SourceKind::TeamStats) {
        let competition = competition.unwrap_or_default().to_string();
        let label = format!("team_stats:{competition}");
        let rows = read_source(SourceKind::TeamStats, &label, path, fingerprint)?;
        out.push((competition, rows));
    }
    Ok(out)
}

/// Load the requested sources.
pub fn load_sources(config: &PipelineConfig, kinds: &BTreeSet<SourceKind>) -> RawSources {
    let mut sources = RawSources::default();

    for &kind in kinds {
        let fp = &mut sources.fingerprint;
        let outcome = match kind {
            SourceKind::BoxScores => single(config, kind, fp).map(|r| sources.box_scores = Some(r)),
            SourceKind::PlayerSeason => {
                single(config, kind, fp).map(|r| sources.player_season = Some(r))
            }
            SourceKind::Contracts => single(config, kind, fp).map(|r| sources.contracts = Some(r)),
            SourceKind::TeamStats => team_files(config, fp).map(|r| sources.team_stats = Some(r)),
        };
        if let Err(e) = outcome {
            tracing::warn!(source = %kind, error = %e, "source failed to load");
            sources.failures.insert(kind, e.to_string());
        }
    }
    sources
}

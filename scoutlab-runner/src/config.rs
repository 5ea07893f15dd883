//! Pipeline configuration, loaded from TOML.
//!
//! Every section has defaults, so an empty or missing file is a valid
//! configuration. Validation runs after parsing:
//! - `[materialization]` may only name registered models
//! - at least one team-stat source must be configured
//! - the top-scorer limit must be positive

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use scoutlab_core::sample::{PLAYOFFS, REGULAR_SEASON};

use crate::model::{Materialization, ModelId, SourceKind};

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown model in [materialization]: '{0}'")]
    UnknownModel(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pipeline: PipelineSection,
    pub sources: SourcesSection,
    pub top_scorers: TopScorersSection,
    /// Per-model materialization overrides, keyed by model name.
    pub materialization: BTreeMap<String, Materialization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Target season for dedup, join and classification.
    pub season: i32,
    pub input_dir: PathBuf,
    pub warehouse_dir: PathBuf,
    /// Also write a Parquet copy of every table.
    pub parquet: bool,
    /// Abort the remaining waves after the first failing model.
    pub fail_fast: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            season: 2024,
            input_dir: PathBuf::from("data/raw"),
            warehouse_dir: PathBuf::from("warehouse"),
            parquet: false,
            fail_fast: false,
        }
    }
}

/// Raw source file names, relative to `input_dir` unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesSection {
    pub box_scores: PathBuf,
    pub player_season: PathBuf,
    pub contracts: PathBuf,
    pub team_stats: Vec<TeamSource>,
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            box_scores: PathBuf::from("box_scores.csv"),
            player_season: PathBuf::from("player_season.csv"),
            contracts: PathBuf::from("contracts.csv"),
            team_stats: vec![
                TeamSource {
                    competition_type: REGULAR_SEASON.to_string(),
                    path: PathBuf::from("team_stats_regular.csv"),
                },
                TeamSource {
                    competition_type: PLAYOFFS.to_string(),
                    path: PathBuf::from("team_stats_playoffs.csv"),
                },
            ],
        }
    }
}

/// One team-stat file and the competition it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSource {
    pub competition_type: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopScorersSection {
    pub limit: usize,
    pub min_games: i64,
}

impl Default for TopScorersSection {
    fn default() -> Self {
        Self {
            limit: 100,
            min_games: 10,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self
            .materialization
            .keys()
            .find(|name| ModelId::from_name(name).is_none())
        {
            return Err(ConfigError::UnknownModel(name.clone()));
        }
        if self.sources.team_stats.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[sources.team_stats]] entry is required".into(),
            ));
        }
        if let Some(blank) = self
            .sources
            .team_stats
            .iter()
            .find(|t| t.competition_type.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "team source {} has an empty competition_type",
                blank.path.display()
            )));
        }
        if self.top_scorers.limit == 0 {
            return Err(ConfigError::Invalid("top_scorers.limit must be > 0".into()));
        }
        Ok(())
    }

    /// Resolve a source file against `input_dir`.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.pipeline.input_dir.join(file)
        }
    }

    /// Every file a source kind reads, with the competition type for team stats.
    pub fn source_files(&self, kind: SourceKind) -> Vec<(Option<&str>, PathBuf)> {
        match kind {
            SourceKind::BoxScores => vec![(None, self.resolve(&self.sources.box_scores))],
            SourceKind::PlayerSeason => vec![(None, self.resolve(&self.sources.player_season))],
            SourceKind::Contracts => vec![(None, self.resolve(&self.sources.contracts))],
            SourceKind::TeamStats => self
                .sources
                .team_stats
                .iter()
                .map(|t| (Some(t.competition_type.as_str()), self.resolve(&t.path)))
                .collect(),
        }
    }

    /// Effective materialization: the override if present, else the model default.
    pub fn materialization_for(&self, model: ModelId) -> Materialization {
        self.materialization
            .get(model.name())
            .copied()
            .unwrap_or_else(|| model.default_materialization())
    }

    /// Canonical JSON of the config, the input to run id derivation.
    ///
    /// Maps are ordered, so equal configs always produce equal JSON.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

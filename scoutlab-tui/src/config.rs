//! Dashboard configuration, resolved once at the binary edge.

use std::path::{Path, PathBuf};

use scoutlab_runner::{ConfigError, PipelineConfig};

/// Everything the dashboard needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Path of the pipeline TOML (may not exist; defaults apply).
    pub config_path: PathBuf,
    /// Pipeline settings, with the warehouse override applied.
    pub pipeline: PipelineConfig,
    /// Where UI preferences are saved.
    pub state_path: PathBuf,
    /// Log file; the terminal belongs to the UI.
    pub log_path: PathBuf,
    /// Directory for CSV and Markdown exports.
    pub export_dir: PathBuf,
}

impl DashboardConfig {
    /// Load the pipeline config and apply an optional warehouse override.
    pub fn resolve(config_path: &Path, warehouse: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut pipeline = PipelineConfig::load(config_path)?;
        if let Some(dir) = warehouse {
            pipeline.pipeline.warehouse_dir = dir;
        }

        let state_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scoutlab");
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scoutlab");
        let export_dir = pipeline.pipeline.warehouse_dir.join("exports");

        Ok(Self {
            config_path: config_path.to_path_buf(),
            pipeline,
            state_path: state_dir.join("dashboard.json"),
            log_path: log_dir.join("dashboard.log"),
            export_dir,
        })
    }

    pub fn warehouse_dir(&self) -> &Path {
        &self.pipeline.pipeline.warehouse_dir
    }

    /// Config rooted in `dir`, for tests and demos.
    pub fn in_dir(dir: &Path, pipeline: PipelineConfig) -> Self {
        Self {
            config_path: dir.join("scoutlab.toml"),
            export_dir: pipeline.pipeline.warehouse_dir.join("exports"),
            pipeline,
            state_path: dir.join("dashboard.json"),
            log_path: dir.join("dashboard.log"),
        }
    }
}

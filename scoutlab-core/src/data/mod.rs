//! Data ingestion, casting, tabular output and the file warehouse.

pub mod cast;
pub mod headers;
pub mod ingest;
pub mod raw;
pub mod table;
pub mod warehouse;

use std::path::PathBuf;

pub use headers::{canonical_header, canonical_headers};
pub use ingest::{read_csv, read_csv_from_reader};
pub use table::{Cell, CellKind, Field, Record};
pub use warehouse::{Layer, TableMeta, Warehouse};

/// Errors from reading sources and reading or writing warehouse tables.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("table not found: {layer}/{model}")]
    TableNotFound { layer: String, model: String },

    #[error("validation failed: {0}")]
    Validation(String),
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

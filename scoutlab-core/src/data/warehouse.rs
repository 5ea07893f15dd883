//! Local file warehouse.
//!
//! Layout: `{root}/{layer}/{model}.csv`, optional `{model}.parquet`, and a
//! `{model}.meta.json` sidecar.
//!
//! Features:
//! - Atomic writes (write to .tmp, rename into place)
//! - Metadata sidecar per table (rows, columns, content hash, run id)
//! - Typed read-back through serde, raw read-back as string records
//! - Stale table removal for models that are no longer persisted

use chrono::NaiveDateTime;
use csv::StringRecord;
use polars::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::table::{self, Record};
use super::DataError;

/// Refinement layer a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Bronze,
    Silver,
    Gold,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Bronze, Layer::Silver, Layer::Gold];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Bronze => "bronze",
            Layer::Silver => "silver",
            Layer::Gold => "gold",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Metadata sidecar for a materialized table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub model: String,
    pub layer: Layer,
    pub rows: usize,
    pub columns: Vec<String>,
    pub content_hash: String,
    pub run_id: String,
    pub parquet: bool,
    pub written_at: NaiveDateTime,
}

/// The warehouse root.
#[derive(Debug, Clone)]
pub struct Warehouse {
    root: PathBuf,
}

impl Warehouse {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn layer_dir(&self, layer: Layer) -> PathBuf {
        self.root.join(layer.as_str())
    }

    pub fn csv_path(&self, layer: Layer, model: &str) -> PathBuf {
        self.layer_dir(layer).join(format!("{model}.csv"))
    }

    pub fn parquet_path(&self, layer: Layer, model: &str) -> PathBuf {
        self.layer_dir(layer).join(format!("{model}.parquet"))
    }

    fn meta_path(&self, layer: Layer, model: &str) -> PathBuf {
        self.layer_dir(layer).join(format!("{model}.meta.json"))
    }

    /// Materialize rows as a table, replacing any previous output.
    ///
    /// Every file is staged under a temporary name before any of them is
    /// renamed into place. A failure while staging, or while renaming the
    /// CSV, leaves the previous table untouched.
    pub fn write_table<R: Record>(
        &self,
        layer: Layer,
        model: &str,
        rows: &[R],
        run_id: &str,
        parquet: bool,
    ) -> Result<TableMeta, DataError> {
        let dir = self.layer_dir(layer);
        fs::create_dir_all(&dir).map_err(|e| DataError::io(&dir, e))?;

        let csv_text = table::to_csv_string(rows)?;
        let content_hash = blake3::hash(csv_text.as_bytes()).to_hex().to_string();
        let meta = TableMeta {
            model: model.to_string(),
            layer,
            rows: rows.len(),
            columns: table::column_names::<R>()
                .into_iter()
                .map(str::to_string)
                .collect(),
            content_hash,
            run_id: run_id.to_string(),
            parquet,
            written_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_vec_pretty(&meta)
            .map_err(|e| DataError::Metadata(format!("meta serialization: {e}")))?;

        let mut staged = Staged::default();
        let csv_path = self.csv_path(layer, model);
        let parquet_path = self.parquet_path(layer, model);
        let result = (|| -> Result<(), DataError> {
            staged.write(&csv_path, csv_text.as_bytes())?;
            if parquet {
                let mut df = table::to_dataframe(rows)?;
                staged.write_parquet(&parquet_path, &mut df)?;
            }
            staged.write(&self.meta_path(layer, model), &meta_json)
        })();
        if let Err(e) = result {
            staged.discard();
            return Err(e);
        }

        // CSV first: until it is in place nothing of the old table changed
        staged.commit_first()?;
        if !parquet && parquet_path.exists() {
            fs::remove_file(&parquet_path).map_err(|e| DataError::io(&parquet_path, e))?;
        }
        staged.commit_rest()?;

        Ok(meta)
    }

    /// Read a table back as typed rows.
    pub fn read_table<T: DeserializeOwned>(
        &self,
        layer: Layer,
        model: &str,
    ) -> Result<Vec<T>, DataError> {
        let path = self.existing_csv(layer, model)?;
        let mut rdr = csv::Reader::from_path(&path)?;
        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            rows.push(result?);
        }
        Ok(rows)
    }

    /// Read a table as a header row plus raw string records.
    pub fn read_raw(
        &self,
        layer: Layer,
        model: &str,
    ) -> Result<(StringRecord, Vec<StringRecord>), DataError> {
        let path = self.existing_csv(layer, model)?;
        let mut rdr = csv::Reader::from_path(&path)?;
        let headers = rdr.headers()?.clone();
        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        Ok((headers, records))
    }

    /// Read the Parquet copy of a table.
    pub fn read_parquet(&self, layer: Layer, model: &str) -> Result<DataFrame, DataError> {
        let path = self.parquet_path(layer, model);
        if !path.exists() {
            return Err(DataError::TableNotFound {
                layer: layer.to_string(),
                model: model.to_string(),
            });
        }
        let file = File::open(&path).map_err(|e| DataError::io(&path, e))?;
        ParquetReader::new(file)
            .finish()
            .map_err(|e| DataError::Parquet(format!("read {}: {e}", path.display())))
    }

    pub fn meta(&self, layer: Layer, model: &str) -> Option<TableMeta> {
        let content = fs::read_to_string(self.meta_path(layer, model)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn has_table(&self, layer: Layer, model: &str) -> bool {
        self.csv_path(layer, model).exists()
    }

    /// Remove every file of a table. Returns whether anything was removed.
    pub fn remove_table(&self, layer: Layer, model: &str) -> Result<bool, DataError> {
        let mut removed = false;
        for path in [
            self.csv_path(layer, model),
            self.parquet_path(layer, model),
            self.meta_path(layer, model),
        ] {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| DataError::io(&path, e))?;
                removed = true;
            }
        }
        Ok(removed)
    }

    /// Metadata of every materialized table, by layer then model name.
    pub fn list_tables(&self) -> Vec<TableMeta> {
        let mut out = Vec::new();
        for layer in Layer::ALL {
            let Ok(entries) = fs::read_dir(self.layer_dir(layer)) else {
                continue;
            };
            let mut metas: Vec<TableMeta> = entries
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let name = e.file_name().to_string_lossy().to_string();
                    name.strip_suffix(".meta.json").map(str::to_string)
                })
                .filter_map(|model| self.meta(layer, &model))
                .collect();
            metas.sort_by(|a, b| a.model.cmp(&b.model));
            out.extend(metas);
        }
        out
    }

    fn existing_csv(&self, layer: Layer, model: &str) -> Result<PathBuf, DataError> {
        let path = self.csv_path(layer, model);
        if path.exists() {
            Ok(path)
        } else {
            Err(DataError::TableNotFound {
                layer: layer.to_string(),
                model: model.to_string(),
            })
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Temporary files waiting to be renamed over their destinations.
#[derive(Default)]
struct Staged {
    files: Vec<(PathBuf, PathBuf)>,
}

impl Staged {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<(), DataError> {
        let tmp = tmp_path(path);
        self.files.push((tmp.clone(), path.to_path_buf()));
        fs::write(&tmp, bytes).map_err(|e| DataError::io(&tmp, e))
    }

    fn write_parquet(&mut self, path: &Path, df: &mut DataFrame) -> Result<(), DataError> {
        let tmp = tmp_path(path);
        self.files.push((tmp.clone(), path.to_path_buf()));
        write_parquet(df, &tmp)
    }

    /// Rename the first staged file. On failure every staged file is removed.
    fn commit_first(&mut self) -> Result<(), DataError> {
        if self.files.is_empty() {
            return Ok(());
        }
        let (tmp, path) = self.files.remove(0);
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            self.discard();
            return Err(DataError::io(&path, e));
        }
        Ok(())
    }

    fn commit_rest(mut self) -> Result<(), DataError> {
        while !self.files.is_empty() {
            self.commit_first()?;
        }
        Ok(())
    }

    fn discard(&mut self) {
        for (tmp, _) in self.files.drain(..) {
            let _ = fs::remove_file(&tmp);
        }
    }
}

fn rename_into_place(tmp: &Path, path: &Path) -> Result<(), DataError> {
    fs::rename(tmp, path).map_err(|e| {
        let _ = fs::remove_file(tmp);
        DataError::io(path, e)
    })
}

/// Write bytes to `path` via a temporary file and an atomic rename.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes).map_err(|e| DataError::io(&tmp, e))?;
    rename_into_place(&tmp, path)
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), DataError> {
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    ParquetWriter::new(file)
        .finish(df)
        .map_err(|e| DataError::Parquet(format!("write {}: {e}", path.display())))?;
    Ok(())
}

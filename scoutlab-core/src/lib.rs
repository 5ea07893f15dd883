//! ScoutLab Core: domain types, layered transforms, classification, warehouse.
//!
//! This crate holds every model computation of the pipeline as plain
//! functions over typed rows:
//! - Domain types (season lines, contracts, team lines, ranked players)
//! - Raw source reading with header canonicalization and safe casts
//! - Bronze, silver and gold transforms
//! - Dedup, fuzzy contract join, contract status, percentiles, G-League categories
//! - File warehouse with atomic CSV/Parquet materialization
//! - Player profile analytics, target search and a deterministic sample dataset

pub mod bronze;
pub mod classify;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod gold;
pub mod profile;
pub mod sample;
pub mod silver;
pub mod targets;

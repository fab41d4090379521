//! # Monitor Rust Backend
//!
//! Comparative histogram engine for the experiment-monitoring dashboard.
//!
//! Given the aggregated `(value, count)` rows fetched for one column of a
//! dataset in several workflow runs, the engine computes a single bin scheme
//! shared by every run, redistributes each run's counts into it, and produces
//! a layered Vega-Lite description with per-bin tooltips that list every run
//! side by side.
//!
//! ## Architecture
//!
//! - [`api`]: Data types exchanged with the fetch layer and the renderer
//! - [`parsing`]: Grouped-count records and comparison payloads → raw rows
//! - [`algorithms`]: Column classification, shared binning, redistribution
//! - [`services`]: Tooltips, plot descriptions, display status, the overlay pipeline
//! - [`config`]: TOML engine configuration
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use monitor_rust::api::{ColorMapping, RawRow, WorkflowId, WorkflowRawSet};
//! use monitor_rust::config::EngineConfig;
//! use monitor_rust::services::OverlayEngine;
//!
//! let raw = WorkflowRawSet::new()
//!     .with("run-1", vec![RawRow::new(0.0, 4.0), RawRow::new(100.0, 1.0)])
//!     .with("run-2", vec![RawRow::new(55.0, 2.0)]);
//! let workflows = vec![WorkflowId::from("run-1"), WorkflowId::from("run-2")];
//! let colors = |ids: &[WorkflowId]| ColorMapping {
//!     domain: ids.iter().map(|id| id.to_string()).collect(),
//!     range: vec!["#3f51b5".to_string(); ids.len()],
//! };
//!
//! let engine = OverlayEngine::new(EngineConfig::default()).unwrap();
//! let overlay = engine.overlay("metrics.csv", "loss", &workflows, &raw, &colors);
//!
//! assert_eq!(overlay.histogram.plan.bin_count(), 10);
//! assert_eq!(overlay.spec["layer"].as_array().unwrap().len(), 2);
//! ```

pub mod algorithms;
pub mod api;
pub mod config;
pub mod error;
pub mod parsing;
pub mod services;

pub use error::{EngineError, EngineResult, ErrorContext};

//! Binning and aggregation algorithms.
//!
//! This module turns the raw per-workflow rows of one column into a binned,
//! cross-workflow-aligned dataset.
//!
//! # Components
//!
//! - [`classify`]: Numeric vs. categorical decision and the resulting [`ColumnPlan`](crate::api::ColumnPlan)
//! - [`binning`]: Shared bin boundaries over the pooled range of the compared workflows
//! - [`redistribute`]: Per-workflow counts re-summed into the shared bins
//!
//! # Example
//!
//! ```
//! use monitor_rust::algorithms::{plan_column, redistribute};
//! use monitor_rust::api::{RawRow, WorkflowId, WorkflowRawSet};
//! use std::num::NonZeroUsize;
//!
//! let raw = WorkflowRawSet::new()
//!     .with("run-1", vec![RawRow::new(0.0, 2.0)])
//!     .with("run-2", vec![RawRow::new(100.0, 3.0)]);
//! let workflows = vec![WorkflowId::from("run-1"), WorkflowId::from("run-2")];
//!
//! let plan = plan_column(&raw, &workflows, NonZeroUsize::new(10).unwrap(), 2);
//! let binned = redistribute(&plan, &raw, &workflows, true);
//! assert_eq!(binned.rows.len(), 20);
//! ```

pub mod binning;
pub mod classify;
pub mod redistribute;

pub use binning::{
    bin_index, format_bin_label, plan_bins, pooled_range, DEFAULT_BIN_COUNT,
    DEFAULT_LABEL_PRECISION,
};
pub use classify::{category_labels, classify_column, classify_values, plan_column, ColumnKind};
pub use redistribute::{
    redistribute, redistribute_numeric, tally_categories, zero_fill, CategoryCounts,
    NumericTally, Redistribution,
};

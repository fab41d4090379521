//! Chart-facing Data Transfer Objects (DTOs).
//!
//! This module defines the data model shared by every stage of the engine:
//! the raw aggregated rows handed over by the fetch layer, the shared bin
//! scheme, and the binned rows consumed by the chart renderer.
//!
//! ## Design Guidelines
//!
//! 1. **Immutable inputs**: raw rows are never mutated once received
//! 2. **Deterministic ordering**: ordered maps only, so identical inputs
//!    always serialize to identical bytes
//! 3. **camelCase on the wire**: row fields match the renderer's field names

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =========================================================
// Identifiers
// =========================================================

/// Strongly-typed identifier for a compared workflow run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkflowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WorkflowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =========================================================
// Raw input
// =========================================================

/// Observed value of a column: either a number or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Numeric value, if this is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, RawValue::Number(_))
    }

    /// Label used when the column is treated as categorical.
    pub fn label(&self) -> String {
        match self {
            RawValue::Number(v) => v.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One aggregated observation: how many times `value` occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub value: RawValue,
    pub count: f64,
}

impl RawRow {
    pub fn new(value: impl Into<RawValue>, count: f64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }

    /// A row whose count cannot be aggregated.
    pub fn has_valid_count(&self) -> bool {
        self.count.is_finite()
    }
}

/// Rows fetched for one (dataset, column), keyed by workflow.
///
/// Each workflow's rows are replaced wholesale when new data arrives.
/// A workflow without an entry is treated as having zero counts everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowRawSet {
    rows: BTreeMap<WorkflowId, Vec<RawRow>>,
}

impl WorkflowRawSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) the rows of one workflow.
    pub fn insert(&mut self, workflow: impl Into<WorkflowId>, rows: Vec<RawRow>) {
        self.rows.insert(workflow.into(), rows);
    }

    /// Builder-style variant of [`WorkflowRawSet::insert`].
    pub fn with(mut self, workflow: impl Into<WorkflowId>, rows: Vec<RawRow>) -> Self {
        self.insert(workflow, rows);
        self
    }

    /// Rows for a workflow; empty when it has not resolved yet.
    pub fn rows_for(&self, workflow: &WorkflowId) -> &[RawRow] {
        self.rows.get(workflow).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, workflow: &WorkflowId) -> bool {
        self.rows.contains_key(workflow)
    }

    /// Every row of the compared `workflows`, ignoring any other workflow
    /// the set happens to hold.
    pub fn selected<'a>(&'a self, workflows: &'a [WorkflowId]) -> impl Iterator<Item = &'a RawRow> {
        workflows.iter().flat_map(move |wid| self.rows_for(wid))
    }
}

/// Where a workflow's fetch for the compared column currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    /// Not requested yet.
    #[default]
    Pending,
    Loading,
    Failed(String),
    Ready(Vec<RawRow>),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    /// Rows of a resolved fetch; `None` while pending, loading or failed.
    pub fn rows(&self) -> Option<&[RawRow]> {
        match self {
            FetchState::Ready(rows) => Some(rows.as_slice()),
            _ => None,
        }
    }
}

// =========================================================
// Binning
// =========================================================

/// One numeric bucket `[start, end)` of the shared bin scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericBin {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

/// Numeric bins shared by every compared workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinPlan {
    pub bins: Vec<NumericBin>,
    /// Width of each bin; zero for a degenerate (single-point) range.
    pub width: f64,
}

impl BinPlan {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Index of the bin a value falls into, clamped to the plan's bounds.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        match self.bins.len() {
            0 => None,
            1 => Some(0),
            n => Some(crate::algorithms::binning::bin_index(
                value,
                self.bins[0].start,
                self.width,
                n,
            )),
        }
    }
}

/// How a column is binned, decided once and threaded through every stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnPlan {
    Numeric(BinPlan),
    Categorical { labels: Vec<String> },
}

impl ColumnPlan {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnPlan::Numeric(_))
    }

    /// Labels of every bin, in axis order.
    pub fn bin_labels(&self) -> Vec<String> {
        match self {
            ColumnPlan::Numeric(plan) => plan.bins.iter().map(|b| b.label.clone()).collect(),
            ColumnPlan::Categorical { labels } => labels.clone(),
        }
    }

    pub fn bin_count(&self) -> usize {
        match self {
            ColumnPlan::Numeric(plan) => plan.len(),
            ColumnPlan::Categorical { labels } => labels.len(),
        }
    }
}

// =========================================================
// Output
// =========================================================

/// Count of one workflow in one bin, as consumed by the chart layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinnedRow {
    pub bin_label: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x_start: Option<f64>,
    pub count: f64,
    pub workflow_id: WorkflowId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tooltip_all: Option<String>,
}

/// Colors for a set of workflows, `domain[i]` painted with `range[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorMapping {
    pub domain: Vec<String>,
    pub range: Vec<String>,
}

impl ColorMapping {
    pub fn color_for(&self, workflow: &WorkflowId) -> Option<&str> {
        self.domain
            .iter()
            .position(|id| id == workflow.as_str())
            .and_then(|idx| self.range.get(idx))
            .map(String::as_str)
    }
}

/// A named run parameter shown in the rich tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParam {
    pub name: String,
    pub value: String,
}

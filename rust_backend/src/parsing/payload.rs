use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::api::{FetchState, RunParam, WorkflowId};
use crate::error::{EngineError, EngineResult, ErrorContext};
use crate::parsing::rows::rows_from_records;

/// Fetch status of a workflow as reported by the data layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadState {
    Pending,
    Loading,
    Failed,
    #[default]
    Ready,
}

/// One compared workflow with the records fetched for the column.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPayload {
    pub workflow_id: WorkflowId,
    #[serde(default)]
    pub state: PayloadState,
    #[serde(default)]
    pub error: Option<String>,
    /// Grouped count records, e.g. `{"loss": 0.3, "count_loss": 12}`
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub params: Vec<RunParam>,
}

/// Fetch states of a payload plus the records dropped while extracting rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PayloadStates {
    pub states: Vec<(WorkflowId, FetchState)>,
    pub skipped_records: usize,
}

/// Everything needed to build one overlay histogram.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPayload {
    #[serde(default)]
    pub asset_name: String,
    pub column_name: String,
    /// Workflows in comparison selection order.
    pub workflows: Vec<WorkflowPayload>,
}

impl ComparisonPayload {
    /// Per-workflow fetch states, with records turned into raw rows.
    pub fn fetch_states(&self) -> PayloadStates {
        let mut skipped_records = 0;
        let states = self
            .workflows
            .iter()
            .map(|w| {
                let state = match w.state {
                    PayloadState::Pending => FetchState::Pending,
                    PayloadState::Loading => FetchState::Loading,
                    PayloadState::Failed => FetchState::Failed(
                        w.error.clone().unwrap_or_else(|| "Error fetching the data.".to_string()),
                    ),
                    PayloadState::Ready => {
                        let extracted = rows_from_records(&w.data, &self.column_name);
                        skipped_records += extracted.skipped;
                        FetchState::Ready(extracted.rows)
                    }
                };
                (w.workflow_id.clone(), state)
            })
            .collect();

        PayloadStates {
            states,
            skipped_records,
        }
    }

    /// Reject documents the engine cannot attribute unambiguously.
    fn validate(&self) -> EngineResult<()> {
        if self.column_name.trim().is_empty() {
            return Err(EngineError::parse_with_context(
                "Comparison payload names no column",
                ErrorContext::new("parse_payload").with_details("columnName"),
            ));
        }

        let mut seen = BTreeSet::new();
        for (idx, w) in self.workflows.iter().enumerate() {
            let path = format!("workflows[{}].workflowId", idx);
            if w.workflow_id.as_str().is_empty() {
                return Err(EngineError::parse_with_context(
                    "Workflow without an identifier",
                    ErrorContext::new("parse_payload")
                        .with_column(&self.column_name)
                        .with_details(path),
                ));
            }
            if !seen.insert(&w.workflow_id) {
                return Err(EngineError::parse_with_context(
                    "Workflow listed more than once",
                    ErrorContext::new("parse_payload")
                        .with_column(&self.column_name)
                        .with_workflow(&w.workflow_id)
                        .with_details(path),
                ));
            }
        }

        Ok(())
    }

    /// Run parameters keyed by workflow.
    pub fn run_params(&self) -> BTreeMap<WorkflowId, Vec<RunParam>> {
        self.workflows
            .iter()
            .map(|w| (w.workflow_id.clone(), w.params.clone()))
            .collect()
    }
}

/// Parse a comparison payload from JSON text.
///
/// Structural problems are reported with the JSON path where they occur, as
/// are empty or repeated workflow ids. Individual records are not validated here; malformed ones are dropped
/// later by [`rows_from_records`].
pub fn parse_comparison_payload(json_str: &str) -> EngineResult<ComparisonPayload> {
    let deserializer = &mut serde_json::Deserializer::from_str(json_str);

    let payload: ComparisonPayload =
        serde_path_to_error::deserialize(deserializer).map_err(|e| {
            let path = e.path().to_string();
            EngineError::parse_with_context(
                format!("Invalid comparison payload: {}", e.inner()),
                ErrorContext::new("parse_payload").with_details(path),
            )
        })?;

    payload.validate()?;
    Ok(payload)
}

/// Read and parse a comparison payload file.
pub fn load_comparison_payload(path: &Path) -> Result<ComparisonPayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file: {}", path.display()))?;

    parse_comparison_payload(&content)
        .with_context(|| format!("Failed to parse payload file: {}", path.display()))
}

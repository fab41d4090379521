//! What the comparison card should show while per-workflow fetches resolve.

use crate::api::{FetchState, WorkflowId, WorkflowRawSet};

/// Display state of an overlay histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStatus {
    /// At least one workflow is still fetching.
    Loading,
    /// Nothing to plot across any workflow.
    NoData,
    /// Some data is plotted but at least one workflow failed to fetch.
    FetchError,
    Ready,
}

impl ComparisonStatus {
    /// Decide the status from the per-workflow states and whether the
    /// binned output holds any rows. An empty chart reports `NoData` even
    /// when a fetch failed.
    pub fn resolve<'a>(states: impl IntoIterator<Item = &'a FetchState>, has_data: bool) -> Self {
        let mut any_loading = false;
        let mut any_error = false;

        for state in states {
            any_loading |= state.is_loading();
            any_error |= state.is_failed();
        }

        if any_loading {
            ComparisonStatus::Loading
        } else if !has_data {
            ComparisonStatus::NoData
        } else if any_error {
            ComparisonStatus::FetchError
        } else {
            ComparisonStatus::Ready
        }
    }

    /// Message shown in place of (or over) the chart, if any.
    pub fn info_message(&self) -> Option<&'static str> {
        match self {
            ComparisonStatus::Loading | ComparisonStatus::Ready => None,
            ComparisonStatus::NoData => Some("No data available."),
            ComparisonStatus::FetchError => Some("Error fetching the data."),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ComparisonStatus::Ready)
    }
}

/// Collect the rows of every resolved workflow.
///
/// Pending, loading and failed workflows are left out, which the engine
/// treats as zero counts everywhere.
pub fn raw_set_from_states(states: &[(WorkflowId, FetchState)]) -> WorkflowRawSet {
    let mut raw = WorkflowRawSet::new();
    for (workflow, state) in states {
        if let Some(rows) = state.rows() {
            raw.insert(workflow.clone(), rows.to_vec());
        }
    }
    raw
}

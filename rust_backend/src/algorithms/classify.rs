//! Column classification: numeric columns are binned, everything else is
//! grouped by label.

use crate::algorithms::binning::plan_bins;
use crate::api::{ColumnPlan, RawValue, WorkflowId, WorkflowRawSet};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

/// Kind of a compared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// A column is numeric as soon as any workflow reports a number for it.
pub fn classify_values<'a>(values: impl IntoIterator<Item = &'a RawValue>) -> ColumnKind {
    if values.into_iter().any(RawValue::is_number) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Classify a column from the rows of every compared workflow.
pub fn classify_column(raw: &WorkflowRawSet, workflows: &[WorkflowId]) -> ColumnKind {
    classify_values(raw.selected(workflows).map(|row| &row.value))
}

/// Distinct category labels across the compared workflows, sorted ascending.
///
/// Rows with an unusable count do not introduce a label.
pub fn category_labels(raw: &WorkflowRawSet, workflows: &[WorkflowId]) -> Vec<String> {
    raw.selected(workflows)
        .filter(|row| row.has_valid_count())
        .map(|row| row.value.label())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Decide how the column is binned.
///
/// Numeric columns get one bin scheme over the pooled range of the compared
/// workflows; categorical columns get the union of their labels. Rows of
/// workflows outside `workflows` never move the bins.
pub fn plan_column(
    raw: &WorkflowRawSet,
    workflows: &[WorkflowId],
    bin_count: NonZeroUsize,
    precision: usize,
) -> ColumnPlan {
    match classify_column(raw, workflows) {
        ColumnKind::Numeric => {
            let values = raw
                .selected(workflows)
                .filter(|row| row.has_valid_count())
                .filter_map(|row| row.value.as_number());
            ColumnPlan::Numeric(plan_bins(values, bin_count, precision))
        }
        ColumnKind::Categorical => ColumnPlan::Categorical {
            labels: category_labels(raw, workflows),
        },
    }
}

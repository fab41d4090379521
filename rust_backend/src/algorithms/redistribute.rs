//! Redistribution of each workflow's raw counts into the shared bin scheme.
//!
//! Malformed rows are skipped one at a time; a bad row never aborts the
//! aggregation of the rest of the dataset.

use crate::api::{BinPlan, BinnedRow, ColumnPlan, RawRow, WorkflowId, WorkflowRawSet};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Per-bin totals of one workflow for a numeric column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericTally {
    /// One total per bin of the plan, in bin order.
    pub totals: Vec<f64>,
    /// Rows that could not be placed in any bin.
    pub skipped: usize,
}

/// Sum one workflow's counts into the bins of `plan`.
pub fn redistribute_numeric(plan: &BinPlan, rows: &[RawRow]) -> NumericTally {
    let mut tally = NumericTally {
        totals: vec![0.0; plan.len()],
        skipped: 0,
    };

    for row in rows {
        let placed = match (row.value.as_number(), row.has_valid_count()) {
            (Some(value), true) => plan.index_of(value),
            _ => None,
        };

        match placed {
            Some(idx) => tally.totals[idx] += row.count,
            None => tally.skipped += 1,
        }
    }

    tally
}

/// Sparse per-label counts of one workflow; absent labels count as zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryCounts {
    counts: BTreeMap<String, f64>,
    /// Rows with an unusable count.
    pub skipped: usize,
}

impl CategoryCounts {
    /// Count for a label, zero when the workflow never reported it.
    pub fn get(&self, label: &str) -> f64 {
        self.counts.get(label).copied().unwrap_or(0.0)
    }

    /// Labels this workflow actually reported.
    pub fn covered_labels(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

/// Group one workflow's rows by exact label, summing duplicate labels.
pub fn tally_categories(rows: &[RawRow]) -> CategoryCounts {
    let mut tally = CategoryCounts::default();

    for row in rows {
        if !row.has_valid_count() {
            tally.skipped += 1;
            continue;
        }
        *tally.counts.entry(row.value.label()).or_insert(0.0) += row.count;
    }

    tally
}

/// Dense `(label, count)` pairs over `labels`, filling gaps with zero.
pub fn zero_fill(counts: &CategoryCounts, labels: &[String]) -> Vec<(String, f64)> {
    labels
        .iter()
        .map(|label| (label.clone(), counts.get(label)))
        .collect()
}

/// Binned rows for every compared workflow plus how many rows were dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Redistribution {
    pub rows: Vec<BinnedRow>,
    pub skipped_rows: usize,
}

/// Redistribute every workflow's rows into the shared plan.
///
/// Rows are emitted workflow by workflow, in `workflows` order, and bin by
/// bin within a workflow. Workflows missing from `raw` get zero counts.
/// For categorical columns, `fill_categories` decides whether labels a
/// workflow never reported are emitted with a zero count or omitted.
pub fn redistribute(
    plan: &ColumnPlan,
    raw: &WorkflowRawSet,
    workflows: &[WorkflowId],
    fill_categories: bool,
) -> Redistribution {
    let mut out = Redistribution::default();

    for workflow in workflows {
        let rows = raw.rows_for(workflow);
        if !raw.contains(workflow) {
            debug!("Workflow {} has no rows yet, counting zeros", workflow);
        }

        let skipped = match plan {
            ColumnPlan::Numeric(bins) => {
                if bins.is_empty() {
                    continue;
                }
                let tally = redistribute_numeric(bins, rows);
                out.rows.extend(bins.bins.iter().zip(&tally.totals).map(|(bin, total)| {
                    BinnedRow {
                        bin_label: bin.label.clone(),
                        x_start: Some(bin.start),
                        count: *total,
                        workflow_id: workflow.clone(),
                        tooltip_all: None,
                    }
                }));
                tally.skipped
            }
            ColumnPlan::Categorical { labels } => {
                let tally = tally_categories(rows);
                let pairs = if fill_categories {
                    zero_fill(&tally, labels)
                } else {
                    tally
                        .covered_labels()
                        .map(|label| (label.to_string(), tally.get(label)))
                        .collect()
                };
                out.rows.extend(pairs.into_iter().map(|(label, count)| BinnedRow {
                    bin_label: label,
                    x_start: None,
                    count,
                    workflow_id: workflow.clone(),
                    tooltip_all: None,
                }));
                tally.skipped
            }
        };

        if skipped > 0 {
            if skipped == rows.len() {
                warn!("All {} rows of workflow {} were malformed", skipped, workflow);
            } else {
                debug!("Skipped {} malformed rows of workflow {}", skipped, workflow);
            }
        }
        out.skipped_rows += skipped;
    }

    out
}

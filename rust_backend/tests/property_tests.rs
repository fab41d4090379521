//! Property-based tests for the binning invariants.

use monitor_rust::algorithms::{bin_index, plan_bins, plan_column, redistribute};
use monitor_rust::api::{ColumnPlan, RawRow, WorkflowId, WorkflowRawSet};
use proptest::prelude::*;
use std::num::NonZeroUsize;

fn workflow_rows() -> impl Strategy<Value = Vec<(f64, u32)>> {
    prop::collection::vec((-1e6..1e6f64, 0u32..1000), 0..20)
}

/// Any finite float, subnormals and extremes included.
fn any_finite() -> impl Strategy<Value = f64> {
    prop::num::f64::POSITIVE
        | prop::num::f64::NEGATIVE
        | prop::num::f64::NORMAL
        | prop::num::f64::SUBNORMAL
        | prop::num::f64::ZERO
}

fn raw_set(sets: &[Vec<(f64, u32)>]) -> (WorkflowRawSet, Vec<WorkflowId>) {
    let mut raw = WorkflowRawSet::new();
    let mut workflows = Vec::new();
    for (i, rows) in sets.iter().enumerate() {
        let wid = WorkflowId::new(format!("run-{}", i));
        raw.insert(
            wid.clone(),
            rows.iter().map(|(v, c)| RawRow::new(*v, *c as f64)).collect(),
        );
        workflows.push(wid);
    }
    (raw, workflows)
}

proptest! {
    #[test]
    fn prop_index_always_in_range(
        value in -1e9..1e9f64,
        first in -1e6..1e6f64,
        width in 1e-6..1e6f64,
        n in 1usize..50,
    ) {
        prop_assert!(bin_index(value, first, width, n) < n);
    }

    #[test]
    fn prop_bin_count_fixed_unless_degenerate(
        values in prop::collection::vec(-1e6..1e6f64, 1..50),
        n in 1usize..30,
    ) {
        let plan = plan_bins(values.clone(), NonZeroUsize::new(n).unwrap(), 2);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            prop_assert_eq!(plan.len(), 1);
        } else {
            prop_assert_eq!(plan.len(), n);
        }
    }

    #[test]
    fn prop_counts_conserved(sets in prop::collection::vec(workflow_rows(), 1..5)) {
        let (raw, workflows) = raw_set(&sets);
        let plan = plan_column(&raw, &workflows, NonZeroUsize::new(10).unwrap(), 2);
        let out = redistribute(&plan, &raw, &workflows, true);

        for (wid, rows) in workflows.iter().zip(&sets) {
            let expected: f64 = rows.iter().map(|(_, c)| *c as f64).sum();
            let binned: f64 = out
                .rows
                .iter()
                .filter(|r| &r.workflow_id == wid)
                .map(|r| r.count)
                .sum();
            prop_assert_eq!(binned, expected);
        }
    }

    #[test]
    fn prop_one_bin_scheme_for_all_workflows(sets in prop::collection::vec(workflow_rows(), 1..5)) {
        let (raw, workflows) = raw_set(&sets);
        let plan = plan_column(&raw, &workflows, NonZeroUsize::new(10).unwrap(), 2);
        let out = redistribute(&plan, &raw, &workflows, true);

        if let ColumnPlan::Numeric(bins) = &plan {
            for wid in &workflows {
                let starts: Vec<Option<f64>> = out
                    .rows
                    .iter()
                    .filter(|r| &r.workflow_id == wid)
                    .map(|r| r.x_start)
                    .collect();
                let expected: Vec<Option<f64>> = bins.bins.iter().map(|b| Some(b.start)).collect();
                prop_assert_eq!(starts, expected);
            }
        }
    }

    #[test]
    fn prop_redistribution_is_deterministic(sets in prop::collection::vec(workflow_rows(), 1..4)) {
        let (raw, workflows) = raw_set(&sets);
        let plan = plan_column(&raw, &workflows, NonZeroUsize::new(10).unwrap(), 2);

        prop_assert_eq!(
            redistribute(&plan, &raw, &workflows, true),
            redistribute(&plan, &raw, &workflows, true)
        );
    }

    #[test]
    fn prop_bins_stay_finite_over_any_range(
        values in prop::collection::vec(any_finite(), 1..20),
        n in 1usize..30,
    ) {
        let plan = plan_bins(values.clone(), NonZeroUsize::new(n).unwrap(), 2);

        for bin in &plan.bins {
            prop_assert!(bin.start.is_finite() && bin.end.is_finite(), "{:?}", bin);
            prop_assert!(!bin.label.contains("NaN"), "{}", bin.label);
        }
        for value in &values {
            let idx = plan.index_of(*value);
            prop_assert!(matches!(idx, Some(i) if i < plan.len()), "{:?} for {}", idx, value);
        }
    }
}

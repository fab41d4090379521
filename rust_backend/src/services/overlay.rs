//! Overlay histogram: the whole pipeline from raw per-workflow rows to a
//! chart-ready description.
//!
//! raw rows → classify → plan bins → redistribute → tooltips → plot description

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use crate::algorithms::{plan_column, redistribute};
use crate::api::{BinnedRow, ColorMapping, ColumnPlan, FetchState, RunParam, WorkflowId, WorkflowRawSet};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::parsing::ComparisonPayload;
use crate::services::chart_spec::{build_overlay_spec, overlay_title, AxisSort, ColorScale};
use crate::services::status::{raw_set_from_states, ComparisonStatus};
use crate::services::tooltip::{
    assemble_tooltips, attach_tooltips, counts_by_bin, render_tooltip_html, TooltipContext,
    TooltipTable,
};

/// Binned, cross-workflow-aligned data for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedHistogram {
    pub plan: ColumnPlan,
    /// Workflow-major rows, each carrying its bin's tooltip summary.
    pub rows: Vec<BinnedRow>,
    pub tooltips: TooltipTable,
    pub skipped_rows: usize,
}

impl BinnedHistogram {
    pub fn is_numeric(&self) -> bool {
        self.plan.is_numeric()
    }

    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Count of each workflow in one bin.
    pub fn counts_in(&self, bin_label: &str) -> BTreeMap<WorkflowId, f64> {
        counts_by_bin(&self.rows).remove(bin_label).unwrap_or_default()
    }
}

/// Overlay histogram ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayHistogram {
    pub title: String,
    pub column: String,
    /// Compared workflows, deduplicated, in selection order.
    pub workflows: Vec<WorkflowId>,
    pub histogram: BinnedHistogram,
    pub spec: Value,
}

/// Overlay histogram plus what the card should display around it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub status: ComparisonStatus,
    pub overlay: OverlayHistogram,
    /// Run parameters shown in the rich tooltip, keyed by workflow.
    pub params: BTreeMap<WorkflowId, Vec<RunParam>>,
}

/// Drop repeated workflow ids, keeping the first occurrence.
fn selection_order(workflows: &[WorkflowId]) -> Vec<WorkflowId> {
    let mut seen = BTreeSet::new();
    workflows
        .iter()
        .filter(|wid| seen.insert(*wid))
        .cloned()
        .collect()
}

/// Bin one column across every compared workflow.
pub fn compute_overlay_histogram(
    workflows: &[WorkflowId],
    raw: &WorkflowRawSet,
    bin_count: NonZeroUsize,
    config: &EngineConfig,
) -> BinnedHistogram {
    let workflows = selection_order(workflows);
    let plan = plan_column(raw, &workflows, bin_count, config.label_precision);
    let redistribution = redistribute(&plan, raw, &workflows, config.categorical_zero_fill);

    let mut rows = redistribution.rows;
    let tooltips = assemble_tooltips(
        &rows,
        &plan.bin_labels(),
        &workflows,
        &config.tooltip_line_separator,
    );
    attach_tooltips(&mut rows, &tooltips);

    BinnedHistogram {
        plan,
        rows,
        tooltips,
        skipped_rows: redistribution.skipped_rows,
    }
}

/// Builds overlay histograms with a validated configuration.
#[derive(Debug, Clone)]
pub struct OverlayEngine {
    config: EngineConfig,
    bin_count: NonZeroUsize,
}

impl OverlayEngine {
    /// Validate the configuration up front; nothing is processed with a
    /// configuration the engine cannot honor.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let bin_count = config.bin_count()?;
        Ok(Self { config, bin_count })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bin the rows of every compared workflow.
    pub fn bin(&self, workflows: &[WorkflowId], raw: &WorkflowRawSet) -> BinnedHistogram {
        compute_overlay_histogram(workflows, raw, self.bin_count, &self.config)
    }

    /// Bin the rows and build the layered plot description.
    pub fn overlay(
        &self,
        asset_name: &str,
        column: &str,
        workflows: &[WorkflowId],
        raw: &WorkflowRawSet,
        colors: &dyn ColorScale,
    ) -> OverlayHistogram {
        let workflows = selection_order(workflows);
        let histogram = self.bin(&workflows, raw);
        let spec = build_overlay_spec(
            &histogram.rows,
            column,
            &workflows,
            colors,
            AxisSort::for_column(histogram.is_numeric()),
            &self.config,
        );

        log::info!(
            "Built overlay for {} across {} workflows: {} bins, {} rows, {} skipped",
            column,
            workflows.len(),
            histogram.plan.bin_count(),
            histogram.rows.len(),
            histogram.skipped_rows
        );

        OverlayHistogram {
            title: overlay_title(asset_name, column),
            column: column.to_string(),
            workflows,
            histogram,
            spec,
        }
    }

    /// Build the overlay from whatever subset of workflows has resolved.
    pub fn overlay_from_states(
        &self,
        asset_name: &str,
        column: &str,
        states: &[(WorkflowId, FetchState)],
        colors: &dyn ColorScale,
    ) -> OverlayView {
        let workflows: Vec<WorkflowId> = states.iter().map(|(wid, _)| wid.clone()).collect();
        let raw = raw_set_from_states(states);
        let overlay = self.overlay(asset_name, column, &workflows, &raw, colors);
        let status = ComparisonStatus::resolve(
            states.iter().map(|(_, state)| state),
            overlay.histogram.has_data(),
        );

        OverlayView {
            status,
            overlay,
            params: BTreeMap::new(),
        }
    }

    /// Build the overlay described by a parsed comparison payload.
    ///
    /// Records dropped during row extraction count towards `skipped_rows`.
    pub fn overlay_from_payload(
        &self,
        payload: &ComparisonPayload,
        colors: &dyn ColorScale,
    ) -> OverlayView {
        let extracted = payload.fetch_states();
        let mut view = self.overlay_from_states(
            &payload.asset_name,
            &payload.column_name,
            &extracted.states,
            colors,
        );

        view.overlay.histogram.skipped_rows += extracted.skipped_records;
        view.params = payload.run_params();
        view
    }

    /// Rich HTML tooltip for a hovered bin of `view`.
    pub fn tooltip_html(&self, view: &OverlayView, bin_label: &str, colors: &ColorMapping) -> String {
        let overlay = &view.overlay;
        let ctx = TooltipContext {
            column: &overlay.column,
            workflows: &overlay.workflows,
            colors,
            params: &view.params,
            fallback_color: &self.config.fallback_color,
        };
        render_tooltip_html(&ctx, bin_label, &overlay.histogram.counts_in(bin_label))
    }
}

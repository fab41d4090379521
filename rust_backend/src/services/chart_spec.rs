//! Declarative (Vega-Lite) plot description for the overlay histogram.

use serde_json::{json, Value};

use crate::api::{BinnedRow, ColorMapping, WorkflowId};
use crate::config::EngineConfig;

/// Assigns colors to workflows. Supplied by the caller; the engine only
/// consumes the mapping it returns.
pub trait ColorScale {
    fn scale(&self, workflow_ids: &[WorkflowId]) -> ColorMapping;
}

impl<F> ColorScale for F
where
    F: Fn(&[WorkflowId]) -> ColorMapping,
{
    fn scale(&self, workflow_ids: &[WorkflowId]) -> ColorMapping {
        self(workflow_ids)
    }
}

/// Order of the bins along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSort {
    /// Numeric bins, ordered by their start rather than by label text.
    ByBinStart,
    /// Categorical labels, alphabetically.
    Ascending,
}

impl AxisSort {
    pub fn for_column(is_numeric: bool) -> Self {
        if is_numeric {
            AxisSort::ByBinStart
        } else {
            AxisSort::Ascending
        }
    }

    fn to_json(self) -> Value {
        match self {
            AxisSort::ByBinStart => json!({ "field": "xStart", "op": "min" }),
            AxisSort::Ascending => json!("ascending"),
        }
    }
}

/// One bar layer per workflow, each filtered to that workflow's rows.
fn workflow_layers(workflows: &[WorkflowId], colors: &ColorMapping, opacity: f64) -> Vec<Value> {
    workflows
        .iter()
        .map(|wid| {
            json!({
                "mark": { "type": "bar", "opacity": opacity },
                "transform": [{ "filter": { "field": "workflowId", "equal": wid.as_str() } }],
                "encoding": {
                    "color": {
                        "field": "workflowId",
                        "type": "nominal",
                        "scale": { "domain": colors.domain, "range": colors.range },
                        "legend": null
                    }
                }
            })
        })
        .collect()
}

/// Build the layered overlay description.
///
/// The layer count always equals the number of compared workflows.
pub fn build_overlay_spec(
    rows: &[BinnedRow],
    column: &str,
    workflows: &[WorkflowId],
    colors: &dyn ColorScale,
    sort: AxisSort,
    config: &EngineConfig,
) -> Value {
    let mapping = colors.scale(workflows);

    json!({
        "$schema": config.schema_url,
        "description": format!("Overlay distribution of {} across per-workflow datasets", column),
        "data": { "values": rows },
        "encoding": {
            "x": {
                "field": "binLabel",
                "type": "ordinal",
                "title": null,
                "sort": sort.to_json(),
                "axis": { "labels": false, "ticks": false, "domain": false },
                "scale": { "paddingInner": 0, "paddingOuter": 0 }
            },
            "y": { "field": "count", "type": "quantitative", "title": "Count" },
            "tooltip": [
                { "field": "binLabel", "type": "nominal", "title": column },
                { "field": "tooltipAll", "type": "nominal", "title": "Workflows" }
            ]
        },
        "layer": workflow_layers(workflows, &mapping, config.bar_opacity)
    })
}

/// Card title shown above an overlay histogram.
pub fn overlay_title(asset_name: &str, column: &str) -> String {
    format!("{} — {}", asset_name, column)
}

//! Histogram of a single workflow's column, binned by the renderer itself.

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{RawRow, RawValue};
use crate::config::EngineConfig;

/// One bar of the single-workflow histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: RawValue,
    pub count: f64,
}

/// Plot description plus whether there is anything to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleHistogram {
    pub spec: Value,
    pub has_data: bool,
}

/// Build the histogram of one workflow's rows for `column`.
///
/// Rows with a non-finite count are left out.
pub fn build_single_histogram_spec(
    column: &str,
    rows: &[RawRow],
    config: &EngineConfig,
) -> SingleHistogram {
    let values: Vec<ValueCount> = rows
        .iter()
        .filter(|row| row.has_valid_count())
        .map(|row| ValueCount {
            value: row.value.clone(),
            count: row.count,
        })
        .collect();
    let has_data = !values.is_empty();

    let spec = json!({
        "$schema": config.schema_url,
        "description": format!("Histogram of {}", column),
        "data": { "values": values },
        "mark": "bar",
        "encoding": {
            "x": {
                "field": "value",
                "type": "nominal",
                "bin": { "maxbins": config.bin_count },
                "axis": { "labelAngle": -45, "labelOverlap": true },
                "title": column
            },
            "y": {
                "aggregate": "sum",
                "field": "count",
                "type": "quantitative",
                "title": "Count"
            },
            "tooltip": [
                { "field": "value", "type": "nominal", "title": column },
                { "field": "count", "type": "quantitative", "title": "Count" }
            ]
        }
    });

    SingleHistogram { spec, has_data }
}

//! Per-bin tooltip summaries listing every compared workflow side by side.

use crate::api::{BinnedRow, ColorMapping, RunParam, WorkflowId};
use maud::{html, Markup};
use std::collections::{BTreeMap, BTreeSet};

/// Render a count without a trailing `.0` for whole numbers.
pub fn format_count(count: f64) -> String {
    let count = if count == 0.0 { 0.0 } else { count };
    count.to_string()
}

/// Counts per (bin label, workflow), summed over duplicate rows.
pub fn counts_by_bin(rows: &[BinnedRow]) -> BTreeMap<String, BTreeMap<WorkflowId, f64>> {
    let mut per_bin: BTreeMap<String, BTreeMap<WorkflowId, f64>> = BTreeMap::new();

    for row in rows {
        *per_bin
            .entry(row.bin_label.clone())
            .or_default()
            .entry(row.workflow_id.clone())
            .or_insert(0.0) += row.count;
    }

    per_bin
}

/// Tooltip text keyed by bin label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipTable {
    entries: BTreeMap<String, String>,
}

impl TooltipTable {
    pub fn get(&self, bin_label: &str) -> Option<&str> {
        self.entries.get(bin_label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build one summary per bin: an `id: count` line for every workflow, in
/// selection order, joined by `separator`.
///
/// Every label in `bin_labels` gets an entry, as does any label only found in
/// `rows`. Workflows without a row in a bin are listed with a zero count.
pub fn assemble_tooltips(
    rows: &[BinnedRow],
    bin_labels: &[String],
    workflows: &[WorkflowId],
    separator: &str,
) -> TooltipTable {
    let per_bin = counts_by_bin(rows);
    let empty = BTreeMap::new();

    let labels: BTreeSet<&String> = bin_labels.iter().chain(per_bin.keys()).collect();

    let entries = labels
        .into_iter()
        .map(|label| {
            let counts = per_bin.get(label).unwrap_or(&empty);
            let body = workflows
                .iter()
                .map(|wid| {
                    let count = counts.get(wid).copied().unwrap_or(0.0);
                    format!("{}: {}", wid, format_count(count))
                })
                .collect::<Vec<_>>()
                .join(separator);
            (label.clone(), body)
        })
        .collect();

    TooltipTable { entries }
}

/// Copy each bin's summary onto its rows (`tooltipAll` in the chart data).
pub fn attach_tooltips(rows: &mut [BinnedRow], table: &TooltipTable) {
    for row in rows.iter_mut() {
        row.tooltip_all = table.get(&row.bin_label).map(str::to_string);
    }
}

/// Everything the rich hover tooltip shows besides the counts.
#[derive(Debug, Clone, Copy)]
pub struct TooltipContext<'a> {
    pub column: &'a str,
    pub workflows: &'a [WorkflowId],
    pub colors: &'a ColorMapping,
    pub params: &'a BTreeMap<WorkflowId, Vec<RunParam>>,
    pub fallback_color: &'a str,
}

impl TooltipContext<'_> {
    /// Union of the compared workflows' parameter names, sorted.
    pub fn param_names(&self) -> Vec<String> {
        self.workflows
            .iter()
            .filter_map(|wid| self.params.get(wid))
            .flatten()
            .map(|p| p.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// One table row of the rich tooltip: swatch and id, count, parameter values.
fn workflow_row(
    ctx: &TooltipContext<'_>,
    wid: &WorkflowId,
    count: f64,
    names: &[String],
) -> Markup {
    let color = ctx.colors.color_for(wid).unwrap_or(ctx.fallback_color);
    let values: BTreeMap<&str, &str> = ctx
        .params
        .get(wid)
        .map(|ps| ps.iter().map(|p| (p.name.as_str(), p.value.as_str())).collect())
        .unwrap_or_default();

    html! {
        tr {
            td style="white-space:nowrap; vertical-align:top; padding:4px;" {
                span style={
                    "display:inline-block;width:12px;height:12px;background-color:"
                    (color)
                    ";border-radius:2px;margin-right:6px;"
                } {}
                (wid.as_str())
            }
            td style="text-align:right; vertical-align:top; padding:4px;" { (format_count(count)) }
            @for name in names {
                td style="padding:4px; vertical-align:top;" {
                    (values.get(name.as_str()).copied().unwrap_or(""))
                }
            }
        }
    }
}

/// Render the HTML tooltip for one hovered bin.
///
/// One table row per workflow: color swatch and id, count, then the value of
/// every run parameter (empty when a workflow does not set it). All
/// interpolated text is escaped by the template.
pub fn render_tooltip_html(
    ctx: &TooltipContext<'_>,
    bin_label: &str,
    counts: &BTreeMap<WorkflowId, f64>,
) -> String {
    let names = ctx.param_names();

    let markup = html! {
        div style="white-space: normal;" {
            div { strong { (ctx.column) ":" } " " (bin_label) }
            table style="border-collapse:collapse; margin-top:6px; font-size:12px;" {
                thead {
                    tr {
                        th style="text-align:left; padding:4px;" { "Workflow" }
                        th style="text-align:right; padding:4px;" { "Count" }
                        @for name in &names {
                            th style="text-align:left; padding:4px;" { (name) }
                        }
                    }
                }
                tbody {
                    @for wid in ctx.workflows {
                        (workflow_row(ctx, wid, counts.get(wid).copied().unwrap_or(0.0), &names))
                    }
                }
            }
        }
    };

    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, wid: &str, count: f64) -> BinnedRow {
        BinnedRow {
            bin_label: label.to_string(),
            x_start: None,
            count,
            workflow_id: wid.into(),
            tooltip_all: None,
        }
    }

    fn ids(ids: &[&str]) -> Vec<WorkflowId> {
        ids.iter().map(|s| WorkflowId::from(*s)).collect()
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(4.0), "4");
        assert_eq!(format_count(2.5), "2.5");
        assert_eq!(format_count(-0.0), "0");
    }

    #[test]
    fn test_tooltip_lists_zero_counts() {
        let rows = vec![row("A", "run-1", 4.0), row("A", "run-2", 0.0)];
        let table = assemble_tooltips(&rows, &["A".to_string()], &ids(&["run-1", "run-2"]), "<br>");

        assert_eq!(table.get("A"), Some("run-1: 4<br>run-2: 0"));
    }

    #[test]
    fn test_tooltip_fills_workflows_without_rows() {
        let rows = vec![row("B", "y", 5.0)];
        let table = assemble_tooltips(&rows, &["A".to_string(), "B".to_string()], &ids(&["x", "y"]), "\n");

        assert_eq!(table.get("A"), Some("x: 0\ny: 0"));
        assert_eq!(table.get("B"), Some("x: 0\ny: 5"));
    }

    #[test]
    fn test_bin_without_workflows_has_empty_body() {
        let table = assemble_tooltips(&[], &["0.00 – 1.00".to_string()], &[], "<br>");

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("0.00 – 1.00"), Some(""));
    }

    #[test]
    fn test_tooltip_follows_selection_order() {
        let rows = vec![row("A", "a", 1.0), row("A", "b", 2.0)];
        let table = assemble_tooltips(&rows, &["A".to_string()], &ids(&["b", "a"]), "|");

        assert_eq!(table.get("A"), Some("b: 2|a: 1"));
    }

    #[test]
    fn test_duplicate_rows_are_summed() {
        let rows = vec![row("A", "a", 1.0), row("A", "a", 2.0)];
        assert_eq!(counts_by_bin(&rows)["A"][&WorkflowId::from("a")], 3.0);
    }

    #[test]
    fn test_attach_tooltips() {
        let mut rows = vec![row("A", "a", 1.0)];
        let table = assemble_tooltips(&rows, &["A".to_string()], &ids(&["a"]), "<br>");
        attach_tooltips(&mut rows, &table);

        assert_eq!(rows[0].tooltip_all.as_deref(), Some("a: 1"));
    }

    #[test]
    fn test_tooltip_html_escapes_markup() {
        let workflows = ids(&["<run>"]);
        let colors = ColorMapping::default();
        let params = BTreeMap::new();
        let ctx = TooltipContext {
            column: "a & b",
            workflows: &workflows,
            colors: &colors,
            params: &params,
            fallback_color: "#999",
        };

        let html = render_tooltip_html(&ctx, "<script>", &BTreeMap::new());

        assert!(html.contains("<strong>a &amp; b:</strong>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;run&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_tooltip_html() {
        let workflows = ids(&["run-1", "run-2"]);
        let colors = ColorMapping {
            domain: vec!["run-1".into()],
            range: vec!["#ff0000".into()],
        };
        let mut params = BTreeMap::new();
        params.insert(
            WorkflowId::from("run-1"),
            vec![RunParam { name: "lr".into(), value: "0.1".into() }],
        );
        params.insert(
            WorkflowId::from("run-2"),
            vec![RunParam { name: "batch".into(), value: "<32>".into() }],
        );
        let ctx = TooltipContext {
            column: "loss",
            workflows: &workflows,
            colors: &colors,
            params: &params,
            fallback_color: "#999",
        };
        let mut counts = BTreeMap::new();
        counts.insert(WorkflowId::from("run-1"), 4.0);

        assert_eq!(ctx.param_names(), vec!["batch".to_string(), "lr".to_string()]);

        let html = render_tooltip_html(&ctx, "0.00 – 1.00", &counts);

        assert!(html.contains("<strong>loss:</strong> 0.00 – 1.00"));
        assert!(html.contains("background-color:#ff0000"));
        assert!(html.contains("background-color:#999"));
        assert!(html.contains("&lt;32&gt;"));
        assert!(html.contains(">4</td>"));
        assert!(html.contains(">0</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }
}

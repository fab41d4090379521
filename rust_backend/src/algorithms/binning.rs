//! Shared numeric bin scheme over the pooled range of all compared workflows.

use crate::api::{BinPlan, NumericBin};
use std::num::NonZeroUsize;

/// Number of bins used when nothing else is configured.
pub const DEFAULT_BIN_COUNT: usize = 10;

/// Digits after the decimal point in bin labels.
pub const DEFAULT_LABEL_PRECISION: usize = 2;

/// Min and max over the finite values, or `None` when there are none.
pub fn pooled_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in values.into_iter().filter(|v| v.is_finite()) {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Format a bin boundary with a fixed number of decimals.
pub fn format_value(value: f64, precision: usize) -> String {
    // -0.0 would otherwise print as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", precision, value)
}

/// Label for the bin `[start, end)`, or the single value when they coincide.
pub fn format_bin_label(start: f64, end: f64, precision: usize) -> String {
    if start == end {
        format_value(start, precision)
    } else {
        format!(
            "{} – {}",
            format_value(start, precision),
            format_value(end, precision)
        )
    }
}

/// Index of the bin containing `value`, clamped to `[0, bin_count - 1]`.
///
/// Values at (or drifting past) the upper edge land in the last bin; values
/// below the first start land in the first.
pub fn bin_index(value: f64, first_start: f64, width: f64, bin_count: usize) -> usize {
    if bin_count <= 1 || width <= 0.0 {
        return 0;
    }

    let offset = value - first_start;
    let raw = if offset.is_finite() {
        (offset / width).floor()
    } else {
        (value / width - first_start / width).floor()
    };
    let last = (bin_count - 1) as f64;

    if raw.is_nan() {
        return 0;
    }

    raw.clamp(0.0, last) as usize
}

/// Width of `n` equal bins over `[min, max]`, without overflowing when the
/// span itself exceeds `f64::MAX`.
fn bin_width(min: f64, max: f64, n: usize) -> f64 {
    let n = n as f64;
    let span = max - min;
    if span.is_finite() {
        span / n
    } else {
        max / n - min / n
    }
}

/// Position of the `i`-th bin edge, halving the terms when the direct sum
/// would overflow.
fn bin_edge(first_start: f64, i: usize, width: f64) -> f64 {
    let edge = first_start + i as f64 * width;
    if edge.is_finite() {
        edge
    } else {
        ((first_start / 2.0 + i as f64 * (width / 2.0)) * 2.0).clamp(f64::MIN, f64::MAX)
    }
}

/// Compute the shared bins for the pooled `values` of every workflow.
///
/// The first bin start is anchored at `floor(min / width) * width`, so edges
/// are multiples of the bin width and may begin below the observed minimum.
pub fn plan_bins(
    values: impl IntoIterator<Item = f64>,
    bin_count: NonZeroUsize,
    precision: usize,
) -> BinPlan {
    let Some((min, max)) = pooled_range(values) else {
        return BinPlan::default();
    };

    if max == min {
        return BinPlan {
            bins: vec![NumericBin {
                start: min,
                end: min,
                label: format_bin_label(min, min, precision),
            }],
            width: 0.0,
        };
    }

    let n = bin_count.get();
    let width = bin_width(min, max, n);
    if !(width > 0.0 && width.is_finite()) {
        // span too small to split: one bin covering it
        return BinPlan {
            bins: vec![NumericBin {
                start: min,
                end: max,
                label: format_bin_label(min, max, precision),
            }],
            width: max - min,
        };
    }

    let anchored = (min / width).floor() * width;
    let first_start = if anchored.is_finite() && anchored <= min {
        anchored
    } else {
        min
    };

    let bins = (0..n)
        .map(|i| {
            let start = bin_edge(first_start, i, width);
            let end = bin_edge(first_start, i + 1, width);
            NumericBin {
                start,
                end,
                label: format_bin_label(start, end, precision),
            }
        })
        .collect();

    log::debug!(
        "Planned {} bins over [{}, {}] with width {}",
        n,
        min,
        max,
        width
    );

    BinPlan { bins, width }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten() -> NonZeroUsize {
        NonZeroUsize::new(DEFAULT_BIN_COUNT).unwrap()
    }

    #[test]
    fn test_pooled_range_skips_non_finite() {
        let range = pooled_range(vec![3.0, f64::NAN, -1.0, f64::INFINITY, 7.5]);
        assert_eq!(range, Some((-1.0, 7.5)));
    }

    #[test]
    fn test_pooled_range_empty() {
        assert_eq!(pooled_range(Vec::new()), None);
        assert_eq!(pooled_range(vec![f64::NAN]), None);
    }

    #[test]
    fn test_plan_bins_zero_to_hundred() {
        let plan = plan_bins(vec![0.0, 37.0, 100.0], ten(), 2);

        assert_eq!(plan.len(), 10);
        assert_eq!(plan.width, 10.0);
        assert_eq!(plan.bins[0].start, 0.0);
        assert_eq!(plan.bins[0].end, 10.0);
        assert_eq!(plan.bins[9].start, 90.0);
        assert_eq!(plan.bins[9].end, 100.0);
        assert_eq!(plan.bins[0].label, "0.00 – 10.00");
        assert_eq!(plan.index_of(100.0), Some(9));
        assert_eq!(plan.index_of(0.0), Some(0));
        assert_eq!(plan.index_of(37.0), Some(3));
    }

    #[test]
    fn test_plan_bins_degenerate_range() {
        let plan = plan_bins(vec![5.0, 5.0], ten(), 2);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.width, 0.0);
        assert_eq!(plan.bins[0].start, 5.0);
        assert_eq!(plan.bins[0].end, 5.0);
        assert_eq!(plan.bins[0].label, "5.00");
        assert_eq!(plan.index_of(5.0), Some(0));
    }

    #[test]
    fn test_plan_bins_no_values() {
        let plan = plan_bins(Vec::new(), ten(), 2);
        assert!(plan.is_empty());
        assert_eq!(plan.index_of(1.0), None);
    }

    #[test]
    fn test_first_start_anchored_below_minimum() {
        // width = (23 - 3) / 10 = 2, floor(3 / 2) * 2 = 2
        let plan = plan_bins(vec![3.0, 23.0], ten(), 2);

        assert_eq!(plan.bins[0].start, 2.0);
        assert_eq!(plan.bins[9].end, 22.0);
        // the maximum lies past the last edge and is clamped into the last bin
        assert_eq!(plan.index_of(23.0), Some(9));
    }

    #[test]
    fn test_negative_range() {
        let plan = plan_bins(vec![-10.0, 10.0], ten(), 1);

        assert_eq!(plan.bins[0].start, -10.0);
        assert_eq!(plan.bins[0].label, "-10.0 – -8.0");
        assert_eq!(plan.index_of(-10.0), Some(0));
        assert_eq!(plan.index_of(10.0), Some(9));
    }

    #[test]
    fn test_bin_index_clamps() {
        assert_eq!(bin_index(-50.0, 0.0, 10.0, 10), 0);
        assert_eq!(bin_index(1e9, 0.0, 10.0, 10), 9);
        assert_eq!(bin_index(99.999999, 0.0, 10.0, 10), 9);
        assert_eq!(bin_index(4.0, 0.0, 0.0, 10), 0);
    }

    #[test]
    fn test_format_value_normalizes_negative_zero() {
        assert_eq!(format_value(-0.0, 2), "0.00");
        assert_eq!(format_bin_label(0.5, 0.5, 2), "0.50");
        assert_eq!(format_bin_label(0.5, 1.25, 2), "0.50 – 1.25");
    }

    #[test]
    fn test_single_bin_requested() {
        let plan = plan_bins(vec![1.0, 4.0], NonZeroUsize::new(1).unwrap(), 2);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.bins[0].start, 0.0);
        assert_eq!(plan.bins[0].end, 3.0);
        assert_eq!(plan.index_of(4.0), Some(0));
    }

    #[test]
    fn test_span_wider_than_f64_max() {
        let plan = plan_bins(vec![-1e308, 1e308], ten(), 2);

        assert_eq!(plan.len(), 10);
        assert!(plan.width.is_finite() && plan.width > 0.0);
        for bin in &plan.bins {
            assert!(bin.start.is_finite() && bin.end.is_finite(), "{:?}", bin);
            assert!(!bin.label.contains("NaN") && !bin.label.contains("inf"));
        }
        assert_eq!(plan.index_of(-1e308), Some(0));
        assert_eq!(plan.index_of(0.0), Some(5));
        assert_eq!(plan.index_of(1e308), Some(9));
    }

    #[test]
    fn test_subnormal_span_collapses_to_one_bin() {
        let plan = plan_bins(vec![0.0, 5e-324], ten(), 2);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.bins[0].start, 0.0);
        assert_eq!(plan.bins[0].end, 5e-324);
        assert_eq!(plan.bins[0].label, "0.00 – 0.00");
        assert_eq!(plan.index_of(5e-324), Some(0));
    }

    #[test]
    fn test_bin_index_with_overflowing_offset() {
        // 7.98e307 - (-1e308) overflows, yet the value belongs to bin 8
        assert_eq!(bin_index(7.98e307, -1e308, 2e307, 10), 8);
    }
}

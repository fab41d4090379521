//! Service layer turning binned data into what the dashboard renders.
//!
//! Services orchestrate the binning algorithms and produce the chart-facing
//! outputs: plot descriptions, tooltip text and display status.

pub mod chart_spec;
pub mod histogram;
pub mod overlay;
pub mod status;
pub mod tooltip;

pub use chart_spec::{build_overlay_spec, AxisSort, ColorScale};
pub use histogram::{build_single_histogram_spec, SingleHistogram};
pub use overlay::{
    compute_overlay_histogram, BinnedHistogram, OverlayEngine, OverlayHistogram, OverlayView,
};
pub use status::{raw_set_from_states, ComparisonStatus};
pub use tooltip::{assemble_tooltips, render_tooltip_html, TooltipContext, TooltipTable};

//! Parsers for the data handed over by the fetch layer.
//!
//! # Parsers
//!
//! - [`rows`]: Turn grouped-count records (`{"loss": 0.3, "count_loss": 12}`) into raw rows
//! - [`payload`]: Parse a whole comparison (workflows, fetch states, run parameters)
//!
//! # Example
//!
//! ```no_run
//! use monitor_rust::parsing::payload::load_comparison_payload;
//! use std::path::Path;
//!
//! let payload = load_comparison_payload(Path::new("comparison.json"))
//!     .expect("Failed to parse payload");
//! ```

pub mod payload;
pub mod rows;


pub use payload::{parse_comparison_payload, ComparisonPayload, WorkflowPayload};
pub use rows::{count_field, rows_from_records, ExtractedRows};

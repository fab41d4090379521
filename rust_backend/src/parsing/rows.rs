use serde_json::Value;

use crate::api::{RawRow, RawValue};

/// Column name as it appears in generated aggregate field names.
pub fn normalize_column(column: &str) -> String {
    column.replace('-', "_")
}

/// Name of the field holding the `COUNT` aggregate of `column`.
pub fn count_field(column: &str) -> String {
    format!("count_{}", normalize_column(column))
}

/// Rows extracted from one workflow's records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedRows {
    pub rows: Vec<RawRow>,
    /// Records without a usable value or count.
    pub skipped: usize,
}

fn raw_value(value: &Value) -> Option<RawValue> {
    match value {
        Value::Number(n) => n.as_f64().map(RawValue::Number),
        Value::String(s) => Some(RawValue::Text(s.clone())),
        Value::Bool(b) => Some(RawValue::Text(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Extract a single `(value, count)` row from a grouped-count record.
pub fn row_from_record(record: &Value, column: &str, count_key: &str) -> Option<RawRow> {
    let value = record.get(column).and_then(raw_value)?;
    let count = record
        .get(count_key)
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())?;

    Some(RawRow { value, count })
}

/// Extract rows for `column` from the records returned by a grouped count
/// query, skipping records that are missing the value or carry a
/// non-numeric count.
pub fn rows_from_records(records: &[Value], column: &str) -> ExtractedRows {
    let count_key = count_field(column);
    let mut extracted = ExtractedRows::default();

    for record in records {
        match row_from_record(record, column, &count_key) {
            Some(row) => extracted.rows.push(row),
            None => extracted.skipped += 1,
        }
    }

    if extracted.skipped > 0 {
        log::debug!(
            "Skipped {} of {} records for column {}",
            extracted.skipped,
            records.len(),
            column
        );
    }

    extracted
}

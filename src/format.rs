//! Output shaping for tabular handler results.
//!
//! Every analytics route produces a table and lets the caller choose between a
//! JSON envelope, comma-joined text and the raw header-first array.

use crate::models::{ParticipantRecord, WindowedResponse, volume_to_json};
use crate::window::{TimeWindow, format_timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header row of the participant table.
pub const PARTICIPANT_HEADER: [&str; 3] = ["account", "volume", "count"];

/// Output shape requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// `{ startTime, endTime, results }`.
    Json,
    /// Header and rows joined with `", "`, newline separated.
    Csv,
    /// Header-first array of arrays.
    #[default]
    Table,
}

impl ResponseFormat {
    /// Reads the `format` request parameter. Anything other than
    /// `"json"` or `"csv"` selects the raw table.
    #[must_use]
    pub fn from_param(format: Option<&Value>) -> Self {
        match format.and_then(Value::as_str) {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Successful handler result, ready to be written to the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum HandlerOutput {
    /// JSON body.
    Json(Value),
    /// Plain text body.
    Text(String),
}

/// Header plus positional rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    header: Vec<Value>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given header.
    #[must_use]
    pub fn new(header: Vec<Value>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    /// Number of data rows, header excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows, header excluded.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Joins cells with `", "` and rows with `"\n"`.
    ///
    /// Cells are written verbatim: an identity containing a comma produces
    /// an ambiguous line.
    #[must_use]
    pub fn to_csv(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| {
                row.iter()
                    .map(csv_cell)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Header-first array of arrays.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(Value::Array(self.header));
        rows.extend(self.rows.into_iter().map(Value::Array));
        Value::Array(rows)
    }
}

impl From<&[ParticipantRecord]> for Table {
    fn from(records: &[ParticipantRecord]) -> Self {
        let mut table = Table::new(PARTICIPANT_HEADER.iter().map(|h| Value::from(*h)).collect());
        for record in records {
            table.push(vec![
                Value::from(record.account.as_str()),
                volume_to_json(&record.volume),
                Value::from(record.count),
            ]);
        }
        table
    }
}

fn csv_cell(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Formats ranked participants.
///
/// # Errors
/// Returns an error if the records cannot be serialized.
pub fn format_participants(
    records: &[ParticipantRecord],
    window: &TimeWindow,
    format: ResponseFormat,
) -> Result<HandlerOutput, serde_json::Error> {
    let results = match format {
        ResponseFormat::Json => serde_json::to_value(records)?,
        _ => Value::Null,
    };
    format_table(Table::from(records), results, window, format)
}

/// Formats a table. `json_results` is placed in the envelope's `results`
/// field when the JSON shape is requested and ignored otherwise.
///
/// # Errors
/// Returns an error if the envelope cannot be serialized.
pub fn format_table(
    table: Table,
    json_results: Value,
    window: &TimeWindow,
    format: ResponseFormat,
) -> Result<HandlerOutput, serde_json::Error> {
    let output = match format {
        ResponseFormat::Json => HandlerOutput::Json(serde_json::to_value(WindowedResponse {
            start_time: format_timestamp(window.start()),
            end_time: format_timestamp(window.end()),
            results: json_results,
        })?),
        ResponseFormat::Csv => HandlerOutput::Text(table.to_csv()),
        ResponseFormat::Table => HandlerOutput::Json(table.into_value()),
    };
    Ok(output)
}

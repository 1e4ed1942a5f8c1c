//! Source row records and the tabular reader seam.
//!
//! The actual CSV/tabular reader lives outside this crate; the pipeline only
//! sees a `RowSource` yielding `Row` records in source order.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::constants::fields;
use crate::errors::PipelineError;

/// One immutable source record: an ordered mapping of field name to text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    fields: IndexMap<String, String>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, preserving first-insertion order.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Raw field value; a missing field reads as the empty string.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Field value with the absent sentinel collapsed to `None`.
    ///
    /// Empty strings and the literal `NA` both mean "intentionally absent".
    pub fn value(&self, field: &str) -> Option<&str> {
        let raw = self.get(field).trim();
        if raw.is_empty() || raw == fields::ABSENT_SENTINEL {
            None
        } else {
            Some(raw)
        }
    }
}

/// Reader seam that yields rows in source order.
///
/// Implementations may stream from disk or hold rows in memory. A source
/// that cannot be opened at all should fail the first `next_row` call with
/// [`PipelineError::SourceUnavailable`]; that aborts the batch.
pub trait RowSource {
    /// Stable identifier for diagnostics.
    fn id(&self) -> &str;
    /// Next row, or `None` when the source is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>, PipelineError>;
}

/// In-memory row source used by tests and embedding callers.
#[derive(Clone, Debug)]
pub struct InMemoryRowSource {
    id: String,
    rows: VecDeque<Row>,
}

impl InMemoryRowSource {
    /// Create a source that yields `rows` in order.
    pub fn new(id: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            rows: rows.into(),
        }
    }
}

impl RowSource for InMemoryRowSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn next_row(&mut self) -> Result<Option<Row>, PipelineError> {
        Ok(self.rows.pop_front())
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Error type for batch input, persistence, and corpus-scan failures.
///
/// Per-row degradations (unparseable dates, failed media fetches) never
/// surface here; they are handled inside assembly and logged. This type
/// covers the faults that must abort a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("row source '{id}' is unavailable: {reason}")]
    SourceUnavailable { id: String, reason: String },
    #[error("document store failure at '{path}': {reason}")]
    Store { path: PathBuf, reason: String },
    #[error("taxonomy persistence failure: {0}")]
    Taxonomy(String),
}

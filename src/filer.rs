//! Chronological year/month filing.
//!
//! Filing copies, never moves: flat documents stay where they are, and the
//! organized tree can be rebuilt at any time. Re-running over an already
//! organized tree is safe because only root-level documents are considered
//! and identical targets are left untouched.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::constants::documents::DOCUMENT_EXTENSION;
use crate::errors::PipelineError;
use crate::store::DocumentStore;

/// A (year, month) grouping derived from a publication date; the filing
/// target directory for a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChronologicalBucket {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12; rendered zero-padded.
    pub month: u32,
}

impl ChronologicalBucket {
    /// Bucket for a publication date.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Relative bucket directory, e.g. `2024/05`.
    pub fn dir(&self) -> PathBuf {
        PathBuf::from(format!("{}/{:02}", self.year, self.month))
    }
}

/// Files flat dated documents into year/month buckets, idempotently.
pub struct ChronologicalFiler<'a> {
    store: &'a dyn DocumentStore,
    blog_dir: PathBuf,
}

impl<'a> ChronologicalFiler<'a> {
    /// Create a filer over `store`, working under `blog_dir`.
    pub fn new(store: &'a dyn DocumentStore, blog_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            blog_dir: blog_dir.into(),
        }
    }

    /// Date encoded in a flat document filename (`YYYY-MM-DD-…`), when the
    /// prefix is present and a valid calendar date.
    pub fn date_from_file_name(name: &str) -> Option<NaiveDate> {
        let prefix = name.get(..10)?;
        if !name[10..].starts_with('-') {
            return None;
        }
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }

    /// Copy one document into its bucket.
    ///
    /// `source` is the document's path relative to the store root. Returns
    /// the target path, or `None` when the filename carries no parseable
    /// date prefix (skipped with a warning). Re-invoking with the same
    /// inputs produces the same target content.
    pub fn place(&self, source: &Path) -> Result<Option<PathBuf>, PipelineError> {
        let name = source
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let date = match Self::date_from_file_name(name) {
            Some(date) => date,
            None => {
                warn!(
                    path = %source.display(),
                    "no parseable date prefix in filename, skipping"
                );
                return Ok(None);
            }
        };
        let stem = name
            .strip_suffix(&format!(".{DOCUMENT_EXTENSION}"))
            .unwrap_or(name);
        let target = self
            .blog_dir
            .join(ChronologicalBucket::for_date(date).dir())
            .join(stem)
            .join(format!("index.{DOCUMENT_EXTENSION}"));

        let content = self.store.read(source)?;
        if self.store.exists(&target) && self.store.read(&target)? == content {
            debug!(path = %target.display(), "already filed, unchanged");
            return Ok(Some(target));
        }
        self.store.write(&target, &content)?;
        debug!(source = %source.display(), target = %target.display(), "filed document");
        Ok(Some(target))
    }

    /// File every eligible document sitting at the root of the blog
    /// directory. Documents already inside a dated bucket are never
    /// re-processed. Returns the bucket paths written or confirmed.
    pub fn organize(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut placed = Vec::new();
        for source in self.store.list_markdown(&self.blog_dir)? {
            // ancestry guard: anything below the root is already organized
            if source.parent() != Some(self.blog_dir.as_path()) {
                continue;
            }
            if let Some(target) = self.place(&source)? {
                placed.push(target);
            }
        }
        Ok(placed)
    }
}

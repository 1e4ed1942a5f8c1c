//! Controlled tag vocabulary with YAML persistence.
//!
//! The store is descriptive, not restrictive: tags it has never seen are
//! accepted and registered with generated labels, and a warning is surfaced
//! per new tag so operators can curate labels later.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::PipelineError;
use crate::store::DocumentStore;
use crate::types::{TagKey, TagLabel};

/// Display label and curator-facing description for one tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    /// Human-readable label, e.g. `Data Products`.
    pub label: TagLabel,
    /// One-sentence description shown on tag pages.
    pub description: String,
}

/// Controlled vocabulary of tags, persisted as a sorted YAML mapping.
///
/// Loaded once at batch start, mutated in memory while rows are processed,
/// and persisted exactly once at batch end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaxonomyStore {
    entries: BTreeMap<TagKey, TagEntry>,
}

impl TaxonomyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load persisted tag definitions from `path` in `store`.
    ///
    /// A missing or malformed file yields an empty store and a warning;
    /// processing continues.
    pub fn load(store: &dyn DocumentStore, path: &Path) -> Self {
        if !store.exists(path) {
            warn!(path = %path.display(), "taxonomy file not found, starting empty");
            return Self::new();
        }
        let raw = match store.read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), %err, "taxonomy file unreadable, starting empty");
                return Self::new();
            }
        };
        match Self::parse(&String::from_utf8_lossy(&raw)) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed taxonomy file, starting empty");
                Self::new()
            }
        }
    }

    /// Parse the persisted YAML form (tag key -> label/description mapping).
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let entries: BTreeMap<TagKey, TagEntry> = serde_yaml::from_str(raw)
            .map_err(|err| PipelineError::Taxonomy(err.to_string()))?;
        Ok(Self { entries })
    }

    /// Register a tag key, synthesizing a label and description when absent.
    ///
    /// Keys are case-normalized before comparison. Registering an
    /// already-known key is a no-op.
    pub fn register(&mut self, key: &str) {
        let key = key.to_lowercase();
        if self.entries.contains_key(&key) {
            return;
        }
        warn!(tag = %key, "tag not in taxonomy, registering with a generated label");
        let label = display_label(&key);
        let description = format!("Content related to {label}");
        self.entries.insert(key, TagEntry { label, description });
    }

    /// True when the key is already defined (case-normalized).
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// Entry for a key, if defined.
    pub fn get(&self, key: &str) -> Option<&TagEntry> {
        self.entries.get(&key.to_lowercase())
    }

    /// Number of defined tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no tags are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the persisted YAML form, sorted by key.
    pub fn render(&self) -> Result<String, PipelineError> {
        serde_yaml::to_string(&self.entries).map_err(|err| PipelineError::Taxonomy(err.to_string()))
    }

    /// Write the full current mapping back to `path`, overwriting prior
    /// content. One write per batch, not per tag.
    pub fn persist(&self, store: &dyn DocumentStore, path: &Path) -> Result<(), PipelineError> {
        let rendered = self.render()?;
        store.write(path, rendered.as_bytes())
    }
}

/// Title-cased, hyphen-to-space display label for a tag key.
fn display_label(key: &str) -> TagLabel {
    key.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Media fetcher seam and local naming policy for fetched images.
//!
//! The actual HTTP client lives outside this crate; assembly only needs a
//! function from URL to bytes. Local filenames are deterministic so that
//! re-running a batch overwrites media in place instead of accumulating
//! copies.

use std::collections::HashMap;

use thiserror::Error;

use crate::constants::media::{DEFAULT_EXTENSION, MAX_EXTENSION_LEN};

/// Failure reported by a media fetcher. Always recoverable: assembly logs
/// it and continues without an image.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("media fetch failed for '{url}': {reason}")]
pub struct MediaFetchError {
    /// URL that could not be fetched.
    pub url: String,
    /// Human-readable cause.
    pub reason: String,
}

/// External fetcher seam: resolves a remote URL to raw bytes.
pub trait MediaFetcher {
    /// Fetch the resource at `url`. A timeout counts as a failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaFetchError>;
}

/// In-memory fetcher used by tests and offline runs; unknown URLs fail.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFetcher {
    resources: HashMap<String, Vec<u8>>,
}

impl InMemoryFetcher {
    /// Register the bytes served for `url`.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.resources.insert(url.into(), bytes);
    }
}

impl MediaFetcher for InMemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MediaFetchError> {
        self.resources
            .get(url)
            .cloned()
            .ok_or_else(|| MediaFetchError {
                url: url.to_string(),
                reason: "no such resource".to_string(),
            })
    }
}

/// Extension found in the URL's basename, when plausible.
///
/// Plausible means 1 to 4 ASCII alphanumeric characters after the final dot
/// of a non-empty stem, query string and fragment ignored. Returns `None`
/// when the caller should fall back to [`DEFAULT_EXTENSION`].
pub fn extension_for(url: &str) -> Option<String> {
    let path = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(url);
    let base = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Deterministic local filename for a document's fetched image:
/// `{prefix}-{slug}.{ext}`.
pub fn local_file_name(prefix: &str, slug: &str, extension: &str) -> String {
    format!("{prefix}-{slug}.{extension}")
}

/// `extension_for` with the fallback applied.
pub fn extension_or_default(url: &str) -> String {
    extension_for(url).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

//! Document writer seam and the filesystem-backed store.
//!
//! The pipeline treats persisted output as a key-value store keyed by
//! relative path; the filesystem implementation below is the only one
//! shipped, and tests point it at temporary directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::documents::DOCUMENT_EXTENSION;
use crate::errors::PipelineError;

/// Key-value store of persisted site content, keyed by relative path.
pub trait DocumentStore {
    /// Write full contents at `path`, creating parent directories.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), PipelineError>;
    /// Read full contents at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError>;
    /// True when `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Relative paths of persisted markdown documents under `dir`,
    /// recursive, sorted lexicographically for deterministic iteration.
    fn list_markdown(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError>;
}

/// Filesystem-backed document store rooted at a site directory.
#[derive(Clone, Debug)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The site root this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn store_err(path: &Path, err: io::Error) -> PipelineError {
        PipelineError::Store {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl DocumentStore for FsDocumentStore {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
        let target = self.absolute(path);
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| Self::store_err(path, err))?;
            }
        }
        fs::write(&target, bytes).map_err(|err| Self::store_err(path, err))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError> {
        fs::read(self.absolute(path)).map_err(|err| Self::store_err(path, err))
    }

    fn exists(&self, path: &Path) -> bool {
        self.absolute(path).exists()
    }

    fn list_markdown(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let base = self.absolute(dir);
        if !base.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(&base)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let is_markdown = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
                .unwrap_or(false);
            if !is_markdown {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();
            found.push(relative);
        }
        found.sort();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        let path = Path::new("blog/2024/05/index.md");
        store.write(path, b"content").unwrap();
        assert!(store.exists(path));
        assert_eq!(store.read(path).unwrap(), b"content");
    }

    #[test]
    fn list_markdown_is_recursive_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        store.write(Path::new("blog/zzz.md"), b"z").unwrap();
        store.write(Path::new("blog/2024/05/post/index.md"), b"i").unwrap();
        store.write(Path::new("blog/tags.yml"), b"{}").unwrap();

        let listed = store.list_markdown(Path::new("blog")).unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("blog/2024/05/post/index.md"),
                PathBuf::from("blog/zzz.md"),
            ]
        );
    }

    #[test]
    fn list_markdown_of_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        assert!(store.list_markdown(Path::new("blog")).unwrap().is_empty());
    }

    #[test]
    fn read_of_missing_path_is_a_store_error() {
        let dir = tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path());
        let err = store.read(Path::new("blog/nope.md")).unwrap_err();
        assert!(matches!(err, PipelineError::Store { .. }));
    }
}

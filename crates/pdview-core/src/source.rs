//! Where patch documents come from.
//!
//! The parser only needs "bytes for a path". [`FsSource`] reads the local
//! filesystem; [`MemorySource`] serves documents registered in memory, which
//! is what the tests and embedders without a filesystem use.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::SourceError;

/// Supplies the raw bytes of patch documents.
pub trait PatchSource {
    /// Reads the whole document at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError>;

    /// Returns true if `path` names a readable document.
    fn exists(&self, path: &Path) -> bool;

    /// Stable identity of `path`, used to detect a patch including itself.
    ///
    /// The default lexically normalizes the path.
    fn identity(&self, path: &Path) -> PathBuf {
        normalize(path)
    }
}

impl<S: PatchSource + ?Sized> PatchSource for &S {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        (**self).read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn identity(&self, path: &Path) -> PathBuf {
        (**self).identity(path)
    }
}

/// Removes `.` components and folds `..` against preceding normal components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Reads patches from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl PatchSource for FsSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        std::fs::read(path).map_err(|e| SourceError::read(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn identity(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
    }
}

/// In-memory patch store keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a document.
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files.insert(normalize(path.as_ref()), contents.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl PatchSource for MemorySource {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize(path))
    }
}

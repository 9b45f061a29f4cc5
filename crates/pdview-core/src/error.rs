//! Error types for patch parsing and loading.
//!
//! None of these abort a document parse. [`LineError`] is the reason a
//! recognised line produced no widget; [`SourceError`] is the reason a patch
//! document could not be read. Both are logged and recorded in the
//! [`ParsedDocument`](crate::ParsedDocument) diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Why a recognised patch line produced no widget.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    /// The line has fewer tokens than its kind requires.
    #[error("{kind} line needs at least {needed} tokens (found {found})")]
    TooShort {
        /// Kind the line was classified as.
        kind: &'static str,
        /// Minimum token count for the kind.
        needed: usize,
        /// Token count actually present.
        found: usize,
    },

    /// A token required by the layout is missing.
    #[error("missing token at index {index}")]
    MissingToken {
        /// Token index that was out of range.
        index: usize,
    },

    /// A positional numeric field did not parse as a finite number.
    #[error("token {index} ('{token}') is not a number")]
    BadNumber {
        /// Token index.
        index: usize,
        /// Token text.
        token: String,
    },

    /// A subpatch line has no `pd` keyword where one is expected.
    #[error("subpatch line has no 'pd' keyword at token 3 or 4")]
    MissingSubpatchKeyword,
}

/// Errors raised while reading a patch document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The document does not exist.
    #[error("patch not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The document exists but could not be read.
    #[error("failed to read patch '{}': {source}", path.display())]
    Read {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Create a read error, mapping `NotFound` I/O errors to [`SourceError::NotFound`].
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path)
        } else {
            SourceError::Read { path, source }
        }
    }
}

//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Which kind of child node an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Message,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Folder => f.write_str("sub-folder"),
            NodeKind::Message => f.write_str("sub-message"),
        }
    }
}

/// The primary error type for all operations in this crate.
///
/// Each variant maps to a distinct user-visible message; none of them
/// is ever retried, since the container is static for the duration of
/// a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The container could not be opened for reading.
    #[error("unable to open file {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// A specific index or field could not be retrieved from an open
    /// archive. Carries the collaborator's own failure reason.
    #[error("unable to read from archive: {0}")]
    Accessor(String),

    /// An accessor failure wrapped with its position in the tree.
    /// Halts the traversal that produced it.
    #[error("unable to read {kind} {index} of folder \"{parent}\": {source}")]
    Traversal {
        parent: String,
        kind: NodeKind,
        index: usize,
        source: Box<Error>,
    },

    /// A present raw-text field could not be converted to canonical
    /// text. Absent fields never produce this.
    #[error("unable to decode {field}: {reason}")]
    Decode { field: &'static str, reason: String },

    /// Releasing the archive handle failed.
    #[error("unable to close file: {0}")]
    Close(String),

    /// The archive failed to close after an earlier error; both are
    /// surfaced, the earlier one as the primary outcome.
    #[error("{primary}; additionally, unable to close file: {close}")]
    CloseAfter { primary: Box<Error>, close: Box<Error> },

    /// Writing rendered output to the report sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for decoding and reading `/proc` files.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::ValueKind;

/// Failure to turn file content into a typed record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A token could not be parsed as the declared value kind.
    #[error("invalid {kind} value {token:?} for field {field}")]
    InvalidValue {
        field: &'static str,
        kind: ValueKind,
        token: String,
    },

    /// A record carries fewer tokens than its layout requires.
    #[error("{record}: expected at least {expected} fields, found {found}")]
    MissingField {
        record: &'static str,
        expected: usize,
        found: usize,
    },

    /// A "a/b" pair without exactly two halves.
    #[error("malformed pair {token:?} for field {field}")]
    MalformedPair { field: &'static str, token: String },

    /// Any other structural violation of a file format.
    #[error("{record}: {message}")]
    Format {
        record: &'static str,
        message: String,
    },
}

impl DecodeError {
    pub(crate) fn format(record: &'static str, message: impl Into<String>) -> Self {
        Self::Format {
            record,
            message: message.into(),
        }
    }
}

/// Failure to read a file and decode it.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be read. The underlying error is kept as-is.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is not valid for the format.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

impl ReadError {
    /// Returns the path of the file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ReadError::Io { path, .. } | ReadError::Decode { path, .. } => path,
        }
    }

    /// Returns true if the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

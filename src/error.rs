//! Error types for split and merge operations.

use std::io;
use thiserror::Error;

/// The main error type for splitter operations.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The maximum part size was zero.
    #[error("Invalid part size: {0}")]
    InvalidPartSize(String),

    /// Any other invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Splitting would produce more parts than a merge is able to find.
    #[error("Splitting requires {required} parts but at most {limit} are supported")]
    TooManyParts { required: u64, limit: usize },

    /// The file to split could not be opened.
    #[error("failed to open source file '{name}': {source}")]
    OpenSource {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A part file could not be created for writing.
    #[error("failed to create part file '{name}': {source}")]
    CreatePart {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A part file exists but could not be opened.
    #[error("failed to open part file '{name}': {source}")]
    OpenPart {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The merge destination could not be created.
    #[error("failed to create destination file '{name}': {source}")]
    CreateDestination {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The source ran out of bytes before a part was complete.
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },

    /// Reading from the source failed.
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing to a part or to the destination failed, or wrote fewer bytes
    /// than requested.
    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    /// A streaming failure while processing a specific part.
    #[error("part {index}: {source}")]
    Part {
        index: usize,
        #[source]
        source: Box<SplitterError>,
    },
}

impl SplitterError {
    /// Attaches the index of the part being processed to a streaming error.
    pub(crate) fn in_part(self, index: usize) -> Self {
        SplitterError::Part {
            index,
            source: Box::new(self),
        }
    }
}

/// A specialized Result type for splitter operations.
pub type Result<T> = std::result::Result<T, SplitterError>;

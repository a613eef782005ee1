//! Error types for the checksum engine.
//!
//! Configuration errors surface before any part I/O starts; read errors name
//! the failing part so the caller can report it; aggregation over zero parts
//! is rejected explicitly instead of producing an undefined digest.

use std::io;
use thiserror::Error;

/// Error returned by the checksum engine and its collaborators.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// No file path was supplied.
    #[error("file path is required")]
    MissingFilePath,

    /// The file could not be stat-ed (missing, unreadable).
    #[error("cannot stat {path}: {source}")]
    Stat {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Zero-length files cannot be multipart-checksummed.
    #[error("file size cannot be 0: {path}")]
    EmptyFile { path: String },

    /// Part size is below the S3 multipart minimum.
    #[error("part size {part_size} is below the {minimum} byte multipart minimum")]
    PartSizeTooSmall { part_size: u64, minimum: u64 },

    /// I/O failure while opening, seeking, or reading a part's byte range.
    #[error("part {part_number}: {source}")]
    Read {
        part_number: u32,
        #[source]
        source: io::Error,
    },

    /// Fewer bytes were available than the part's planned length
    /// (file truncated or modified while hashing).
    #[error("part {part_number}: read {got} bytes instead of the expected {expected}")]
    ShortRead {
        part_number: u32,
        expected: u64,
        got: u64,
    },

    /// A worker thread panicked or was lost before publishing its result.
    #[error("part worker terminated without a result")]
    WorkerLost,

    /// Aggregating an empty part list is undefined.
    #[error("cannot aggregate zero parts")]
    NoParts,
}

impl ChecksumError {
    /// True for errors detected during validation, before any part I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ChecksumError::MissingFilePath
                | ChecksumError::Stat { .. }
                | ChecksumError::EmptyFile { .. }
                | ChecksumError::PartSizeTooSmall { .. }
        )
    }

    /// The 1-based part this error originated from, if any.
    pub fn part_number(&self) -> Option<u32> {
        match self {
            ChecksumError::Read { part_number, .. }
            | ChecksumError::ShortRead { part_number, .. } => Some(*part_number),
            _ => None,
        }
    }
}

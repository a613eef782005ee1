//! Part range math and plan validation.
//!
//! Splits a file into fixed-size parts (the last part may be shorter) and
//! validates the inputs before any worker is dispatched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ChecksumError;

/// S3 multipart minimum part size (5 MiB).
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// A single part: byte range [start, end) (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRange {
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl PartRange {
    /// Length of this part in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True when the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Builds the part ranges for a given file size and part size.
///
/// All parts are `part_size` long except the last, which covers the
/// remainder. Returns an empty vec if `total_size` or `part_size` is 0.
pub fn plan_parts(total_size: u64, part_size: u64) -> Vec<PartRange> {
    if total_size == 0 || part_size == 0 {
        return Vec::new();
    }

    let count = total_size.div_ceil(part_size);
    let mut out = Vec::with_capacity(count as usize);
    let mut offset = 0u64;

    for _ in 0..count {
        let end = (offset + part_size).min(total_size);
        out.push(PartRange { start: offset, end });
        offset = end;
    }

    out
}

/// Validated plan for checksumming one file.
#[derive(Debug, Clone)]
pub struct PartPlan {
    /// Path to the source file.
    pub file_path: PathBuf,
    /// Size of the file at planning time.
    pub file_size: u64,
    /// Configured part size in bytes.
    pub part_size: u64,
}

impl PartPlan {
    /// Stats `path` and validates `part_size` against the multipart minimum.
    ///
    /// Errors before any part I/O: empty path, unreadable file, zero file
    /// size, part size below [`MIN_PART_SIZE`].
    pub fn for_file(path: &Path, part_size: u64) -> Result<PartPlan, ChecksumError> {
        if path.as_os_str().is_empty() {
            return Err(ChecksumError::MissingFilePath);
        }
        let meta = fs::metadata(path).map_err(|e| ChecksumError::Stat {
            path: path.display().to_string(),
            source: e,
        })?;
        let file_size = meta.len();
        if file_size == 0 {
            return Err(ChecksumError::EmptyFile {
                path: path.display().to_string(),
            });
        }
        if part_size < MIN_PART_SIZE {
            return Err(ChecksumError::PartSizeTooSmall {
                part_size,
                minimum: MIN_PART_SIZE,
            });
        }
        Ok(PartPlan {
            file_path: path.to_path_buf(),
            file_size,
            part_size,
        })
    }

    /// Number of parts: ceil(file_size / part_size).
    pub fn part_count(&self) -> u64 {
        self.file_size.div_ceil(self.part_size)
    }

    /// All part ranges, in ascending order.
    pub fn ranges(&self) -> Vec<PartRange> {
        plan_parts(self.file_size, self.part_size)
    }
}

//! Content-hash selection.
//!
//! The per-part content digest is pluggable (S3 supports several checksum
//! algorithms); the ETag side is always MD5. Hash state is held as
//! `DynDigest` so pooled accumulators can be reset and reused.

use std::fmt;
use std::str::FromStr;

use digest::{Digest, DynDigest};
use md5::Md5;
use serde::{Deserialize, Serialize};

/// Content digest algorithm for per-part checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentAlgorithm {
    /// SHA-256 (the S3 default for additional checksums).
    #[default]
    Sha256,
    /// SHA-1.
    Sha1,
}

impl ContentAlgorithm {
    /// Canonical lowercase name, as stored in manifests.
    pub fn name(self) -> &'static str {
        match self {
            ContentAlgorithm::Sha256 => "sha256",
            ContentAlgorithm::Sha1 => "sha1",
        }
    }

    /// Builds a fresh hash accumulator for this algorithm.
    pub fn new_hasher(self) -> Box<dyn DynDigest + Send> {
        match self {
            ContentAlgorithm::Sha256 => Box::new(sha2::Sha256::new()),
            ContentAlgorithm::Sha1 => Box::new(sha1::Sha1::new()),
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            ContentAlgorithm::Sha256 => 32,
            ContentAlgorithm::Sha1 => 20,
        }
    }
}

impl fmt::Display for ContentAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(ContentAlgorithm::Sha256),
            "sha1" => Ok(ContentAlgorithm::Sha1),
            other => Err(format!("unknown algorithm: {other} (expected sha256 or sha1)")),
        }
    }
}

/// Builds a fresh MD5 accumulator (ETag side).
pub fn new_md5() -> Md5 {
    Md5::new()
}

//! Checksum orchestration: bounded fan-out over parts, fan-in, sort,
//! hash-of-hashes aggregation.
//!
//! The engine dispatches one work item per part across at most `threads`
//! workers, collects results in completion order, sorts once by part number
//! after all workers have joined, and derives the aggregate checksum and
//! ETag-equivalent from the ordered per-part digests.

mod run;

use std::path::PathBuf;
use std::sync::Arc;

use digest::{Digest, DynDigest};
use md5::Md5;

use crate::error::ChecksumError;
use crate::hasher::{self, ContentAlgorithm};
use crate::manifest::Manifest;
use crate::part::PartInfo;
use crate::planner::PartPlan;
use crate::pool::Pool;
use crate::retry::RetryPolicy;

/// Options for building a [`ChecksumEngine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// File to checksum (must exist and be non-empty).
    pub file_path: PathBuf,
    /// Part size in bytes (>= the 5 MiB multipart minimum).
    pub part_size: u64,
    /// Maximum concurrent part workers.
    pub threads: usize,
    /// Content digest algorithm.
    pub algorithm: ContentAlgorithm,
    /// Optional retry policy for transient read failures.
    pub retry: Option<RetryPolicy>,
}

/// Multipart checksum engine for one file.
///
/// Holds the validated plan plus the three shared pools (part-sized byte
/// buffers, content-hash state, MD5 state) reused across workers.
pub struct ChecksumEngine {
    plan: PartPlan,
    threads: usize,
    algorithm: ContentAlgorithm,
    retry: Option<RetryPolicy>,
    buffers: Arc<Pool<Vec<u8>>>,
    hashers: Arc<Pool<Box<dyn DynDigest + Send>>>,
    md5s: Arc<Pool<Md5>>,
}

impl ChecksumEngine {
    /// Validates the inputs and builds an engine. Fails before any part I/O
    /// on a missing/empty file or an undersized part size.
    pub fn new(opts: EngineOptions) -> Result<Self, ChecksumError> {
        let plan = PartPlan::for_file(&opts.file_path, opts.part_size)?;
        let part_size = plan.part_size as usize;
        let algorithm = opts.algorithm;
        Ok(Self {
            plan,
            threads: opts.threads.max(1),
            algorithm,
            retry: opts.retry,
            buffers: Arc::new(Pool::new(move || vec![0u8; part_size])),
            hashers: Arc::new(Pool::new(move || algorithm.new_hasher())),
            md5s: Arc::new(Pool::new(hasher::new_md5)),
        })
    }

    /// The validated part plan.
    pub fn plan(&self) -> &PartPlan {
        &self.plan
    }

    /// Runs all part workers and aggregates into a [`Manifest`].
    ///
    /// Blocking; call [`compute_async`](Self::compute_async) from async code.
    /// The first worker error cancels remaining work and is returned to the
    /// caller; the engine never aborts the process.
    pub fn compute(&self) -> Result<Manifest, ChecksumError> {
        tracing::info!(
            file = %self.plan.file_path.display(),
            size = self.plan.file_size,
            parts = self.plan.part_count(),
            threads = self.threads,
            algorithm = %self.algorithm,
            "computing multipart checksum"
        );

        let parts = run::run_parts(self)?;
        let (checksum, etag) = self.aggregate(&parts)?;

        Ok(Manifest {
            filename: self.plan.file_path.display().to_string(),
            part_size: self.plan.part_size,
            algorithm: self.algorithm,
            parts,
            checksum,
            etag,
        })
    }

    /// Runs [`compute`](Self::compute) on a blocking thread for async callers.
    pub async fn compute_async(self: Arc<Self>) -> anyhow::Result<Manifest> {
        let manifest = tokio::task::spawn_blocking(move || self.compute())
            .await
            .map_err(|e| anyhow::anyhow!("checksum task join: {}", e))??;
        Ok(manifest)
    }

    /// Aggregation rule matching the S3 multipart convention.
    ///
    /// One part: the part's digests verbatim (no further hashing). More than
    /// one: hash of the concatenated per-part digests, in part order. Zero
    /// parts is rejected rather than producing an undefined digest.
    fn aggregate(&self, parts: &[PartInfo]) -> Result<(Vec<u8>, Vec<u8>), ChecksumError> {
        match parts {
            [] => Err(ChecksumError::NoParts),
            [single] => Ok((single.checksum.clone(), single.md5_checksum.clone())),
            many => {
                let mut hasher = self.hashers.acquire();
                hasher.reset();
                let mut md5 = self.md5s.acquire();
                Digest::reset(&mut *md5);
                for part in many {
                    hasher.update(&part.checksum);
                    Digest::update(&mut *md5, &part.md5_checksum);
                }
                let checksum = hasher.finalize_reset().to_vec();
                let etag = Digest::finalize_reset(&mut *md5).to_vec();
                Ok((checksum, etag))
            }
        }
    }
}

//! Verify command: recompute a file's aggregate and compare against a
//! provider-reported ETag or a stored manifest.

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;

use s3sum_core::config::S3sumConfig;
use s3sum_core::engine::{ChecksumEngine, EngineOptions};
use s3sum_core::manifest::read_manifest;
use s3sum_core::s3url::parse_etag;

use super::part_size_bytes;

pub async fn run_verify(
    cfg: &S3sumConfig,
    file: &Path,
    etag: Option<&str>,
    manifest_path: Option<&Path>,
    chunksize: Option<u64>,
    threads: Option<usize>,
) -> Result<()> {
    // When verifying against a manifest, reuse its part size and algorithm
    // so the aggregate is computed the same way it was recorded.
    let stored = manifest_path.map(read_manifest).transpose()?;
    let (part_size, algorithm) = match &stored {
        Some(m) => (m.part_size, m.algorithm),
        None => (
            part_size_bytes(chunksize.unwrap_or(cfg.part_size_mib))?,
            cfg.algorithm,
        ),
    };

    let engine = Arc::new(ChecksumEngine::new(EngineOptions {
        file_path: file.to_path_buf(),
        part_size,
        threads: threads.unwrap_or(cfg.threads),
        algorithm,
        retry: cfg.retry.as_ref().map(|r| r.to_policy()),
    })?);
    let computed = engine.compute_async().await?;

    if let Some(stored) = stored {
        if computed.checksum != stored.checksum || computed.etag != stored.etag {
            bail!(
                "manifest mismatch for {}: computed etag {}, manifest etag {}",
                file.display(),
                computed.etag_string(),
                stored.etag_string()
            );
        }
        println!("OK: {} matches manifest", file.display());
        return Ok(());
    }

    let Some(etag) = etag else {
        bail!("either --etag or --manifest is required");
    };
    let (remote_bytes, remote_parts) = parse_etag(etag)?;
    if let Some(remote_parts) = remote_parts {
        let local_parts = computed.part_count() as u32;
        if remote_parts != local_parts {
            bail!(
                "part count mismatch: remote etag has {} parts, local plan has {} \
                 (was the object uploaded with a different chunksize?)",
                remote_parts,
                local_parts
            );
        }
    }
    if computed.etag != remote_bytes {
        bail!(
            "etag mismatch for {}: computed {}, remote {}",
            file.display(),
            computed.etag_string(),
            etag
        );
    }
    println!("OK: {} matches etag {}", file.display(), etag);
    Ok(())
}

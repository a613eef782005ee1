//! Checksum command: compute per-part and aggregate checksums of a file.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use s3sum_core::config::S3sumConfig;
use s3sum_core::engine::{ChecksumEngine, EngineOptions};
use s3sum_core::hasher::ContentAlgorithm;
use s3sum_core::manifest::write_manifest;
use s3sum_core::render::{self, Encoding};

use super::part_size_bytes;

pub async fn run_checksum(
    cfg: &S3sumConfig,
    file: &Path,
    manifest_out: Option<&Path>,
    chunksize: Option<u64>,
    threads: Option<usize>,
    algorithm: Option<ContentAlgorithm>,
    print_hex: bool,
) -> Result<()> {
    let encoding = if print_hex || cfg.print_hex {
        Encoding::Hex
    } else {
        Encoding::Base64
    };

    let engine = Arc::new(ChecksumEngine::new(EngineOptions {
        file_path: file.to_path_buf(),
        part_size: part_size_bytes(chunksize.unwrap_or(cfg.part_size_mib))?,
        threads: threads.unwrap_or(cfg.threads),
        algorithm: algorithm.unwrap_or(cfg.algorithm),
        retry: cfg.retry.as_ref().map(|r| r.to_policy()),
    })?);
    let manifest = engine.compute_async().await?;

    for part in &manifest.parts {
        println!(
            "Part: {:05}\t\t{}",
            part.part_number,
            render::encode(&part.checksum, encoding)
        );
    }
    println!("Checksum of checksums: {}", manifest.checksum_string(encoding));
    println!("Etag: {}", manifest.etag_string());

    if let Some(path) = manifest_out {
        write_manifest(path, &manifest)?;
        println!("Manifest written to {}", path.display());
    }

    Ok(())
}

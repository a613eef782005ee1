//! CLI for the s3sum multipart checksum tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use s3sum_core::config;
use s3sum_core::hasher::ContentAlgorithm;
use std::path::PathBuf;

use commands::{run_checksum, run_verify};

/// Top-level CLI for the s3sum multipart checksum tool.
#[derive(Debug, Parser)]
#[command(name = "s3sum")]
#[command(about = "Multipart checksums and ETags for S3 integrity checking", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute per-part checksums and the aggregate checksum/ETag of a file.
    Checksum {
        /// Path to the file.
        file: PathBuf,

        /// Write a JSON manifest with all parts and checksums for later verification.
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Part size in MiB (default from config; S3 minimum is 5).
        #[arg(long, value_name = "MIB")]
        chunksize: Option<u64>,

        /// Number of concurrent part workers (default from config).
        #[arg(long, value_name = "N")]
        threads: Option<usize>,

        /// Content digest algorithm: sha256 or sha1.
        #[arg(long, value_name = "ALGO")]
        algorithm: Option<ContentAlgorithm>,

        /// Print checksums in hex instead of base64.
        #[arg(long)]
        print_hex: bool,
    },

    /// Recompute a file's aggregate and compare against an S3 ETag or a stored manifest.
    Verify {
        /// Path to the file.
        file: PathBuf,

        /// Provider-reported ETag string, e.g. "abc123...-4" (quotes optional).
        #[arg(long, value_name = "ETAG", conflicts_with = "manifest")]
        etag: Option<String>,

        /// Manifest written by `s3sum checksum --manifest`.
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,

        /// Part size in MiB used for the upload (default from config).
        #[arg(long, value_name = "MIB")]
        chunksize: Option<u64>,

        /// Number of concurrent part workers (default from config).
        #[arg(long, value_name = "N")]
        threads: Option<usize>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Checksum {
                file,
                manifest,
                chunksize,
                threads,
                algorithm,
                print_hex,
            } => {
                run_checksum(&cfg, &file, manifest.as_deref(), chunksize, threads, algorithm, print_hex)
                    .await?;
            }
            CliCommand::Verify {
                file,
                etag,
                manifest,
                chunksize,
                threads,
            } => {
                run_verify(&cfg, &file, etag.as_deref(), manifest.as_deref(), chunksize, threads)
                    .await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

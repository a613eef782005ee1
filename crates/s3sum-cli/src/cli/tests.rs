//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use s3sum_core::hasher::ContentAlgorithm;
use std::path::PathBuf;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_checksum_defaults() {
    match parse(&["s3sum", "checksum", "big.iso"]) {
        CliCommand::Checksum {
            file,
            manifest,
            chunksize,
            threads,
            algorithm,
            print_hex,
        } => {
            assert_eq!(file, PathBuf::from("big.iso"));
            assert!(manifest.is_none());
            assert!(chunksize.is_none());
            assert!(threads.is_none());
            assert!(algorithm.is_none());
            assert!(!print_hex);
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_checksum_all_flags() {
    match parse(&[
        "s3sum",
        "checksum",
        "big.iso",
        "--manifest",
        "out.json",
        "--chunksize",
        "10",
        "--threads",
        "8",
        "--algorithm",
        "sha1",
        "--print-hex",
    ]) {
        CliCommand::Checksum {
            manifest,
            chunksize,
            threads,
            algorithm,
            print_hex,
            ..
        } => {
            assert_eq!(manifest, Some(PathBuf::from("out.json")));
            assert_eq!(chunksize, Some(10));
            assert_eq!(threads, Some(8));
            assert_eq!(algorithm, Some(ContentAlgorithm::Sha1));
            assert!(print_hex);
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_checksum_rejects_bad_algorithm() {
    assert!(Cli::try_parse_from(["s3sum", "checksum", "f", "--algorithm", "crc999"]).is_err());
}

#[test]
fn cli_parse_verify_with_etag() {
    match parse(&["s3sum", "verify", "big.iso", "--etag", "\"abc-4\""]) {
        CliCommand::Verify {
            file,
            etag,
            manifest,
            ..
        } => {
            assert_eq!(file, PathBuf::from("big.iso"));
            assert_eq!(etag.as_deref(), Some("\"abc-4\""));
            assert!(manifest.is_none());
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_verify_with_manifest() {
    match parse(&["s3sum", "verify", "big.iso", "--manifest", "m.json"]) {
        CliCommand::Verify { manifest, etag, .. } => {
            assert_eq!(manifest, Some(PathBuf::from("m.json")));
            assert!(etag.is_none());
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_verify_etag_conflicts_with_manifest() {
    assert!(Cli::try_parse_from([
        "s3sum", "verify", "f", "--etag", "abc", "--manifest", "m.json"
    ])
    .is_err());
}

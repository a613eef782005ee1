//! Integration test: checksum a multi-part file end to end, persist the
//! manifest, and verify the rendered ETag against an independent computation.

use std::io::Write;

use digest::Digest;
use md5::Md5;
use sha2::Sha256;

use s3sum_core::engine::{ChecksumEngine, EngineOptions};
use s3sum_core::hasher::ContentAlgorithm;
use s3sum_core::manifest::{read_manifest, write_manifest};
use s3sum_core::render::Encoding;
use s3sum_core::s3url::parse_etag;

const MIB: u64 = 1024 * 1024;

#[test]
fn multipart_checksum_manifest_and_verify_round_trip() {
    // 17 MiB at 5 MiB parts: 4 parts, last part 2 MiB.
    let data: Vec<u8> = (0..17 * MIB as usize)
        .map(|i| (i % 251) as u8)
        .collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let engine = ChecksumEngine::new(EngineOptions {
        file_path: file.path().to_path_buf(),
        part_size: 5 * MIB,
        threads: 4,
        algorithm: ContentAlgorithm::Sha256,
        retry: None,
    })
    .unwrap();
    let manifest = engine.compute().unwrap();

    // Independent aggregate: hash each range directly, then hash the digests.
    let bounds = [0, 5 * MIB, 10 * MIB, 15 * MIB, 17 * MIB];
    let mut sha_digests = Vec::new();
    let mut md5_digests = Vec::new();
    for w in bounds.windows(2) {
        let chunk = &data[w[0] as usize..w[1] as usize];
        sha_digests.extend_from_slice(&Sha256::digest(chunk));
        md5_digests.extend_from_slice(&Md5::digest(chunk));
    }
    assert_eq!(manifest.checksum, Sha256::digest(&sha_digests).to_vec());
    assert_eq!(manifest.etag, Md5::digest(&md5_digests).to_vec());
    assert_eq!(manifest.parts.len(), 4);
    assert_eq!(manifest.parts[3].size, 2 * MIB);

    // Per-part digests match direct hashing of each range.
    for (part, w) in manifest.parts.iter().zip(bounds.windows(2)) {
        let chunk = &data[w[0] as usize..w[1] as usize];
        assert_eq!(part.checksum, Sha256::digest(chunk).to_vec());
        assert_eq!(part.md5_checksum, Md5::digest(chunk).to_vec());
    }

    // Manifest survives a write/read round trip.
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("manifest.json");
    write_manifest(&manifest_path, &manifest).unwrap();
    let restored = read_manifest(&manifest_path).unwrap();
    assert_eq!(restored, manifest);

    // The rendered ETag parses back to the raw digest plus part count,
    // the way a provider-reported ETag would be compared.
    let etag_string = manifest.etag_string();
    assert!(etag_string.ends_with("-4"));
    let (etag_bytes, part_count) = parse_etag(&etag_string).unwrap();
    assert_eq!(etag_bytes, manifest.etag);
    assert_eq!(part_count, Some(4));

    // Checksum rendering is suffixed in both encodings, raw bytes unsuffixed.
    let hex_rendering = manifest.checksum_string(Encoding::Hex);
    assert_eq!(
        hex_rendering,
        format!("{}-4", hex::encode(&manifest.checksum))
    );
    assert!(manifest.checksum_string(Encoding::Base64).ends_with("-4"));
}

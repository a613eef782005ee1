//! Per-part read-and-hash worker.
//!
//! Each worker opens its own file handle and reads exactly one part's byte
//! range, so concurrent parts never share a file cursor. Buffers and hash
//! state come from the shared pools; digests are copied out before the
//! pooled state is released.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use digest::{Digest, DynDigest};
use md5::Md5;
use serde::{Deserialize, Serialize};

use crate::error::ChecksumError;
use crate::hasher::ContentAlgorithm;
use crate::manifest::hex_bytes;
use crate::planner::PartRange;
use crate::pool::Pool;

/// Checksums for one part. Created once by a worker, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartInfo {
    /// 1-based part ordinal (S3 part numbering).
    pub part_number: u32,
    /// Bytes covered by this part.
    pub size: u64,
    /// Content digest algorithm.
    pub algorithm: ContentAlgorithm,
    /// Content digest over the part's bytes.
    #[serde(with = "hex_bytes")]
    pub checksum: Vec<u8>,
    /// MD5 digest over the same bytes (ETag side).
    #[serde(with = "hex_bytes")]
    pub md5_checksum: Vec<u8>,
}

/// Reads the part's byte range and computes its content digest and MD5.
///
/// `part_number` is 1-based; `range` must lie within the file. A short read
/// (file truncated or modified while hashing) is an error naming the part.
pub(crate) fn checksum_part(
    path: &Path,
    range: PartRange,
    part_number: u32,
    algorithm: ContentAlgorithm,
    buffers: &Pool<Vec<u8>>,
    hashers: &Pool<Box<dyn DynDigest + Send>>,
    md5s: &Pool<Md5>,
) -> Result<PartInfo, ChecksumError> {
    let size = range.len();
    let read_err = |source| ChecksumError::Read { part_number, source };

    let mut file = File::open(path).map_err(read_err)?;
    file.seek(SeekFrom::Start(range.start)).map_err(read_err)?;

    // Pooled buffer may be dirty from a previous part; slice to exactly the
    // bytes this part covers so stale tail bytes are never hashed.
    let mut buf = buffers.acquire();
    let data = &mut buf[..size as usize];

    let got = read_full(&mut file, data).map_err(read_err)?;
    if (got as u64) < size {
        return Err(ChecksumError::ShortRead {
            part_number,
            expected: size,
            got: got as u64,
        });
    }

    let mut hasher = hashers.acquire();
    hasher.reset();
    hasher.update(data);
    let checksum = hasher.finalize_reset().to_vec();

    let mut md5 = md5s.acquire();
    Digest::reset(&mut *md5);
    Digest::update(&mut *md5, &data[..]);
    let md5_checksum = Digest::finalize_reset(&mut *md5).to_vec();

    Ok(PartInfo {
        part_number,
        size,
        algorithm,
        checksum,
        md5_checksum,
    })
}

/// Reads until `buf` is full or EOF; returns the number of bytes read.
/// Interrupted syscalls are resumed rather than failing the part.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

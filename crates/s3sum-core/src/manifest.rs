//! Manifest: the persisted record of parts and aggregates.
//!
//! Serialized as JSON with digests hex-encoded, so a file can be re-verified
//! later without recomputing against the remote object.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hasher::ContentAlgorithm;
use crate::part::PartInfo;
use crate::render;

/// Hex-encode `Vec<u8>` fields in serde output (`#[serde(with = "hex_bytes")]`).
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Aggregate result for one file: ordered parts plus the whole-object
/// checksum-of-checksums and ETag-equivalent. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Source file path as given to the engine.
    pub filename: String,
    /// Configured part size in bytes.
    pub part_size: u64,
    /// Content digest algorithm used for all parts.
    pub algorithm: ContentAlgorithm,
    /// Per-part checksums, ascending part number.
    pub parts: Vec<PartInfo>,
    /// Aggregate content digest (raw bytes, no part-count suffix).
    #[serde(with = "hex_bytes")]
    pub checksum: Vec<u8>,
    /// Aggregate MD5 / ETag-equivalent (raw bytes, no suffix).
    #[serde(with = "hex_bytes")]
    pub etag: Vec<u8>,
}

impl Manifest {
    /// Number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Rendered aggregate checksum, `-N` suffixed when multipart.
    pub fn checksum_string(&self, encoding: render::Encoding) -> String {
        render::render_checksum(&self.checksum, self.part_count(), encoding)
    }

    /// Rendered ETag-equivalent (always hex, `-N` suffixed when multipart).
    pub fn etag_string(&self) -> String {
        render::render_etag(&self.etag, self.part_count())
    }
}

/// Writes the manifest as pretty JSON.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json).with_context(|| format!("write manifest {}", path.display()))?;
    tracing::info!("wrote manifest to {}", path.display());
    Ok(())
}

/// Reads a manifest written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read manifest {}", path.display()))?;
    let manifest = serde_json::from_str(&data)
        .with_context(|| format!("parse manifest {}", path.display()))?;
    Ok(manifest)
}

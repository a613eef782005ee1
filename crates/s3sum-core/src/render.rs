//! Digest rendering: hex or base64, with the S3 multipart `-N` suffix.
//!
//! The suffix belongs only to the rendered string; raw digest bytes are what
//! get compared. Encoding is an explicit argument, never process-wide state.

use base64::prelude::{Engine as _, BASE64_STANDARD};

/// Textual encoding for digests. S3 reports additional checksums in base64;
/// hex is the familiar `sha256sum` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Standard base64 (S3 checksum reporting default).
    #[default]
    Base64,
    /// Lowercase hex.
    Hex,
}

/// Encodes raw digest bytes with the chosen encoding.
pub fn encode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Base64 => BASE64_STANDARD.encode(bytes),
        Encoding::Hex => hex::encode(bytes),
    }
}

/// Renders an aggregate content checksum. Multipart aggregates carry the
/// `-N` part-count suffix; a single-part digest is rendered bare.
pub fn render_checksum(digest: &[u8], part_count: usize, encoding: Encoding) -> String {
    let rendered = encode(digest, encoding);
    if part_count > 1 {
        format!("{rendered}-{part_count}")
    } else {
        rendered
    }
}

/// Renders an ETag-equivalent. S3 ETags are always hex.
pub fn render_etag(etag: &[u8], part_count: usize) -> String {
    render_checksum(etag, part_count, Encoding::Hex)
}

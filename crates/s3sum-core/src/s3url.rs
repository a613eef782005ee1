//! S3 URL and ETag string helpers.
//!
//! Splits `s3://bucket/key` URLs and parses provider-reported ETag strings
//! (possibly quoted, possibly `-N` suffixed) into raw bytes for comparison
//! against a locally computed aggregate.

use anyhow::{bail, Context, Result};
use url::Url;

/// Splits an `s3://bucket/path/to/key` URL into bucket and key.
pub fn extract_bucket_and_key(s3_url: &str) -> Result<(String, String)> {
    let url = Url::parse(s3_url).with_context(|| format!("parse {s3_url}"))?;
    if url.scheme() != "s3" {
        bail!("expected an s3:// URL, got {s3_url}");
    }
    let bucket = url
        .host_str()
        .filter(|h| !h.is_empty())
        .with_context(|| format!("missing bucket in {s3_url}"))?
        .to_string();
    let key = url.path().trim_start_matches('/').to_string();
    if key.is_empty() {
        bail!("missing object key in {s3_url}");
    }
    Ok((bucket, key))
}

/// Parses an S3 ETag string into raw digest bytes and optional part count.
///
/// Accepts the quoted form S3 returns (`"abc123-4"`) as well as bare
/// `abc123` single-part ETags.
pub fn parse_etag(etag: &str) -> Result<(Vec<u8>, Option<u32>)> {
    let trimmed = etag.trim().trim_matches('"');
    let (hex_part, count) = match trimmed.split_once('-') {
        Some((digest, n)) => {
            let count: u32 = n
                .parse()
                .with_context(|| format!("bad part count in etag {etag}"))?;
            (digest, Some(count))
        }
        None => (trimmed, None),
    };
    let bytes = hex::decode(hex_part).with_context(|| format!("bad hex in etag {etag}"))?;
    Ok((bytes, count))
}

//! CLI command handlers. Each command is in its own file for clarity.

mod checksum;
mod verify;

pub use checksum::run_checksum;
pub use verify::run_verify;

use anyhow::{bail, Result};

const MIB: u64 = 1024 * 1024;

/// Converts a `--chunksize` value in MiB to bytes, rejecting values that
/// overflow instead of wrapping to a tiny part size.
fn part_size_bytes(chunksize_mib: u64) -> Result<u64> {
    match chunksize_mib.checked_mul(MIB) {
        Some(bytes) => Ok(bytes),
        None => bail!("chunksize {} MiB is too large", chunksize_mib),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_size_bytes_converts_mib() {
        assert_eq!(part_size_bytes(5).unwrap(), 5 * 1024 * 1024);
        assert_eq!(part_size_bytes(64).unwrap(), 64 * 1024 * 1024);
    }

    #[test]
    fn part_size_bytes_rejects_overflow() {
        assert!(part_size_bytes(u64::MAX).is_err());
        assert!(part_size_bytes(u64::MAX / 1024).is_err());
    }
}

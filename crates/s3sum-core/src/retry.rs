//! Retry and backoff policy for part reads.
//!
//! Transient I/O failures (interrupted syscalls, timeouts) can be retried
//! with exponential backoff; a short read means the file shrank underneath
//! us and retrying will not help.

use std::io;
use std::time::Duration;

use crate::error::ChecksumError;

/// High-level classification of a part error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Read timed out.
    Timeout,
    /// Interrupted syscall or transient unavailability.
    Interrupted,
    /// Any other error (not retried).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Simple exponential backoff policy with caps.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Compute the next backoff delay for a given attempt and error kind.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns
    /// `RetryDecision::NoRetry` when we should stop retrying.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout | ErrorKind::Interrupted => {
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let raw = self.base_delay.saturating_mul(exp);
                RetryDecision::RetryAfter(raw.min(self.max_delay))
            }
        }
    }
}

/// Classify an I/O error kind for retry decisions.
pub fn classify_io(kind: io::ErrorKind) -> ErrorKind {
    match kind {
        io::ErrorKind::TimedOut => ErrorKind::Timeout,
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => ErrorKind::Interrupted,
        _ => ErrorKind::Other,
    }
}

/// Classify a checksum error. Only plain read failures are ever retryable;
/// short reads and config errors are final.
pub fn classify(e: &ChecksumError) -> ErrorKind {
    match e {
        ChecksumError::Read { source, .. } => classify_io(source.kind()),
        _ => ErrorKind::Other,
    }
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, ChecksumError>
where
    F: FnMut() -> Result<T, ChecksumError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?d, "retrying part read: {}", e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_retry_for_other() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let mut p = RetryPolicy::default();
        p.max_attempts = 20;
        let d1 = match p.decide(1, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            _ => panic!("expected retry"),
        };
        let d2 = match p.decide(2, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            _ => panic!("expected retry"),
        };
        assert!(d2 >= d1);
        let d_last = match p.decide(15, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            _ => panic!("expected retry"),
        };
        assert!(d_last <= p.max_delay);
    }

    #[test]
    fn short_read_is_not_retryable() {
        let e = ChecksumError::ShortRead {
            part_number: 1,
            expected: 10,
            got: 5,
        };
        assert_eq!(classify(&e), ErrorKind::Other);
    }

    #[test]
    fn interrupted_read_is_retryable() {
        let e = ChecksumError::Read {
            part_number: 1,
            source: std::io::Error::from(std::io::ErrorKind::Interrupted),
        };
        assert_eq!(classify(&e), ErrorKind::Interrupted);
    }

    #[test]
    fn run_with_retry_recovers_after_transient_failure() {
        let mut p = RetryPolicy::default();
        p.base_delay = Duration::from_millis(1);
        let mut calls = 0u32;
        let out = run_with_retry(&p, || {
            calls += 1;
            if calls < 2 {
                Err(ChecksumError::Read {
                    part_number: 1,
                    source: std::io::Error::from(std::io::ErrorKind::Interrupted),
                })
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(out, 2);
    }

    #[test]
    fn run_with_retry_gives_up_on_final_error() {
        let p = RetryPolicy::default();
        let mut calls = 0u32;
        let err = run_with_retry(&p, || -> Result<(), ChecksumError> {
            calls += 1;
            Err(ChecksumError::NoParts)
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, ChecksumError::NoParts));
    }
}

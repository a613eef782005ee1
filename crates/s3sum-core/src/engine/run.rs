//! Bounded worker pool over the part queue.
//!
//! At most `threads` workers run concurrently; each pulls the next part from
//! a shared queue, hashes it, and publishes the result on an unbounded
//! channel, so publishing never blocks a worker slot. The first error sets a
//! shared cancellation flag and siblings stop before taking new work. The
//! channel drains only after every worker has exited; the post-join sort by
//! part number is the sole ordering guarantee.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use crate::error::ChecksumError;
use crate::part::{checksum_part, PartInfo};
use crate::retry::run_with_retry;

use super::ChecksumEngine;

pub(super) fn run_parts(engine: &ChecksumEngine) -> Result<Vec<PartInfo>, ChecksumError> {
    let ranges = engine.plan.ranges();
    let count = ranges.len();

    let work: Arc<Mutex<VecDeque<_>>> = Arc::new(Mutex::new(
        ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| (i as u32 + 1, range))
            .collect(),
    ));
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Result<PartInfo, ChecksumError>>();

    let num_workers = engine.threads.min(count).max(1);
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let work = Arc::clone(&work);
        let cancel = Arc::clone(&cancel);
        let tx = tx.clone();
        let path = engine.plan.file_path.clone();
        let algorithm = engine.algorithm;
        let retry = engine.retry;
        let buffers = Arc::clone(&engine.buffers);
        let hashers = Arc::clone(&engine.hashers);
        let md5s = Arc::clone(&engine.md5s);
        handles.push(std::thread::spawn(move || {
            loop {
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                let (part_number, range) = match work.lock().expect("work queue lock").pop_front()
                {
                    Some(item) => item,
                    None => break,
                };
                let res = match retry.as_ref() {
                    Some(policy) => run_with_retry(policy, || {
                        checksum_part(&path, range, part_number, algorithm, &buffers, &hashers, &md5s)
                    }),
                    None => {
                        checksum_part(&path, range, part_number, algorithm, &buffers, &hashers, &md5s)
                    }
                };
                if res.is_err() {
                    cancel.store(true, Ordering::Relaxed);
                }
                let _ = tx.send(res);
            }
        }));
    }
    drop(tx);

    // recv() disconnects only once every worker has exited and dropped its
    // sender, so this drain doubles as the completion barrier.
    let mut parts = Vec::with_capacity(count);
    let mut first_error: Option<ChecksumError> = None;
    while let Ok(res) = rx.recv() {
        match res {
            Ok(info) => {
                tracing::debug!(part = info.part_number, size = info.size, "part checksummed");
                parts.push(info);
            }
            Err(e) => {
                tracing::warn!("part checksum failed: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    for handle in handles {
        if handle.join().is_err() && first_error.is_none() {
            first_error = Some(ChecksumError::WorkerLost);
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    if parts.len() != count {
        return Err(ChecksumError::WorkerLost);
    }

    // Completion order is unspecified; this single post-join sort restores
    // ascending part numbers.
    parts.sort_by_key(|p| p.part_number);
    Ok(parts)
}

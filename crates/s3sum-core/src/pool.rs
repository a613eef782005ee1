//! Reusable-object pools for buffers and hash state.
//!
//! Workers acquire part-sized buffers and hash accumulators from shared
//! pools instead of reallocating per part. Acquire may hand back a
//! previously-used instance: hash state must be reset before accumulating
//! and buffers must be re-sliced to the current part's exact length.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A pool of reusable `T` instances, safe for concurrent acquire/release.
///
/// `acquire` pops an idle instance or builds a fresh one from the factory;
/// it never blocks waiting for a release. The returned guard puts the
/// instance back on drop, on every exit path.
pub struct Pool<T> {
    items: Mutex<Vec<T>>,
    make: Box<dyn Fn() -> T + Send + Sync>,
    allocated: AtomicUsize,
    acquisitions: AtomicUsize,
}

impl<T> Pool<T> {
    /// Creates an empty pool backed by `make`.
    pub fn new(make: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            make: Box::new(make),
            allocated: AtomicUsize::new(0),
            acquisitions: AtomicUsize::new(0),
        }
    }

    /// Acquires an instance, reusing an idle one when available.
    pub fn acquire(&self) -> PoolGuard<'_, T> {
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        let item = self.items.lock().expect("pool lock poisoned").pop();
        let item = match item {
            Some(it) => it,
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                (self.make)()
            }
        };
        PoolGuard {
            pool: self,
            item: Some(item),
        }
    }

    /// Total instances ever built by the factory. With `k` concurrent
    /// holders this never exceeds `k`.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Total acquire calls, reuses included.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::Relaxed)
    }

    fn release(&self, item: T) {
        self.items.lock().expect("pool lock poisoned").push(item);
    }
}

/// Scoped handle to a pooled instance; returns it to the pool on drop.
pub struct PoolGuard<'a, T> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item.as_ref().expect("pool item taken")
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().expect("pool item taken")
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn acquire_allocates_then_reuses() {
        let pool: Pool<Vec<u8>> = Pool::new(|| vec![0u8; 16]);
        {
            let mut a = pool.acquire();
            a[0] = 7;
        }
        assert_eq!(pool.allocated(), 1);
        // Same buffer comes back, stale contents included.
        let b = pool.acquire();
        assert_eq!(pool.allocated(), 1);
        assert_eq!(pool.acquisitions(), 2);
        assert_eq!(b[0], 7);
    }

    #[test]
    fn concurrent_holders_allocate_independently() {
        let pool: Pool<Vec<u8>> = Pool::new(|| vec![0u8; 4]);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.allocated(), 2);
        drop(a);
        drop(b);
        let _c = pool.acquire();
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn release_happens_on_panic_path() {
        let pool: Arc<Pool<u32>> = Arc::new(Pool::new(|| 0));
        let p = Arc::clone(&pool);
        let res = std::thread::spawn(move || {
            let _g = p.acquire();
            panic!("worker failed");
        })
        .join();
        assert!(res.is_err());
        // The guard dropped during unwinding, so the instance is idle again.
        let _g = pool.acquire();
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn shared_across_threads() {
        let pool: Arc<Pool<Vec<u8>>> = Arc::new(Pool::new(|| vec![0u8; 8]));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let p = Arc::clone(&pool);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let mut g = p.acquire();
                    g[0] = g[0].wrapping_add(1);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        // Never more live instances than threads.
        assert!(pool.allocated() <= 4);
    }
}

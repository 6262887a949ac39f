//! Counting-semaphore admission limiter.
//!
//! The batch runner owns two of these: one bounds how many panoramas are
//! processed at once, the other bounds how many tile requests are in flight
//! across every panorama. The HTTP client uses the same type for its global
//! and per-host connection caps.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gsvpd::pipeline::ConcurrencyLimiter;
//!
//! let limiter = Arc::new(ConcurrencyLimiter::new("tiles", 128));
//!
//! async fn fetch(limiter: Arc<ConcurrencyLimiter>) {
//!     let _permit = limiter.acquire().await;
//!     // HTTP request happens here...
//!     // permit is released when _permit goes out of scope
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded-concurrency limiter with in-flight statistics.
///
/// Each batch creates its own instances, so two batches running in the same
/// process never share admission state.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    /// Label used in diagnostics
    name: &'static str,

    /// Semaphore controlling admission
    semaphore: Arc<Semaphore>,

    /// Maximum permits (for stats/debugging)
    max_permits: usize,

    /// Current number of permits held
    in_flight: AtomicUsize,

    /// Peak concurrent permits observed (for tuning)
    peak_in_flight: AtomicUsize,
}

impl ConcurrencyLimiter {
    /// Creates a new limiter admitting at most `max_concurrent` holders.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(name: &'static str, max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            name,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a permit, waiting until one is available.
    ///
    /// The permit is automatically released when dropped.
    pub async fn acquire(&self) -> ConcurrencyPermit<'_> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed unexpectedly");

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);

        ConcurrencyPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        }
    }

    /// Returns the diagnostic label of this limiter.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the maximum number of concurrent holders allowed.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of permits held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of concurrent holders observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }
}

/// A held admission slot.
///
/// While this permit is held it counts against the limiter's capacity.
pub struct ConcurrencyPermit<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
}

impl Drop for ConcurrencyPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_limiter() {
        let limiter = ConcurrencyLimiter::new("tiles", 128);
        assert_eq!(limiter.name(), "tiles");
        assert_eq!(limiter.max_concurrent(), 128);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.peak_in_flight(), 0);
    }

    #[test]
    #[should_panic(expected = "max_concurrent must be > 0")]
    fn test_zero_concurrency_panics() {
        ConcurrencyLimiter::new("tiles", 0);
    }

    #[tokio::test]
    async fn test_acquire_releases_on_drop() {
        let limiter = ConcurrencyLimiter::new("panoramas", 2);

        {
            let _permit1 = limiter.acquire().await;
            assert_eq!(limiter.in_flight(), 1);

            {
                let _permit2 = limiter.acquire().await;
                assert_eq!(limiter.in_flight(), 2);
            }

            assert_eq!(limiter.in_flight(), 1);
        }

        assert_eq!(limiter.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_acquire_waits_when_full() {
        let limiter = Arc::new(ConcurrencyLimiter::new("tiles", 1));
        let held = limiter.acquire().await;

        let waiter = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                let _permit = limiter.acquire().await;
            })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(held);
        waiter.await.unwrap();
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_peak_tracking() {
        let limiter = ConcurrencyLimiter::new("tiles", 10);

        let _p1 = limiter.acquire().await;
        let p2 = limiter.acquire().await;
        let p3 = limiter.acquire().await;
        assert_eq!(limiter.peak_in_flight(), 3);

        drop(p3);
        drop(p2);

        assert_eq!(limiter.peak_in_flight(), 3);
        assert_eq!(limiter.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_acquire_never_exceeds_capacity() {
        let limiter = Arc::new(ConcurrencyLimiter::new("tiles", 5));
        let mut handles = Vec::new();

        for _ in 0..20 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await;
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(limiter.peak_in_flight() <= 5);
        assert_eq!(limiter.in_flight(), 0);
    }
}

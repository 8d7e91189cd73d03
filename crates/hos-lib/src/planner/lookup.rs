//! Stop location lookup
//!
//! The planner labels stops through an injected lookup. Lookups are
//! fallible and may be slow; `BoundedLookup` caps how long the planner
//! waits for one.

use crate::error::LookupError;
use crate::models::Coordinate;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Default time the planner waits for a single stop lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(500);

/// Resolves a stop category near an approximate coordinate
pub trait LocationLookup: Send + Sync {
    fn lookup(&self, category: &str, near: Coordinate) -> Result<Coordinate, LookupError>;
}

/// Labels every stop with the interpolated route position
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLookup;

impl LocationLookup for PassthroughLookup {
    fn lookup(&self, _category: &str, near: Coordinate) -> Result<Coordinate, LookupError> {
        Ok(near)
    }
}

/// Lookup with no backend; every stop falls back to its sentinel label
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLookup;

impl LocationLookup for UnavailableLookup {
    fn lookup(&self, _category: &str, _near: Coordinate) -> Result<Coordinate, LookupError> {
        Err(LookupError::NotFound)
    }
}

/// Runs the inner lookup on the runtime's blocking pool and gives up after `timeout`
///
/// The caller must not be an async task of the same runtime; the planner
/// is driven from `spawn_blocking`. A lookup that has not started when the
/// timeout fires is aborted; one already running finishes on its pooled
/// thread and its result is dropped.
pub struct BoundedLookup {
    inner: Arc<dyn LocationLookup>,
    timeout: Duration,
    runtime: Handle,
}

impl BoundedLookup {
    pub fn new(inner: Arc<dyn LocationLookup>, timeout: Duration, runtime: Handle) -> Self {
        Self {
            inner,
            timeout,
            runtime,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl LocationLookup for BoundedLookup {
    fn lookup(&self, category: &str, near: Coordinate) -> Result<Coordinate, LookupError> {
        let inner = Arc::clone(&self.inner);
        let category = category.to_string();

        self.runtime.block_on(async {
            let mut task = tokio::task::spawn_blocking(move || inner.lookup(&category, near));

            match tokio::time::timeout(self.timeout, &mut task).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => Err(LookupError::Backend(format!("lookup task failed: {}", e))),
                Err(_) => {
                    task.abort();
                    debug!(timeout_ms = self.timeout.as_millis() as u64, "Stop lookup timed out");
                    Err(LookupError::Timeout(self.timeout))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowLookup(Duration);

    impl LocationLookup for SlowLookup {
        fn lookup(&self, _category: &str, near: Coordinate) -> Result<Coordinate, LookupError> {
            std::thread::sleep(self.0);
            Ok(near)
        }
    }

    struct PanickingLookup;

    impl LocationLookup for PanickingLookup {
        fn lookup(&self, _category: &str, _near: Coordinate) -> Result<Coordinate, LookupError> {
            panic!("backend crashed");
        }
    }

    /// Hangs and tracks how many calls are running at once
    #[derive(Default)]
    struct HangingLookup {
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl LocationLookup for HangingLookup {
        fn lookup(&self, _category: &str, near: Coordinate) -> Result<Coordinate, LookupError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(near)
        }
    }

    fn runtime(blocking_threads: usize) -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(blocking_threads)
            .enable_time()
            .build()
            .unwrap()
    }

    #[test]
    fn test_passthrough_returns_input() {
        let near = Coordinate::new(-95.0, 35.0);
        assert_eq!(PassthroughLookup.lookup("fuel stop", near).unwrap(), near);
    }

    #[test]
    fn test_unavailable_always_fails() {
        let result = UnavailableLookup.lookup("rest stop", Coordinate::new(0.0, 0.0));
        assert_eq!(result.unwrap_err(), LookupError::NotFound);
    }

    #[test]
    fn test_bounded_lookup_passes_fast_results() {
        let rt = runtime(4);
        let lookup = BoundedLookup::new(
            Arc::new(PassthroughLookup),
            Duration::from_secs(1),
            rt.handle().clone(),
        );
        let near = Coordinate::new(10.0, 20.0);
        assert_eq!(lookup.lookup("fuel stop", near).unwrap(), near);
    }

    #[test]
    fn test_bounded_lookup_times_out() {
        let rt = runtime(4);
        let lookup = BoundedLookup::new(
            Arc::new(SlowLookup(Duration::from_millis(500))),
            Duration::from_millis(20),
            rt.handle().clone(),
        );
        let result = lookup.lookup("rest stop", Coordinate::new(0.0, 0.0));
        assert!(matches!(result, Err(LookupError::Timeout(_))));
        rt.shutdown_background();
    }

    #[test]
    fn test_bounded_lookup_survives_panicking_backend() {
        let rt = runtime(4);
        let lookup = BoundedLookup::new(
            Arc::new(PanickingLookup),
            Duration::from_secs(1),
            rt.handle().clone(),
        );
        let result = lookup.lookup("rest stop", Coordinate::new(0.0, 0.0));
        assert!(matches!(result, Err(LookupError::Backend(_))));
    }

    #[test]
    fn test_hanging_backend_does_not_grow_threads() {
        let rt = runtime(2);
        let backend = Arc::new(HangingLookup::default());
        let lookup = BoundedLookup::new(backend.clone(), Duration::from_millis(5), rt.handle().clone());

        for _ in 0..50 {
            let result = lookup.lookup("rest stop", Coordinate::new(0.0, 0.0));
            assert!(matches!(result, Err(LookupError::Timeout(_))));
        }

        assert!(backend.peak.load(Ordering::SeqCst) <= 2);
        rt.shutdown_background();
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Count of batches enqueued but not yet settled.
///
/// Owned by an [`Orchestrator`](crate::Orchestrator); clones share the count. A zero reading does
/// not prove the scene is quiet, a batch may still be attaching.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    /// Count one batch until the returned guard drops
    pub fn begin(&self) -> InFlightGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        InFlightGuard(self.0.clone())
    }
}

/// Decrements its [`InFlight`] exactly once, on drop
#[derive(Debug)]
#[must_use]
pub struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

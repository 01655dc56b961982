// src/core/in_flight.rs
//! One-at-a-time gate for long AI and export operations

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

/// Releases the gate when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` if an operation is already running.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Gates per operation kind.
#[derive(Debug, Clone, Default)]
pub struct OperationGates {
    pub generate: InFlight,
    pub refine: InFlight,
    pub tweak: InFlight,
    pub export: InFlight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_refused_until_release() {
        let gate = InFlight::new();
        let guard = gate.try_begin().unwrap();
        assert!(gate.is_busy());
        assert!(gate.try_begin().is_none());

        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn test_clones_share_state_but_kinds_are_independent() {
        let gates = OperationGates::default();
        let shared = gates.clone();
        let _refining = gates.refine.try_begin().unwrap();

        assert!(shared.refine.try_begin().is_none());
        assert!(shared.tweak.try_begin().is_some());
    }
}

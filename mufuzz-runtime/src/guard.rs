//! Per-mutant bound on the number of control transfers a trial may perform.

use std::sync::atomic::{self, AtomicU64};

use thiserror::Error;
use tracing::debug;

use crate::mutant::MutantId;

pub const DEFAULT_MAX_STEPS: u64 = 100_000;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{mutant} exceeded {max_steps} steps")]
pub struct TimeoutFault {
    pub mutant: MutantId,
    pub max_steps: u64,
}

#[derive(Debug)]
pub struct TimeoutGuard {
    steps: AtomicU64,
    max_steps: u64,
}

impl TimeoutGuard {
    pub fn new(max_steps: u64) -> Self {
        Self { steps: AtomicU64::new(0), max_steps }
    }

    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    pub fn steps(&self) -> u64 {
        self.steps.load(atomic::Ordering::SeqCst)
    }

    /// Counts one step, faulting once the count exceeds the ceiling.
    ///
    /// The counter is never reset here; every check past the ceiling faults again until
    /// [`reset`](Self::reset) is called.
    pub fn check_step(&self, mutant: &MutantId) -> Result<(), TimeoutFault> {
        let steps = self.steps.fetch_add(1, atomic::Ordering::SeqCst) + 1;
        if steps > self.max_steps {
            debug!(%mutant, steps, max_steps = self.max_steps, "step guard tripped");
            return Err(TimeoutFault { mutant: mutant.clone(), max_steps: self.max_steps });
        }
        Ok(())
    }

    pub fn reset(&self) {
        self.steps.store(0, atomic::Ordering::SeqCst);
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

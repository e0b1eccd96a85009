use crate::guard::DEFAULT_MAX_STEPS;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Guard checks a single trial may perform before it faults.
    pub max_steps: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

use tracing::debug;

use crate::guard::TimeoutFault;
use crate::mutant::Mutant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrialOutcome {
    Survived,
    Killed,
    TimedOut(TimeoutFault),
}

/// Whether a trial aborted by its step guard counts as a kill.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Timeouts are reported, but never recorded as kills.
    #[default]
    Ignore,
    CountAsKill,
}

impl TrialOutcome {
    pub fn counts_as_kill(&self, policy: TimeoutPolicy) -> bool {
        match self {
            Self::Survived => false,
            Self::Killed => true,
            Self::TimedOut(_) => policy == TimeoutPolicy::CountAsKill,
        }
    }
}

/// Runs a single trial of `mutant`.
///
/// The step counter is reset first. `f` returns whether the harness observed a behavior change;
/// an `Err` means the step guard aborted the trial. The mutant is killed if the outcome counts as
/// a kill under `policy`. Trials are never retried.
pub fn run_trial<F>(mutant: &Mutant, policy: TimeoutPolicy, f: F) -> TrialOutcome
where
    F: FnOnce(&Mutant) -> Result<bool, TimeoutFault>,
{
    mutant.reset_steps();

    let outcome = match f(mutant) {
        Ok(true) => TrialOutcome::Killed,
        Ok(false) => TrialOutcome::Survived,
        Err(fault) => TrialOutcome::TimedOut(fault),
    };

    if outcome.counts_as_kill(policy) {
        mutant.kill();
    }

    debug!(mutant = %mutant.id(), ?outcome, steps = mutant.guard().steps(), "trial finished");

    outcome
}

#[cfg(test)]
mod tests {
    use mufuzz_operators::JumpCondInvert;

    use crate::config::Options;
    use crate::mutant::Mutant;

    use super::{run_trial, TimeoutPolicy, TrialOutcome};

    fn spin(mutant: &Mutant) -> Result<bool, crate::guard::TimeoutFault> {
        loop { mutant.check_step()?; }
    }

    #[test]
    fn test_outcomes() {
        let mutant = Mutant::new(&JumpCondInvert, 0, "demo/Loop", &Options::default());

        assert_eq!(run_trial(&mutant, TimeoutPolicy::Ignore, |_| Ok(false)), TrialOutcome::Survived);
        assert!(!mutant.is_dead());

        assert_eq!(run_trial(&mutant, TimeoutPolicy::Ignore, |_| Ok(true)), TrialOutcome::Killed);
        assert!(mutant.is_dead());
    }

    #[test]
    fn test_timeout_policy() {
        let opts = Options { max_steps: 5 };

        let ignored = Mutant::new(&JumpCondInvert, 0, "demo/Loop", &opts);
        let outcome = run_trial(&ignored, TimeoutPolicy::Ignore, spin);
        assert!(matches!(outcome, TrialOutcome::TimedOut(ref fault) if fault.max_steps == 5));
        assert!(!ignored.is_dead());

        let counted = Mutant::new(&JumpCondInvert, 1, "demo/Loop", &opts);
        assert!(matches!(run_trial(&counted, TimeoutPolicy::CountAsKill, spin), TrialOutcome::TimedOut(_)));
        assert!(counted.is_dead());
    }

    #[test]
    fn test_steps_reset_between_trials() {
        let opts = Options { max_steps: 3 };
        let mutant = Mutant::new(&JumpCondInvert, 0, "demo/Loop", &opts);

        let three_steps = |mutant: &Mutant| -> Result<bool, crate::guard::TimeoutFault> {
            for _ in 0..3 { mutant.check_step()?; }
            Ok(false)
        };
        assert_eq!(run_trial(&mutant, TimeoutPolicy::Ignore, three_steps), TrialOutcome::Survived);
        assert_eq!(run_trial(&mutant, TimeoutPolicy::Ignore, three_steps), TrialOutcome::Survived);
    }
}

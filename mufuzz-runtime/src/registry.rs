//! Caught and seen mutant sets, merged across trials and workers.

use std::sync::Arc;

use mufuzz_json::FORMAT_VERSION;
use mufuzz_json::registry::RegistrySnapshot;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::SnapshotError;
use crate::mutant::{KillEvent, MutantId};
use crate::trial::{TimeoutPolicy, TrialOutcome};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutantRegistry {
    /// Mutants killed within the current accounting window.
    caught: FxHashSet<MutantId>,
    /// Mutants whose opportunity was reached, over the lifetime of the registry.
    seen: FxHashSet<MutantId>,
}

fn sorted(set: &FxHashSet<MutantId>) -> Vec<MutantId> {
    let mut mutants = set.iter().cloned().collect::<Vec<_>>();
    mutants.sort_unstable();
    mutants
}

impl MutantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the mutant was not caught before.
    pub fn record_kill(&mut self, mutant: &MutantId) -> bool {
        self.caught.insert(mutant.clone())
    }

    /// Returns whether the mutant was not seen before.
    pub fn record_seen(&mut self, mutant: &MutantId) -> bool {
        self.seen.insert(mutant.clone())
    }

    pub fn on_kill_event(&mut self, event: &KillEvent) -> bool {
        self.record_kill(&event.mutant)
    }

    /// Records the outcome of a trial, returning whether the mutant was newly caught.
    pub fn record_outcome(&mut self, mutant: &MutantId, outcome: &TrialOutcome, policy: TimeoutPolicy) -> bool {
        if !outcome.counts_as_kill(policy) { return false; }
        self.record_kill(mutant)
    }

    /// Unions `other` into `self`. Returns `true` iff the caught set grew.
    pub fn merge(&mut self, other: &MutantRegistry) -> bool {
        let caught_before = self.caught.len();
        let seen_before = self.seen.len();

        self.caught.extend(other.caught.iter().cloned());
        self.seen.extend(other.seen.iter().cloned());

        trace!(
            new_caught = self.caught.len() - caught_before,
            new_seen = self.seen.len() - seen_before,
            "merged registry"
        );

        self.caught.len() > caught_before
    }

    /// Forgets caught mutants. Seen mutants are kept.
    pub fn clear(&mut self) {
        self.caught.clear();
    }

    pub fn caught_count(&self) -> usize {
        self.caught.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn is_caught(&self, mutant: &MutantId) -> bool {
        self.caught.contains(mutant)
    }

    pub fn is_seen(&self, mutant: &MutantId) -> bool {
        self.seen.contains(mutant)
    }

    /// Sorted copy of the caught mutants.
    pub fn caught_snapshot(&self) -> Vec<MutantId> {
        sorted(&self.caught)
    }

    /// Sorted copy of the seen mutants.
    pub fn seen_snapshot(&self) -> Vec<MutantId> {
        sorted(&self.seen)
    }

    pub fn to_json(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            format_version: FORMAT_VERSION,
            caught: self.caught_snapshot().iter().map(Into::into).collect(),
            seen: self.seen_snapshot().iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(snapshot: RegistrySnapshot) -> Result<Self, SnapshotError> {
        if snapshot.format_version != FORMAT_VERSION {
            return Err(SnapshotError::FormatVersion { found: snapshot.format_version, expected: FORMAT_VERSION });
        }

        Ok(Self {
            caught: snapshot.caught.into_iter().map(MutantId::from).collect(),
            seen: snapshot.seen.into_iter().map(MutantId::from).collect(),
        })
    }

    pub fn read_json(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Self::from_json(serde_json::from_slice(bytes)?)
    }

    pub fn write_json(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_json::to_vec_pretty(&self.to_json())?)
    }
}

/// Campaign-wide registry shared between workers.
///
/// Every operation takes the lock, so concurrent merges are applied one at a time and each
/// merge's growth report refers to the state left by the previous one.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry(Arc<Mutex<MutantRegistry>>);

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&self, local: &MutantRegistry) -> bool {
        self.0.lock().merge(local)
    }

    pub fn record_kill(&self, mutant: &MutantId) -> bool {
        self.0.lock().record_kill(mutant)
    }

    pub fn record_seen(&self, mutant: &MutantId) -> bool {
        self.0.lock().record_seen(mutant)
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    pub fn caught_count(&self) -> usize {
        self.0.lock().caught_count()
    }

    pub fn seen_count(&self) -> usize {
        self.0.lock().seen_count()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> MutantRegistry {
        self.0.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use mufuzz_json::registry::RegistrySnapshot;

    use crate::error::SnapshotError;
    use crate::guard::TimeoutFault;
    use crate::mutant::{KillEvent, MutantId};
    use crate::trial::{TimeoutPolicy, TrialOutcome};

    use super::MutantRegistry;

    fn m(ordinal: u64) -> MutantId {
        MutantId::new("jump_cond_invert", ordinal, "demo/Loop")
    }

    #[test]
    fn test_record_kill_is_idempotent() {
        let mut registry = MutantRegistry::new();
        assert!(registry.record_kill(&m(1)));
        assert!(!registry.record_kill(&m(1)));
        assert_eq!(registry.caught_count(), 1);

        // Caught does not imply seen.
        assert!(!registry.is_seen(&m(1)));
    }

    #[test]
    fn test_clear_keeps_seen() {
        let mut registry = MutantRegistry::new();
        registry.record_seen(&m(1));
        registry.record_seen(&m(2));
        registry.on_kill_event(&KillEvent { mutant: m(1) });

        registry.clear();
        assert_eq!(registry.caught_count(), 0);
        assert_eq!(registry.seen_count(), 2);
    }

    #[test]
    fn test_merge_reports_new_kills() {
        let mut a = MutantRegistry::new();
        a.record_kill(&m(1));
        a.record_seen(&m(1));
        a.record_seen(&m(2));

        let mut b = MutantRegistry::new();
        b.record_kill(&m(1));
        b.record_kill(&m(3));
        b.record_seen(&m(1));
        b.record_seen(&m(3));

        assert!(a.merge(&b));
        assert_eq!(a.caught_snapshot(), vec![m(1), m(3)]);
        assert_eq!(a.seen_snapshot(), vec![m(1), m(2), m(3)]);

        assert!(!a.merge(&b));
    }

    #[test]
    fn test_merge_of_only_seen_is_not_growth() {
        let mut a = MutantRegistry::new();
        let mut b = MutantRegistry::new();
        b.record_seen(&m(4));

        assert!(!a.merge(&b));
        assert!(a.is_seen(&m(4)));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut registry = MutantRegistry::new();
        registry.record_kill(&m(1));

        let mut snapshot = registry.caught_snapshot();
        snapshot.clear();
        assert_eq!(registry.caught_count(), 1);
    }

    #[test]
    fn test_timeouts_follow_policy() {
        let timed_out = TrialOutcome::TimedOut(TimeoutFault { mutant: m(1), max_steps: 10 });

        let mut registry = MutantRegistry::new();
        assert!(!registry.record_outcome(&m(1), &timed_out, TimeoutPolicy::Ignore));
        assert!(!registry.record_outcome(&m(1), &TrialOutcome::Survived, TimeoutPolicy::CountAsKill));
        assert_eq!(registry.caught_count(), 0);

        assert!(registry.record_outcome(&m(1), &timed_out, TimeoutPolicy::CountAsKill));
        assert!(registry.record_outcome(&m(2), &TrialOutcome::Killed, TimeoutPolicy::Ignore));
        assert_eq!(registry.caught_snapshot(), vec![m(1), m(2)]);
    }

    #[test]
    fn test_json_snapshot() {
        let mut registry = MutantRegistry::new();
        registry.record_kill(&m(2));
        registry.record_seen(&m(2));
        registry.record_seen(&m(0));

        let snapshot = registry.to_json();
        assert_eq!(snapshot.seen.iter().map(|mutant| mutant.ordinal).collect::<Vec<_>>(), vec![0, 2]);

        let bytes = registry.write_json().unwrap();
        assert_eq!(MutantRegistry::read_json(&bytes).unwrap(), registry);
    }

    #[test]
    fn test_reject_foreign_format_version() {
        let snapshot = RegistrySnapshot { format_version: 0, caught: vec![], seen: vec![] };
        assert!(matches!(
            MutantRegistry::from_json(snapshot),
            Err(SnapshotError::FormatVersion { found: 0, expected: 1 })
        ));
        assert!(matches!(MutantRegistry::read_json(b"[]"), Err(SnapshotError::Json(_))));
    }
}

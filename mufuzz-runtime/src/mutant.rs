use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool};

use mufuzz_emit::Operator;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::Options;
use crate::error::GuardError;
use crate::guard::{TimeoutFault, TimeoutGuard};
use crate::namespace::Namespace;

/// Identity of a mutant. Two mutants with equal identities are the same logical mutant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutantId {
    pub operator: String,
    pub ordinal: u64,
    pub unit: String,
}

impl MutantId {
    pub fn new(operator: &str, ordinal: u64, unit: &str) -> Self {
        Self { operator: operator.to_owned(), ordinal, unit: unit.to_owned() }
    }
}

impl fmt::Display for MutantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} in {}", self.operator, self.ordinal, self.unit)
    }
}

impl From<&MutantId> for mufuzz_json::mutants::Mutant {
    fn from(id: &MutantId) -> Self {
        Self { operator: id.operator.clone(), ordinal: id.ordinal, unit: id.unit.clone() }
    }
}

impl From<mufuzz_json::mutants::Mutant> for MutantId {
    fn from(mutant: mufuzz_json::mutants::Mutant) -> Self {
        Self { operator: mutant.operator, ordinal: mutant.ordinal, unit: mutant.unit }
    }
}

/// Report that the alteration of a mutant was observed to change behavior.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KillEvent {
    pub mutant: MutantId,
}

/// A single mutation site together with its runtime state: liveness, step guard, and the
/// namespace its rewritten units are defined in.
pub struct Mutant {
    id: MutantId,
    operator: &'static dyn Operator,
    dead: AtomicBool,
    guard: TimeoutGuard,
    namespace: Namespace,
}

impl Mutant {
    pub fn new(operator: &'static dyn Operator, ordinal: u64, unit: &str, opts: &Options) -> Self {
        let id = MutantId::new(operator.name(), ordinal, unit);
        Self {
            namespace: Namespace::new(id.clone()),
            id,
            operator,
            dead: AtomicBool::new(false),
            guard: TimeoutGuard::new(opts.max_steps),
        }
    }

    pub fn id(&self) -> &MutantId {
        &self.id
    }

    pub fn operator(&self) -> &'static dyn Operator {
        self.operator
    }

    pub fn ordinal(&self) -> u64 {
        self.id.ordinal
    }

    pub fn unit_name(&self) -> &str {
        &self.id.unit
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn guard(&self) -> &TimeoutGuard {
        &self.guard
    }

    /// Marks the mutant dead. Dead mutants never come back to life.
    pub fn kill(&self) {
        self.dead.store(true, atomic::Ordering::SeqCst);
    }

    pub fn is_dead(&self) -> bool {
        self.dead.load(atomic::Ordering::SeqCst)
    }

    pub fn check_step(&self) -> Result<(), TimeoutFault> {
        self.guard.check_step(&self.id)
    }

    pub fn reset_steps(&self) {
        self.guard.reset();
    }

    pub fn kill_event(&self) -> KillEvent {
        KillEvent { mutant: self.id.clone() }
    }
}

impl fmt::Display for Mutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.is_dead() {
            true => "dead",
            false => "alive",
        };
        write!(f, "mutant {} ({status})", self.id)
    }
}

impl fmt::Debug for Mutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutant")
            .field("id", &self.id)
            .field("dead", &self.is_dead())
            .field("steps", &self.guard.steps())
            .finish_non_exhaustive()
    }
}

/// Live mutants, looked up by identity.
///
/// Guard checks and resets arriving with only a mutant identity are routed through here.
#[derive(Default)]
pub struct MutantTable {
    mutants: RwLock<FxHashMap<MutantId, Arc<Mutant>>>,
}

impl MutantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the mutant, replacing and returning any mutant previously registered under
    /// the same identity.
    pub fn insert(&self, mutant: Mutant) -> Option<Arc<Mutant>> {
        self.mutants.write().insert(mutant.id().clone(), Arc::new(mutant))
    }

    pub fn get(&self, id: &MutantId) -> Option<Arc<Mutant>> {
        self.mutants.read().get(id).cloned()
    }

    /// Registers the mutant under its own identity, unless a mutant with that identity is
    /// already registered, in which case the registered one is returned and `mutant` is dropped.
    pub fn get_or_insert(&self, mutant: Mutant) -> Arc<Mutant> {
        let mut mutants = self.mutants.write();
        mutants.entry(mutant.id().clone()).or_insert_with(|| Arc::new(mutant)).clone()
    }

    pub fn check_step(&self, id: &MutantId) -> Result<(), GuardError> {
        let Some(mutant) = self.get(id) else { return Err(GuardError::UnknownMutant(id.clone())); };
        Ok(mutant.check_step()?)
    }

    pub fn reset_steps(&self, id: &MutantId) -> Result<(), GuardError> {
        let Some(mutant) = self.get(id) else { return Err(GuardError::UnknownMutant(id.clone())); };
        mutant.reset_steps();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mutants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutants.read().is_empty()
    }
}

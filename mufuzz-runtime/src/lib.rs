//! Runtime side of single-mutant execution: mutant state, step guards, isolated namespaces,
//! the mutant-aware unit loader, and the caught/seen registry.

pub mod config;
pub mod error;
pub mod guard;
pub mod loader;
pub mod mutant;
pub mod namespace;
pub mod registry;
pub mod trial;

pub use error::{GuardError, LoadError, SnapshotError};
pub use guard::{TimeoutFault, TimeoutGuard, DEFAULT_MAX_STEPS};
pub use loader::{DirSource, MemorySource, MutantLoader, UnitSource};
pub use mutant::{KillEvent, Mutant, MutantId, MutantTable};
pub use namespace::{LoadedUnit, Namespace};
pub use registry::{MutantRegistry, SharedRegistry};
pub use trial::{run_trial, TimeoutPolicy, TrialOutcome};

use std::sync::Arc;

use mufuzz_emit::MutationSite;
use mufuzz_emit::insn::Unit;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::mutant::MutantId;

/// A unit defined in the namespace of a mutant.
#[derive(Debug)]
pub struct LoadedUnit {
    pub name: String,
    pub namespace: MutantId,
    /// The bytes the unit was defined from. For units other than the mutant's target these are
    /// the original bytes, verbatim.
    pub bytes: Vec<u8>,
    /// The rewritten instruction stream of the mutant's target. Other units are never decoded.
    pub unit: Option<Unit>,
    /// The rewritten opportunity, if this is the mutant's target and the ordinal was in range.
    pub mutation: Option<MutationSite>,
    /// Opportunities of the mutant's operator, if this is the mutant's target.
    pub opportunities: Option<u64>,
}

impl LoadedUnit {
    pub fn is_target(&self) -> bool {
        self.opportunities.is_some()
    }
}

/// Units defined on behalf of a single mutant.
///
/// Every mutant owns its own namespace, so rewrites of the same unit for different mutants never
/// collide with one another or with the unmutated original.
#[derive(Debug)]
pub struct Namespace {
    owner: MutantId,
    units: RwLock<FxHashMap<String, Arc<LoadedUnit>>>,
}

impl Namespace {
    pub fn new(owner: MutantId) -> Self {
        Self { owner, units: Default::default() }
    }

    pub fn owner(&self) -> &MutantId {
        &self.owner
    }

    /// Defines the unit unless the name is already taken, in which case the existing definition
    /// is returned and `loaded_unit` is dropped.
    pub fn define_unit(&self, loaded_unit: LoadedUnit) -> Arc<LoadedUnit> {
        let mut units = self.units.write();
        if let Some(existing) = units.get(&loaded_unit.name) { return existing.clone(); }

        let loaded_unit = Arc::new(loaded_unit);
        units.insert(loaded_unit.name.clone(), loaded_unit.clone());
        loaded_unit
    }

    pub fn get(&self, name: &str) -> Option<Arc<LoadedUnit>> {
        self.units.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.units.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.read().is_empty()
    }
}

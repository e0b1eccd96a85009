use serde::{Serialize, Deserialize};

/// Identity of a single mutation site.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct Mutant {
    /// Name of the operator, as listed in the operator catalog.
    pub operator: String,
    /// Zero-based index of the rewritten opportunity, in program order.
    pub ordinal: u64,
    /// Name of the target unit.
    pub unit: String,
}

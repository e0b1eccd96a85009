use serde::{Serialize, Deserialize};

use crate::mutants::Mutant;

/// Caught and seen mutants of a registry, each list sorted.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub format_version: u32,
    pub caught: Vec<Mutant>,
    pub seen: Vec<Mutant>,
}

#[cfg(test)]
mod tests {
    use crate::FORMAT_VERSION;
    use crate::mutants::Mutant;

    use super::RegistrySnapshot;

    #[test]
    fn test_snapshot_field_names() {
        let snapshot = RegistrySnapshot {
            format_version: FORMAT_VERSION,
            caught: vec![],
            seen: vec![Mutant { operator: "iinc_negate".to_owned(), ordinal: 3, unit: "demo/Loop".to_owned() }],
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["format_version"], 1);
        assert_eq!(value["seen"][0]["operator"], "iinc_negate");
        assert_eq!(value["seen"][0]["ordinal"], 3);
        assert_eq!(value["seen"][0]["unit"], "demo/Loop");
    }
}

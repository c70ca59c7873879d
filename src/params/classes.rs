//! `classes.*` parameter branch (spec §6): class enumerations.

use crate::enums::{BondTypeDef, BondTypeName, Race, SexType};
use std::collections::HashMap;

/// `classes.*`: the declared classes for this run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassesParams {
    /// Declared races.
    pub races: Vec<Race>,
    /// Declared sex types.
    pub sex_types: Vec<SexType>,
    /// Declared bond types, by name.
    pub bond_types: HashMap<BondTypeName, BondTypeDef>,
    /// Declared population labels (locations' population weighting
    /// keys; a location-agnostic list of names the geography module
    /// may reference).
    pub populations: Vec<String>,
}

impl ClassesParams {
    /// Looks up a bond type definition by name.
    #[must_use]
    pub fn bond_type(&self, name: &BondTypeName) -> Option<&BondTypeDef> {
        self.bond_types.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ActKind;

    #[test]
    fn bond_type_lookup() {
        let mut bond_types = HashMap::new();
        bond_types.insert(
            BondTypeName::new("Sex"),
            BondTypeDef::new("Sex", [ActKind::Sex]),
        );
        let classes = ClassesParams {
            races: vec![Race::Black],
            sex_types: vec![SexType::HM],
            bond_types,
            populations: vec!["default".into()],
        };
        assert!(classes.bond_type(&BondTypeName::new("Sex")).is_some());
        assert!(classes.bond_type(&BondTypeName::new("Missing")).is_none());
    }
}

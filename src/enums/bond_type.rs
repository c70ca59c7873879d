//! Bond type: a named partnership category declaring permitted acts
//! (spec: GLOSSARY "Bond type"; §4.3: "Bond acts").

use crate::enums::act_kind::ActKind;
use std::collections::HashSet;

/// The name of a declared bond type, as used in
/// `params.partnership.bonds[so]` and `params.classes.bond_types`.
///
/// Kept as a newtype over a small interned string rather than a fixed
/// enum, because bond names are user-declared in params (spec §6:
/// "class enumerations... looked up by string keys"), unlike
/// `Race`/`SexType`/`DrugType`, whose variant sets the core itself
/// branches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct BondTypeName(String);

impl BondTypeName {
    /// Creates a bond type name from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        BondTypeName(name.into())
    }

    /// Returns the bond name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BondTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BondTypeName {
    fn from(value: &str) -> Self {
        BondTypeName::new(value)
    }
}

/// The definition of a declared bond type: which acts it permits.
///
/// A bond requiring `Injection` can only be formed between two
/// injection drug users; a bond requiring `Sex` requires mutually
/// compatible sex types (spec §4.3).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BondTypeDef {
    /// This bond's declared name.
    pub name: BondTypeName,
    /// Acts this bond permits.
    pub acts_allowed: HashSet<ActKind>,
}

impl BondTypeDef {
    /// Creates a bond type definition.
    #[must_use]
    pub fn new(name: impl Into<String>, acts_allowed: impl IntoIterator<Item = ActKind>) -> Self {
        BondTypeDef {
            name: BondTypeName::new(name),
            acts_allowed: acts_allowed.into_iter().collect(),
        }
    }

    /// Returns true iff this bond permits injection acts.
    #[must_use]
    pub fn requires_injection(&self) -> bool {
        self.acts_allowed.contains(&ActKind::Injection)
    }

    /// Returns true iff this bond permits sexual acts.
    #[must_use]
    pub fn requires_sex(&self) -> bool {
        self.acts_allowed.contains(&ActKind::Sex)
    }

    /// Returns true iff this bond permits both sex and injection acts
    /// (spec §4.5: "Combined injection+sex bonds").
    #[must_use]
    pub fn is_combined(&self) -> bool {
        self.requires_injection() && self.requires_sex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_only_bond() {
        let bond = BondTypeDef::new("Sex", [ActKind::Sex]);
        assert!(bond.requires_sex());
        assert!(!bond.requires_injection());
        assert!(!bond.is_combined());
    }

    #[test]
    fn injection_only_bond() {
        let bond = BondTypeDef::new("Inj", [ActKind::Injection]);
        assert!(bond.requires_injection());
        assert!(!bond.requires_sex());
        assert!(!bond.is_combined());
    }

    #[test]
    fn combined_bond() {
        let bond = BondTypeDef::new("SexInj", [ActKind::Sex, ActKind::Injection]);
        assert!(bond.is_combined());
    }

    #[test]
    fn name_display() {
        let name = BondTypeName::new("Social");
        assert_eq!(format!("{}", name), "Social");
        assert_eq!(name.as_str(), "Social");
    }

    #[test]
    fn name_from_str() {
        let name: BondTypeName = "Main".into();
        assert_eq!(name.as_str(), "Main");
    }

    #[test]
    fn names_hash_and_order() {
        use std::collections::BTreeSet;
        let mut set = BTreeSet::new();
        set.insert(BondTypeName::new("b"));
        set.insert(BondTypeName::new("a"));
        let ordered: Vec<_> = set.iter().map(BondTypeName::as_str).collect();
        assert_eq!(ordered, vec!["a", "b"]);
    }
}

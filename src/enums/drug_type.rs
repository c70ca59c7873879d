//! Drug-type classification (spec §3: `drug_type` field; §9 open
//! question on NIDU vs None).

/// An agent's drug-use classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DrugType {
    /// Injection drug user. Required for injection-permitting bonds.
    Inj,
    /// Non-injection drug user.
    Nidu,
    /// No drug use.
    None,
}

impl DrugType {
    /// Returns all drug-type variants.
    #[must_use]
    pub const fn all() -> [DrugType; 3] {
        [DrugType::Inj, DrugType::Nidu, DrugType::None]
    }

    /// Returns a human-readable name for this drug type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            DrugType::Inj => "Inj",
            DrugType::Nidu => "NIDU",
            DrugType::None => "None",
        }
    }

    /// Returns true iff this agent is eligible for injection-permitting
    /// bonds (spec §4.3: "can only be formed between two injection drug
    /// users").
    #[must_use]
    pub const fn is_injection_user(&self) -> bool {
        matches!(self, DrugType::Inj)
    }

    /// Returns the drug-type key used for partner-count scaling lookups
    /// (spec §9 open question). `Nidu` gets its own distinct key so
    /// params may override its partner-count scaling separately; for
    /// every other purpose it behaves like `None`.
    #[must_use]
    pub const fn partner_count_key(&self) -> DrugType {
        *self
    }

    /// Returns true iff this drug type is behaviorally equivalent to
    /// `None` for transmission and acute-window purposes (spec §9:
    /// "Implementers should treat NIDU as behaviorally equivalent to
    /// none for transmission").
    #[must_use]
    pub const fn behaves_as_none_for_transmission(&self) -> bool {
        matches!(self, DrugType::Nidu | DrugType::None)
    }
}

impl std::fmt::Display for DrugType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_inj_is_injection_user() {
        assert!(DrugType::Inj.is_injection_user());
        assert!(!DrugType::Nidu.is_injection_user());
        assert!(!DrugType::None.is_injection_user());
    }

    #[test]
    fn nidu_behaves_as_none_for_transmission() {
        assert!(DrugType::Nidu.behaves_as_none_for_transmission());
        assert!(DrugType::None.behaves_as_none_for_transmission());
        assert!(!DrugType::Inj.behaves_as_none_for_transmission());
    }

    #[test]
    fn nidu_keeps_distinct_partner_count_key() {
        assert_ne!(DrugType::Nidu.partner_count_key(), DrugType::None.partner_count_key());
    }

    #[test]
    fn names_are_nonempty() {
        for dt in DrugType::all() {
            assert!(!dt.name().is_empty());
        }
    }
}

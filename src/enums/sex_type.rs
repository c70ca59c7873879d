//! Sex-type classification and `sleeps_with` compatibility (spec §6:
//! `classes.sex_types`).

/// A sex-type classification. Determines `sleeps_with` compatibility
/// for sexual bonds (spec §4.3) and keys demographic/behavioral tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SexType {
    /// Heterosexual male.
    HM,
    /// Heterosexual female.
    HF,
    /// Men who have sex with men.
    MSM,
    /// Women who have sex with women.
    WSW,
    /// Men who have sex with both men and women.
    MTF,
}

impl SexType {
    /// Returns all sex-type variants.
    #[must_use]
    pub const fn all() -> [SexType; 5] {
        [SexType::HM, SexType::HF, SexType::MSM, SexType::WSW, SexType::MTF]
    }

    /// Returns a human-readable name for this sex type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SexType::HM => "HM",
            SexType::HF => "HF",
            SexType::MSM => "MSM",
            SexType::WSW => "WSW",
            SexType::MTF => "MTF",
        }
    }
}

impl std::fmt::Display for SexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A `sleeps_with` compatibility table: which sex types a given sex
/// type is willing to partner with sexually.
///
/// Built once from `Params.classes.sex_types` and consulted by
/// `sex_possible` (spec: SPEC_FULL.md §3, grounded on
/// `original_source/titan/partnering.py`'s memoized `sex_possible`).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SleepsWithTable {
    entries: std::collections::HashMap<SexType, Vec<SexType>>,
}

impl SleepsWithTable {
    /// Creates an empty table. Populate with [`Self::set`] per sex type.
    #[must_use]
    pub fn new() -> Self {
        SleepsWithTable { entries: std::collections::HashMap::new() }
    }

    /// Declares which sex types `from` sleeps with.
    pub fn set(&mut self, from: SexType, targets: Vec<SexType>) {
        self.entries.insert(from, targets);
    }

    /// Returns true iff `a` and `b` are *mutually* compatible: `a`
    /// lists `b` among its targets and `b` lists `a` among its targets
    /// (spec §4.3: "both directions must hold").
    #[must_use]
    pub fn sex_possible(&self, a: SexType, b: SexType) -> bool {
        let a_to_b = self.entries.get(&a).is_some_and(|v| v.contains(&b));
        let b_to_a = self.entries.get(&b).is_some_and(|v| v.contains(&a));
        a_to_b && b_to_a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sex_types_have_names() {
        for st in SexType::all() {
            assert!(!st.name().is_empty());
        }
    }

    #[test]
    fn sleeps_with_requires_both_directions() {
        let mut table = SleepsWithTable::new();
        table.set(SexType::HM, vec![SexType::HF]);
        // HF does not list HM back.
        table.set(SexType::HF, vec![]);
        assert!(!table.sex_possible(SexType::HM, SexType::HF));
    }

    #[test]
    fn sleeps_with_true_when_mutual() {
        let mut table = SleepsWithTable::new();
        table.set(SexType::HM, vec![SexType::HF]);
        table.set(SexType::HF, vec![SexType::HM]);
        assert!(table.sex_possible(SexType::HM, SexType::HF));
        assert!(table.sex_possible(SexType::HF, SexType::HM));
    }

    #[test]
    fn msm_sleeps_with_msm() {
        let mut table = SleepsWithTable::new();
        table.set(SexType::MSM, vec![SexType::MSM]);
        assert!(table.sex_possible(SexType::MSM, SexType::MSM));
    }

    #[test]
    fn missing_entry_is_incompatible() {
        let table = SleepsWithTable::new();
        assert!(!table.sex_possible(SexType::HM, SexType::HF));
    }
}

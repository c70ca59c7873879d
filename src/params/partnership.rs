//! `partnership.*` parameter branch (spec §6, §4.3).

use crate::enums::BondTypeName;
use crate::types::Distribution;
use std::collections::HashMap;

/// One weighted bond label offered during partner selection's step 1
/// (spec §4.3: "Sample a bond-subtype-specific bond label from
/// `params.partnership.bonds[A.so | "PWID"]` by declared probabilities").
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BondProbability {
    /// The bond type this probability mass selects.
    pub bond: BondTypeName,
    /// Selection weight (need not be pre-normalized).
    pub prob: f64,
}

/// `partnership.bonds[so]`: per-selection-key weighted bond choices.
/// The key is either a `SexType` name or the sentinel `"PWID"` used
/// when an agent seeks an injection-only bond (spec §4.3, step 1).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BondsParams {
    entries: HashMap<String, Vec<BondProbability>>,
}

impl BondsParams {
    /// Creates an empty table. Populate with [`Self::set`].
    #[must_use]
    pub fn new() -> Self {
        BondsParams { entries: HashMap::new() }
    }

    /// Declares the weighted bond choices available under `key`.
    pub fn set(&mut self, key: impl Into<String>, bonds: Vec<BondProbability>) {
        self.entries.insert(key.into(), bonds);
    }

    /// Returns the weighted bond choices declared for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[BondProbability]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

/// `partnership.<sex|injection>.duration`: relationship-duration
/// distributions, keyed by the act kind the bond requires (spec §4.3:
/// "Relationship duration").
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DurationParams {
    /// Duration distribution for sex-only bonds.
    pub sex: Distribution,
    /// Duration distribution for injection-only (and combined) bonds.
    pub injection: Distribution,
}

/// `partnership.network.same_component.prob` (spec §4.3, step 5).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SameComponentParams {
    /// Probability partner selection restricts to the requester's
    /// current connected component, when the requester already has
    /// partners.
    pub prob: f64,
}

/// `partnership.network.*`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkMixingParams {
    /// Same-connected-component mixing restriction.
    pub same_component: SameComponentParams,
}

/// `partnership.*`: the full partner-formation configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartnershipParams {
    /// Weighted bond-label choices per selection key.
    pub bonds: BondsParams,
    /// Relationship-duration distributions.
    pub duration: DurationParams,
    /// Network-mixing restrictions.
    pub network: NetworkMixingParams,
}

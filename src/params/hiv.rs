//! `hiv.*` parameter branch (spec §6, §4.5: "Acute window").

use crate::enums::{ActKind, Race, SexType};
use std::collections::HashMap;

/// Per-act transmission probability for one `(race, sex_type)` source,
/// split by the act kind performed (spec §4.1: "helpers for per-act
/// transmission probability lookup keyed by (race, sex_type, bond act
/// kind)"; spec §4.5: "per-act transmission `ppAct` from source
/// lookup"). Kept under `hiv.*` rather than `demographics.*` since the
/// probability is a biological transmission-risk constant, not a
/// behavioral rate.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerActProbs {
    /// Per-act probability for sexual transmission.
    pub sex: f64,
    /// Per-act probability for injection transmission.
    pub injection: f64,
}

impl PerActProbs {
    /// Returns the probability for `act_kind`.
    #[must_use]
    pub const fn for_act(&self, act_kind: ActKind) -> f64 {
        match act_kind {
            ActKind::Sex => self.sex,
            ActKind::Injection => self.injection,
        }
    }
}

/// `hiv.acute.*`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AcuteParams {
    /// Number of steps after seroconversion (`hiv_time < duration`)
    /// during which per-act transmission probability is multiplied by
    /// `infectivity`.
    pub duration: u32,
    /// Per-act transmission-probability multiplier during the acute
    /// window.
    pub infectivity: f64,
}

/// `hiv.*`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HivParams {
    /// Simulated step at which HIV seeding/transmission begins (spec
    /// §6). The core treats step 0 as the start of seeding; this exists
    /// so a future phased-introduction model has somewhere to read
    /// from.
    pub start_time: u32,
    /// Acute-window configuration.
    pub acute: AcuteParams,
    /// Per-act transmission probabilities, keyed by source race then
    /// source sex type.
    pub per_act: HashMap<Race, HashMap<SexType, PerActProbs>>,
}

impl HivParams {
    /// Looks up the per-act transmission probability for a source of
    /// `race`/`sex_type` performing `act_kind`, or `0.0` if undeclared.
    #[must_use]
    pub fn per_act_prob(&self, race: Race, sex_type: SexType, act_kind: ActKind) -> f64 {
        self.per_act
            .get(&race)
            .and_then(|by_sex| by_sex.get(&sex_type))
            .map(|probs| probs.for_act(act_kind))
            .unwrap_or(0.0)
    }
}

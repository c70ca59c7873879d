//! Cross-cutting program parameters that are not naturally keyed by a
//! single `(race, sex_type)` demographic cell: incarceration-program
//! globals, high-risk program globals, and syringe-exchange/condom
//! policy (spec §4.4.g, §4.5, §4.7).

use crate::enums::SexType;
use std::collections::HashMap;

/// Incarceration program globals (spec §4.7: entry/release processing
/// shared across all demographics).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IncarProgramParams {
    /// Probability a previously undiagnosed HIV+ agent is diagnosed on
    /// incarceration entry.
    pub pris_test_prob: f64,
    /// Probability a diagnosed HIV+ agent enrolls in HAART on entry.
    pub art_enroll: f64,
    /// Probability a released HAART+ agent *loses* HAART (spec §4.7:
    /// "lose HAART with probability `1 - inc_ARTdisc`" — this field is
    /// that complement, stored directly as a loss probability so call
    /// sites don't recompute `1 - x`).
    pub art_loss_on_release: f64,
    /// Whether the post-incarceration behavioral-treatment flag
    /// (`incar_treat_RIC`) is active: suppresses HAART discontinuation
    /// while the post-release treatment timer runs, and suppresses
    /// automatic high-risk entry on release (spec §4.6, §4.7).
    pub treat_ric: bool,
    /// Cumulative diagnosed-agent count that triggers one-shot
    /// syringe/needle-exchange enablement (spec §4.4.g).
    pub treatment_program_threshold: u64,
}

/// High-risk program globals (spec §4.7).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HighRiskProgramParams {
    /// Probability a newly-incarcerated agent's partners enter high
    /// risk (spec §4.7: `hr_proportion`).
    pub proportion: f64,
    /// High-risk duration in steps, keyed by sex type (spec §4.7:
    /// `hr_{sex_type}_dur`, e.g. `hr_F_dur`/`hr_M_dur`).
    pub duration: HashMap<SexType, u32>,
    /// Additive increase applied to `mean_num_partners[bond]` while an
    /// agent is high-risk (spec §4.7: `hr_partner_scale`).
    pub partner_scale: f64,
}

impl HighRiskProgramParams {
    /// Returns the configured high-risk duration for `sex_type`, or a
    /// conservative default of 1 step if undeclared.
    #[must_use]
    pub fn duration_for(&self, sex_type: SexType) -> u32 {
        self.duration.get(&sex_type).copied().unwrap_or(1)
    }
}

/// Syringe-services-program globals (spec §4.5, §4.4.g).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SyringeServicesParams {
    /// Prevalence of safe-needle-exchange access among non-enrolled
    /// sources, scaling `needle_share` (spec §4.5).
    pub prevalence: f64,
    /// Per-agent enrollment probability applied once to every injection
    /// drug user when the program activates (spec §4.4.g: cumulative
    /// diagnosed count crosses `treatment_program_threshold`).
    pub coverage: f64,
}

/// How unsafe-sex-act probability is computed (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CondomUseType {
    /// Per-act unsafe probability from `demographics[..].condom_unsafe_prob`.
    Race,
    /// Per-act unsafe probability from a monotone function of
    /// `rel.total_sex_acts`.
    ActBased,
}

/// `program.*`: the cross-cutting globals gathered above.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgramParams {
    /// Incarceration-program globals.
    pub incar: IncarProgramParams,
    /// High-risk-program globals.
    pub high_risk: HighRiskProgramParams,
    /// Syringe-services-program globals.
    pub syringe_services: SyringeServicesParams,
    /// Condom-use accounting mode.
    pub condom_use_type: CondomUseType,
}

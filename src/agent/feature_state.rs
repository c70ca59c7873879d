//! Per-feature sub-state blocks (spec §3: "per-feature sub-state
//! blocks (PrEP, HAART, high-risk, incarceration)").
//!
//! Each block bundles the `active`/`ever`/`time` shape spec §4.6–§4.7
//! repeats for every feature, generalized from
//! `original_source/titan/features/high_risk.py`'s own state shape.

use crate::enums::PrepType;

/// PrEP enrollment state (spec §4.6).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrepState {
    /// Currently enrolled.
    pub active: bool,
    /// Ever enrolled, at any point in the run.
    pub ever: bool,
    /// Steps since enrollment.
    pub time: u32,
    /// Adherent to the regimen (spec §4.6: adherence gates the
    /// efficacy factor applied during transmission).
    pub adherent: bool,
    /// Formulation, set on enrollment.
    pub prep_type: Option<PrepType>,
    /// Injectable-formulation drug load, decayed each step (spec §4.6).
    pub load: f64,
    /// Steps since the last injectable dose.
    pub last_dose: u32,
    /// Set when a newly-infected agent who was previously on PrEP
    /// becomes resistant (spec §4.5: "Becoming HIV+").
    pub resistance: bool,
    /// Post-discontinuation fallout timer (spec §4.6).
    pub fallout_time: u32,
}

impl PrepState {
    /// A fresh, never-enrolled PrEP state.
    #[must_use]
    pub const fn new() -> Self {
        PrepState {
            active: false,
            ever: false,
            time: 0,
            adherent: false,
            prep_type: None,
            load: 0.0,
            last_dose: 0,
            resistance: false,
            fallout_time: 0,
        }
    }
}

impl Default for PrepState {
    fn default() -> Self {
        Self::new()
    }
}

/// HAART enrollment state (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HaartState {
    /// Currently enrolled.
    pub active: bool,
    /// Ever enrolled, at any point in the run.
    pub ever: bool,
    /// Steps since enrollment.
    pub time: u32,
    /// Ordinal adherence class, 1..5 (spec §4.6, GLOSSARY).
    pub adherence: u8,
}

impl HaartState {
    /// A fresh, never-enrolled HAART state.
    #[must_use]
    pub const fn new() -> Self {
        HaartState { active: false, ever: false, time: 0, adherence: 1 }
    }
}

impl Default for HaartState {
    fn default() -> Self {
        Self::new()
    }
}

/// Incarceration state (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IncarState {
    /// Currently incarcerated.
    pub active: bool,
    /// Ever incarcerated, at any point in the run.
    pub ever: bool,
    /// Remaining steps of the current sentence.
    pub time: u32,
    /// Post-release behavioral-treatment timer (`incar_treat_RIC`
    /// window; spec §4.6, §4.7).
    pub treatment_time: u32,
}

impl IncarState {
    /// A fresh, never-incarcerated state.
    #[must_use]
    pub const fn new() -> Self {
        IncarState { active: false, ever: false, time: 0, treatment_time: 0 }
    }
}

impl Default for IncarState {
    fn default() -> Self {
        Self::new()
    }
}

/// High-risk state (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HighRiskState {
    /// Currently high-risk.
    pub active: bool,
    /// Ever high-risk, at any point in the run.
    pub ever: bool,
    /// Remaining steps of the current high-risk window.
    pub time: u32,
}

impl HighRiskState {
    /// A fresh, never-high-risk state.
    #[must_use]
    pub const fn new() -> Self {
        HighRiskState { active: false, ever: false, time: 0 }
    }
}

impl Default for HighRiskState {
    fn default() -> Self {
        Self::new()
    }
}

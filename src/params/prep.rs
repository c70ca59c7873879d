//! `prep.*` parameter branch (spec §6, §4.6).

use crate::enums::{PrepTargetingModel, PrepType};
use std::collections::HashMap;

/// `prep.pca.attitude[bin].*`: one attitude bin's selection probability.
/// No operational behavior in this core reads it today (see
/// `DESIGN.md`'s note on `features.pca`); carried so a future PCA
/// module has somewhere to read its attitude distribution from.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttitudeBinParams {
    /// Selection probability for this attitude bin.
    pub prob: f64,
}

/// `prep.pca.*`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PcaParams {
    /// Initial awareness probability.
    pub awareness_init: f64,
    /// Attitude bins, keyed by an arbitrary bin label.
    pub attitude: HashMap<String, AttitudeBinParams>,
}

/// `prep.*`: PrEP program configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrepParams {
    /// Overall coverage target (fraction of the eligible population).
    pub target: f64,
    /// Step at which PrEP enrollment begins; no agent is enrolled by
    /// any targeting model before this (spec §4.6, mirroring
    /// `hiv.start_time`'s pattern).
    pub start_time: u32,
    /// Which targeting model selects enrollees each step.
    pub target_model: PrepTargetingModel,
    /// Formulation enrolled agents receive absent a per-agent override.
    pub prep_type: PrepType,
    /// Peak `prep_load` for injectable PrEP immediately after dosing.
    pub peak_load: f64,
    /// Fallout timer length after discontinuation (spec §4.6).
    pub fallout_t: u32,
    /// Per-act transmission-probability reduction factor for adherent
    /// agents (spec §4.5: oral `(1 - adh_efficacy)`).
    pub adherence_efficacy: f64,
    /// Per-act transmission-probability reduction factor for
    /// non-adherent agents (spec §4.5: oral `(1 - nonadh_efficacy)`).
    pub non_adherence_efficacy: f64,
    /// Probability a newly infected, previously-PrEP agent becomes
    /// PrEP-resistant (spec §4.5: "Becoming HIV+").
    pub resist: f64,
    /// Peer-change-agent sub-branch (no operational behavior).
    pub pca: PcaParams,
}

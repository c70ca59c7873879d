//! `calibration.*` parameter branch (spec §6): global scaling knobs
//! applied on top of the per-demographic rates.

/// `calibration.sex.*`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SexCalibration {
    /// Scales drawn mean partner counts (spec §4.3: "scaled by
    /// `calibration.sex.partner / mean_rel_duration[bond]`").
    pub partner: f64,
    /// Unused by the core transmission math directly but declared in
    /// spec §6 alongside `sex.partner`; carried for parity with the
    /// original's calibration table and available to a future report
    /// writer.
    pub act: f64,
}

/// `calibration.partnership.*`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartnershipCalibration {
    /// Multiplier on `target_partners[bond]` defining the partnerable
    /// buffer (spec §4.3: "Partnerable set").
    pub buffer: f64,
    /// Maximum partner-selection attempts per agent per bond per step
    /// before giving up (spec §4.3: "Assignment loop").
    pub break_point: u32,
}

/// `calibration.network.trim.*`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkTrimCalibration {
    /// Per-edge probability of removal during the one-time post-init
    /// graph trim (SPEC_FULL.md §3).
    pub prob: f64,
}

/// `calibration.network.*`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkCalibration {
    /// Graph-trimming configuration.
    pub trim: NetworkTrimCalibration,
}

/// `calibration.*`: the full set of global scaling knobs (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationParams {
    /// Partner-count/act calibration.
    pub sex: SexCalibration,
    /// Partnership-engine calibration.
    pub partnership: PartnershipCalibration,
    /// Scales injection act counts (spec §4.5).
    pub needle_act_scaling: f64,
    /// Scales sexual act counts (spec §4.5).
    pub sex_act_scaling: f64,
    /// Scales diagnosis test probability (spec §4.6).
    pub test_freq: f64,
    /// Scales HAART enrollment probability (spec §4.6).
    pub art_cov: f64,
    /// Scales AIDS-progression probability (spec §4.6).
    pub prog_aids: f64,
    /// Scales incarceration hazard (spec §4.7).
    pub incar: f64,
    /// Network-level calibration.
    pub network: NetworkCalibration,
}

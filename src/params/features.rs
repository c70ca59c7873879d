//! `features.*` parameter branch (spec §6): feature toggles.
//!
//! Each flag gates one of the plug-in feature modules under
//! [`crate::model`] (spec §9: "Feature-subclass modules... expressed as
//! plug-in objects"). `pca` has no operational behavior described in
//! spec §4 beyond its params branch (see `DESIGN.md`'s Open Questions);
//! it is carried here so a future PCA module has somewhere to read its
//! toggle from, but the step loop never branches on it today.

/// `features.*`: which optional subsystems are active for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureParams {
    /// Incarceration modeling (spec §4.7).
    pub incar: bool,
    /// PrEP modeling (spec §4.6).
    pub prep: bool,
    /// High-risk status modeling (spec §4.7).
    pub high_risk: bool,
    /// Freeze the partnership graph after initialization (spec §4.4.a,
    /// §8: "With `static_network=true`, relationship count is constant
    /// after initialization").
    pub static_network: bool,
    /// MSMW seroconversion pathway (SPEC_FULL.md §3).
    pub msmw: bool,
    /// Syringe/needle-exchange enrollment (spec §4.4.g, §4.5).
    pub syringe_services: bool,
    /// Assortative mixing during partner selection (spec §4.3, step 6).
    pub assort_mix: bool,
    /// Peer-change-agent awareness/attitude tracking. No operational
    /// behavior in this core; see `DESIGN.md`.
    pub pca: bool,
}

impl FeatureParams {
    /// All features disabled.
    #[must_use]
    pub const fn none() -> Self {
        FeatureParams {
            incar: false,
            prep: false,
            high_risk: false,
            static_network: false,
            msmw: false,
            syringe_services: false,
            assort_mix: false,
            pca: false,
        }
    }
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self::none()
    }
}

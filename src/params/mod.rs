//! Immutable, deeply nested configuration tree (spec §6: "Parameter
//! tree"). Every probabilistic rate, bin distribution, feature flag,
//! and class enumeration the core looks up lives under one [`Params`]
//! node, mirroring spec §6's named branches exactly rather than a
//! stringly-keyed map (spec §9: replace dynamic attribute/path access
//! with fixed Rust types).
//!
//! `Params` itself carries no I/O: constructing one from an on-disk
//! format is the out-of-scope "parameter parsing" collaborator named
//! in spec §1. Every field here derives `serde::{Serialize,
//! Deserialize}` so that loader is a thin wrapper when it is built.

mod assort_mix;
mod calibration;
mod classes;
mod demographics;
mod error;
mod features;
mod hiv;
mod model_params;
mod partnership;
mod prep;
mod program;

pub use assort_mix::{AssortMixDef, AssortMixParams};
pub use calibration::{
    CalibrationParams, NetworkCalibration, NetworkTrimCalibration, PartnershipCalibration,
    SexCalibration,
};
pub use classes::ClassesParams;
pub use demographics::{AgeBinParams, DemographicEntry, DemographicsParams, HivInitParams, IncarDemographicParams};
pub use error::ConfigError;
pub use features::FeatureParams;
pub use hiv::{AcuteParams, HivParams, PerActProbs};
pub use model_params::{ModelParams, NetworkParams, SeedParams, TimeParams};
pub use partnership::{BondProbability, BondsParams, DurationParams, NetworkMixingParams, PartnershipParams, SameComponentParams};
pub use prep::{AttitudeBinParams, PcaParams, PrepParams};
pub use program::{CondomUseType, HighRiskProgramParams, IncarProgramParams, ProgramParams, SyringeServicesParams};

/// The full parameter tree consumed by [`crate::population::Population`]
/// and [`crate::model::Model`] (spec §6).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Params {
    /// `model.*`.
    pub model: ModelParams,
    /// `classes.*`.
    pub classes: ClassesParams,
    /// `features.*`.
    pub features: FeatureParams,
    /// `demographics[race][sex_type].*`.
    pub demographics: DemographicsParams,
    /// `partnership.*`.
    pub partnership: PartnershipParams,
    /// `calibration.*`.
    pub calibration: CalibrationParams,
    /// `hiv.*`.
    pub hiv: HivParams,
    /// `prep.*`.
    pub prep: PrepParams,
    /// `assort_mix[key].*`.
    pub assort_mix: AssortMixParams,
    /// `program.*` (SPEC_FULL.md §3 cross-cutting globals).
    pub program: ProgramParams,
}

impl Params {
    /// Validates the tree's invariants that can be checked without a
    /// concrete population (spec §7: "Configuration error... Reported
    /// at construction; run aborts").
    ///
    /// Per-(race, sex_type) lookups that are simply absent are instead
    /// reported lazily by [`DemographicsParams::get`], since a run may
    /// legitimately declare fewer demographic cells than the full
    /// race x sex_type cross-product.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.num_pop == 0 {
            return Err(ConfigError::NonPositiveNumPop(0));
        }
        for (_, _, entry) in self.demographics.iter() {
            for bond in entry.num_partners.keys() {
                if self.classes.bond_type(bond).is_none() {
                    return Err(ConfigError::UnknownBondType(bond.as_str().to_string()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ActKind, BondTypeDef, BondTypeName, Race, SexType};
    use std::collections::HashMap;

    fn minimal_params(num_pop: u64) -> Params {
        let mut bond_types = HashMap::new();
        bond_types.insert(BondTypeName::new("Sex"), BondTypeDef::new("Sex", [ActKind::Sex]));
        Params {
            model: ModelParams {
                num_pop,
                time: TimeParams { num_steps: 10, burn_steps: 0, steps_per_year: 52 },
                network: NetworkParams { enable: true, network_type: "default".into(), component_size_max: 100 },
                seed: SeedParams { ppl: 1, run: 2 },
            },
            classes: ClassesParams {
                races: vec![Race::Black],
                sex_types: vec![SexType::HM, SexType::HF],
                bond_types,
                populations: vec!["default".into()],
            },
            features: FeatureParams::none(),
            demographics: DemographicsParams::new(),
            partnership: PartnershipParams {
                bonds: BondsParams::new(),
                duration: DurationParams {
                    sex: crate::types::Distribution::Bins(vec![]),
                    injection: crate::types::Distribution::Bins(vec![]),
                },
                network: NetworkMixingParams { same_component: SameComponentParams { prob: 0.0 } },
            },
            calibration: CalibrationParams {
                sex: SexCalibration { partner: 1.0, act: 1.0 },
                partnership: PartnershipCalibration { buffer: 1.2, break_point: 5 },
                needle_act_scaling: 1.0,
                sex_act_scaling: 1.0,
                test_freq: 1.0,
                art_cov: 1.0,
                prog_aids: 1.0,
                incar: 1.0,
                network: NetworkCalibration { trim: NetworkTrimCalibration { prob: 0.0 } },
            },
            hiv: HivParams {
                start_time: 0,
                acute: AcuteParams { duration: 12, infectivity: 3.0 },
                per_act: HashMap::new(),
            },
            prep: PrepParams {
                target: 0.0,
                start_time: 0,
                target_model: crate::enums::PrepTargetingModel::Default,
                prep_type: crate::enums::PrepType::Oral,
                peak_load: 1.0,
                fallout_t: 4,
                adherence_efficacy: 0.96,
                non_adherence_efficacy: 0.76,
                resist: 0.01,
                pca: PcaParams::default(),
            },
            assort_mix: AssortMixParams::new(),
            program: ProgramParams {
                incar: IncarProgramParams {
                    pris_test_prob: 0.5,
                    art_enroll: 0.3,
                    art_loss_on_release: 0.2,
                    treat_ric: false,
                    treatment_program_threshold: 1000,
                },
                high_risk: HighRiskProgramParams { proportion: 0.3, duration: HashMap::new(), partner_scale: 2.0 },
                syringe_services: SyringeServicesParams { prevalence: 0.0, coverage: 0.0 },
                condom_use_type: CondomUseType::ActBased,
            },
        }
    }

    #[test]
    fn validate_rejects_zero_population() {
        let params = minimal_params(0);
        assert_eq!(params.validate(), Err(ConfigError::NonPositiveNumPop(0)));
    }

    #[test]
    fn validate_accepts_minimal_params() {
        let params = minimal_params(100);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn validate_rejects_undeclared_bond_type() {
        let mut params = minimal_params(100);
        let mut num_partners = HashMap::new();
        num_partners.insert(BondTypeName::new("Unknown"), crate::types::Distribution::Bins(vec![]));
        let entry = DemographicEntry {
            ppl: 1.0,
            num_partners,
            hiv: HivInitParams { init: 0.0, dx_init: 0.0, max_init_time: 1 },
            aids_init: 0.0,
            haart_init: 0.0,
            haart_adherence: 0.0,
            prep_init: 0.0,
            incar: IncarDemographicParams {
                init: 0.0,
                prob: 0.0,
                duration_init: crate::types::Distribution::Bins(vec![]),
                duration: crate::types::Distribution::Bins(vec![]),
            },
            high_risk_init: 0.0,
            age: HashMap::new(),
            msmw_prob: 0.0,
            haart_prev: 0.0,
            haart_disc: 0.0,
            hiv_test_prob: 0.0,
            prep_disc: 0.0,
            prep_adherence: 0.0,
            needle_share: 0.0,
            sex_acts_mean: 0.0,
            condom_unsafe_prob: 0.0,
            death_rate: 0.0,
        };
        params.demographics.insert(Race::Black, SexType::HM, entry);
        assert_eq!(
            params.validate(),
            Err(ConfigError::UnknownBondType("Unknown".to_string()))
        );
    }
}

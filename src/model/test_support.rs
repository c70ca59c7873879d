//! Shared fixtures for `model::*` unit tests (spec §8's scenario
//! fixtures need the full `Params`/`Population` tree every feature
//! module reads from, so building it once here avoids nine near-
//! identical copies of the same construction).

use crate::enums::{
    ActKind, BondTypeDef, BondTypeName, DrugType, PrepTargetingModel, PrepType, Race, SexType,
    SleepsWithTable,
};
use crate::params::*;
use crate::population::{Location, Population};
use crate::types::{Distribution, ParametricKind, RandomStreams};
use std::collections::HashMap;
use std::sync::Arc;

fn bond_types() -> HashMap<BondTypeName, BondTypeDef> {
    let mut m = HashMap::new();
    m.insert(BondTypeName::new("Sex"), BondTypeDef::new("Sex", [ActKind::Sex]));
    m.insert(BondTypeName::new("Inj"), BondTypeDef::new("Inj", [ActKind::Injection]));
    m.insert(
        BondTypeName::new("SexInj"),
        BondTypeDef::new("SexInj", [ActKind::Sex, ActKind::Injection]),
    );
    m
}

fn demographic_entry() -> DemographicEntry {
    DemographicEntry {
        ppl: 1.0,
        num_partners: HashMap::new(),
        hiv: HivInitParams { init: 0.0, dx_init: 0.0, max_init_time: 1 },
        aids_init: 0.0,
        haart_init: 0.0,
        haart_adherence: 0.5,
        prep_init: 0.0,
        incar: IncarDemographicParams {
            init: 0.0,
            prob: 0.1,
            duration_init: Distribution::Bins(vec![]),
            duration: Distribution::Parametric { kind: ParametricKind::Poisson, var_1: 3.0, var_2: 0.0 },
        },
        high_risk_init: 0.0,
        age: HashMap::new(),
        msmw_prob: 0.0,
        haart_prev: 0.5,
        haart_disc: 0.1,
        hiv_test_prob: 0.5,
        prep_disc: 0.1,
        prep_adherence: 0.5,
        needle_share: 0.5,
        sex_acts_mean: 2.0,
        condom_unsafe_prob: 0.5,
        death_rate: 1.0,
    }
}

/// A `Params` tree with one demographic cell declared per `(Black, MSM)`,
/// `(Black, HF)`, `(White, HM)`, loose enough for every model-layer test
/// to override specific rates on its own clone.
pub fn minimal_params() -> Arc<Params> {
    let mut demographics = DemographicsParams::new();
    demographics.insert(Race::Black, SexType::MSM, demographic_entry());
    demographics.insert(Race::Black, SexType::HF, demographic_entry());
    demographics.insert(Race::White, SexType::HM, demographic_entry());

    Arc::new(Params {
        model: ModelParams {
            num_pop: 10,
            time: TimeParams { num_steps: 5, burn_steps: 0, steps_per_year: 52 },
            network: NetworkParams { enable: true, network_type: "default".into(), component_size_max: 50 },
            seed: SeedParams { ppl: 1, run: 2 },
        },
        classes: ClassesParams {
            races: vec![Race::Black, Race::White],
            sex_types: vec![SexType::HM, SexType::HF, SexType::MSM],
            bond_types: bond_types(),
            populations: vec!["default".into()],
        },
        features: FeatureParams {
            incar: true,
            prep: true,
            high_risk: true,
            static_network: false,
            msmw: true,
            syringe_services: true,
            assort_mix: false,
            pca: false,
        },
        demographics,
        partnership: PartnershipParams {
            bonds: BondsParams::new(),
            duration: DurationParams {
                sex: Distribution::Parametric { kind: ParametricKind::Poisson, var_1: 10.0, var_2: 0.0 },
                injection: Distribution::Parametric { kind: ParametricKind::Poisson, var_1: 10.0, var_2: 0.0 },
            },
            network: NetworkMixingParams { same_component: SameComponentParams { prob: 0.0 } },
        },
        calibration: CalibrationParams {
            sex: SexCalibration { partner: 1.0, act: 1.0 },
            partnership: PartnershipCalibration { buffer: 1.5, break_point: 5 },
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
            per_act: {
                let mut per_act = HashMap::new();
                let mut black = HashMap::new();
                black.insert(SexType::MSM, PerActProbs { sex: 0.5, injection: 0.5 });
                black.insert(SexType::HF, PerActProbs { sex: 0.5, injection: 0.5 });
                per_act.insert(Race::Black, black);
                let mut white = HashMap::new();
                white.insert(SexType::HM, PerActProbs { sex: 0.5, injection: 0.5 });
                per_act.insert(Race::White, white);
                per_act
            },
        },
        prep: PrepParams {
            target: 0.5,
            start_time: 0,
            target_model: PrepTargetingModel::Default,
            prep_type: PrepType::Oral,
            peak_load: 1.0,
            fallout_t: 4,
            adherence_efficacy: 0.96,
            non_adherence_efficacy: 0.76,
            resist: 0.5,
            pca: PcaParams::default(),
        },
        assort_mix: AssortMixParams::new(),
        program: ProgramParams {
            incar: IncarProgramParams {
                pris_test_prob: 0.5,
                art_enroll: 0.5,
                art_loss_on_release: 0.5,
                treat_ric: false,
                treatment_program_threshold: 2,
            },
            high_risk: HighRiskProgramParams {
                proportion: 1.0,
                duration: {
                    let mut m = HashMap::new();
                    m.insert(SexType::MSM, 5u32);
                    m.insert(SexType::HM, 5u32);
                    m.insert(SexType::HF, 5u32);
                    m
                },
                partner_scale: 2.0,
            },
            syringe_services: SyringeServicesParams { prevalence: 0.5, coverage: 1.0 },
            condom_use_type: CondomUseType::ActBased,
        },
    })
}

/// An empty `Population` wired from [`minimal_params`], with one
/// `"default"` location and a `sleeps_with` table declaring
/// MSM-with-MSM and HM-with-HF as mutually compatible.
pub fn minimal_population() -> Population {
    let params = minimal_params();
    let streams = RandomStreams::new(params.model.seed.ppl, params.model.seed.run);
    let mut locations = HashMap::new();
    locations.insert("default".to_string(), Arc::new(Location::new("default")));
    let mut sleeps_with = SleepsWithTable::new();
    sleeps_with.set(SexType::MSM, vec![SexType::MSM]);
    sleeps_with.set(SexType::HM, vec![SexType::HF]);
    sleeps_with.set(SexType::HF, vec![SexType::HM]);
    Population::new(params, locations, &streams, sleeps_with)
}

/// Creates one agent of the given demographics in `pop`'s `"default"`
/// location, bypassing clinical seeding.
pub fn add_agent(pop: &mut Population, race: Race, sex_type: SexType, drug_type: DrugType) -> crate::types::AgentId {
    let location = pop.locations["default"].clone();
    pop.create_agent(race, sex_type, drug_type, location, false)
}

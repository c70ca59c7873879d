//! `demographics[race][sex_type].*` parameter branch (spec §6).
//!
//! Every probabilistic rate or distribution the core looks up by
//! `(race, sex_type)` lives under one [`DemographicEntry`], keyed by
//! [`Race`] then [`SexType`] in [`DemographicsParams`].

use crate::enums::{BondTypeName, DrugType, Race, SexType};
use crate::params::ConfigError;
use crate::types::Distribution;
use std::collections::HashMap;

/// `demographics[race][sex_type].hiv.*`: initial HIV seeding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HivInitParams {
    /// Probability an agent of this demographic starts HIV-positive.
    pub init: f64,
    /// Probability a seeded HIV-positive agent starts diagnosed.
    pub dx_init: f64,
    /// Maximum `hiv_time` an agent may start with (uniformly sampled
    /// in `[1, max_init_time]`), modeling a population already mid-course
    /// at t=0.
    pub max_init_time: u32,
}

/// `demographics[race][sex_type].incar.*`: incarceration seeding and
/// per-step hazard (SPEC_FULL.md §3: init-time vs steady-state split).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IncarDemographicParams {
    /// Probability this demographic starts incarcerated at population
    /// construction (`Population::initialize_incarceration`).
    pub init: f64,
    /// Per-step steady-state incarceration hazard base rate, scaled by
    /// `(1 + 4*hiv) * calibration.incar` (spec §4.7).
    pub prob: f64,
    /// Duration distribution used for agents incarcerated at
    /// population construction (over-represents long sentences, per
    /// SPEC_FULL.md §3).
    pub duration_init: Distribution,
    /// Duration distribution used for steady-state incarceration draws.
    pub duration: Distribution,
}

/// `demographics[race][sex_type].age[bin].*`: one age bin.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AgeBinParams {
    /// Selection probability (not necessarily pre-normalized to a
    /// cumulative sum; see [`AgeBinParams::to_distribution`]).
    pub prob: f64,
    /// Inclusive minimum age in this bin.
    pub min: u32,
    /// Exclusive maximum age in this bin.
    pub max: u32,
}

/// One demographic cell: every rate/distribution keyed by a single
/// `(race, sex_type)` pair.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DemographicEntry {
    /// Relative population weight for this demographic cell (used when
    /// drawing `sex_type`/`race` during agent creation).
    pub ppl: f64,
    /// Per-bond-type mean-partner-count distribution (spec §4.3:
    /// "a mean partner count is drawn from a distribution").
    pub num_partners: HashMap<BondTypeName, Distribution>,
    /// HIV seeding parameters.
    pub hiv: HivInitParams,
    /// Probability this demographic starts with AIDS (only meaningful
    /// when also seeded HIV-positive).
    pub aids_init: f64,
    /// Probability an HIV-positive agent of this demographic starts on
    /// HAART.
    pub haart_init: f64,
    /// Probability a HAART-initialized agent starts at adherence tier 5
    /// (spec §4.6: "probability `haart_adh[race,sex_type]` -> adherence=5").
    pub haart_adherence: f64,
    /// Probability this demographic starts enrolled in PrEP.
    pub prep_init: f64,
    /// Incarceration seeding and hazard parameters.
    pub incar: IncarDemographicParams,
    /// Probability this demographic starts in high-risk status.
    pub high_risk_init: f64,
    /// Age bins, keyed by an arbitrary bin label (spec §6:
    /// `age[bin].{prob, min, max}`).
    pub age: HashMap<String, AgeBinParams>,
    /// Probability a heterosexual-male agent of this demographic is
    /// also MSMW (SPEC_FULL.md §3; meaningful only for `SexType::HM`).
    pub msmw_prob: f64,
    /// Per-step probability a diagnosed HAART-negative agent of this
    /// demographic enrolls in HAART (spec §4.6: "Bernoulli(`haart_prev
    /// × calibration.art_cov`)").
    pub haart_prev: f64,
    /// Per-step probability a HAART-positive agent of this demographic
    /// discontinues (spec §4.6).
    pub haart_disc: f64,
    /// Per-step base diagnosis test probability, scaled by
    /// `calibration.test_freq` (spec §4.6: `hiv_test_prob[race,sex_type]`).
    pub hiv_test_prob: f64,
    /// Per-step PrEP discontinuation probability (spec §4.6:
    /// `prep_disc[race,sex_type]`).
    pub prep_disc: f64,
    /// Probability a newly enrolled PrEP agent of this demographic is
    /// adherent, absent a location override (spec §4.6: `prep_adherence`).
    pub prep_adherence: f64,
    /// Per-act probability of unsafe (unprotected) needle use absent
    /// syringe-exchange enrollment (spec §4.5: `needle_share[race,
    /// sex_type]`).
    pub needle_share: f64,
    /// Mean number of sex acts per step for this demographic, the
    /// Poisson mean behind both `sex_acts_distribution` (sexual
    /// transmission) and injection transmission's `mean_n_acts`
    /// (spec §4.5, §6: `sex_acts[race,sex_type]`).
    pub sex_acts_mean: f64,
    /// Per-act probability of an unsafe (condomless) sex act, used only
    /// when `params.program.condom_use_type == Race` (spec §4.5).
    pub condom_unsafe_prob: f64,
    /// Baseline per-step death probability for an HIV-negative agent of
    /// this demographic (spec §4.8: `death_rate(hiv, aids, race,
    /// haart_adh)`'s race/sex-keyed baseline).
    pub death_rate: f64,
}

impl DemographicEntry {
    /// Converts the age-bin table into a [`Distribution::Bins`] for
    /// sampling an age at agent creation. Bin iteration order is
    /// sorted by label so the resulting cumulative sequence is
    /// deterministic across runs (spec §5: stable iteration order).
    #[must_use]
    pub fn age_distribution(&self) -> Distribution {
        let mut labels: Vec<&String> = self.age.keys().collect();
        labels.sort();
        let total: f64 = self.age.values().map(|b| b.prob).sum();
        let mut cumulative = 0.0;
        let bins = labels
            .into_iter()
            .map(|label| {
                let bin = &self.age[label];
                cumulative += if total > 0.0 { bin.prob / total } else { 0.0 };
                crate::types::Bin {
                    cumulative_prob: cumulative,
                    min: i64::from(bin.min),
                    max: i64::from(bin.max),
                }
            })
            .collect();
        Distribution::Bins(bins)
    }
}

/// `demographics.*`: the full per-`(race, sex_type)` table.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DemographicsParams {
    entries: HashMap<Race, HashMap<SexType, DemographicEntry>>,
}

impl DemographicsParams {
    /// Creates an empty table. Populate with [`Self::insert`].
    #[must_use]
    pub fn new() -> Self {
        DemographicsParams { entries: HashMap::new() }
    }

    /// Inserts (or replaces) the demographic entry for `(race, sex_type)`.
    pub fn insert(&mut self, race: Race, sex_type: SexType, entry: DemographicEntry) {
        self.entries.entry(race).or_default().insert(sex_type, entry);
    }

    /// Looks up the demographic entry for `(race, sex_type)`, returning
    /// a [`ConfigError::MissingDemographics`] if absent (spec §7).
    pub fn get(&self, race: Race, sex_type: SexType) -> Result<&DemographicEntry, ConfigError> {
        self.entries
            .get(&race)
            .and_then(|by_sex| by_sex.get(&sex_type))
            .ok_or_else(|| ConfigError::MissingDemographics {
                race: race.name().to_string(),
                sex_type: sex_type.name().to_string(),
            })
    }

    /// Iterates every `(race, sex_type, entry)` triple, sorted by race
    /// then sex type for deterministic iteration (spec §5).
    pub fn iter(&self) -> impl Iterator<Item = (Race, SexType, &DemographicEntry)> {
        let mut races: Vec<&Race> = self.entries.keys().collect();
        races.sort_by_key(|r| r.name());
        races.into_iter().flat_map(move |race| {
            let mut sex_types: Vec<&SexType> = self.entries[race].keys().collect();
            sex_types.sort_by_key(|s| s.name());
            sex_types
                .into_iter()
                .map(move |sex_type| (*race, *sex_type, &self.entries[race][sex_type]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::DrugType as _;

    fn sample_entry() -> DemographicEntry {
        DemographicEntry {
            ppl: 0.5,
            num_partners: HashMap::new(),
            hiv: HivInitParams { init: 0.1, dx_init: 0.5, max_init_time: 12 },
            aids_init: 0.0,
            haart_init: 0.0,
            haart_adherence: 0.3,
            prep_init: 0.0,
            incar: IncarDemographicParams {
                init: 0.0,
                prob: 0.01,
                duration_init: Distribution::Bins(vec![]),
                duration: Distribution::Bins(vec![]),
            },
            high_risk_init: 0.0,
            age: {
                let mut m = HashMap::new();
                m.insert("young".to_string(), AgeBinParams { prob: 0.6, min: 18, max: 30 });
                m.insert("old".to_string(), AgeBinParams { prob: 0.4, min: 30, max: 60 });
                m
            },
            msmw_prob: 0.0,
            haart_prev: 0.1,
            haart_disc: 0.01,
            hiv_test_prob: 0.1,
            prep_disc: 0.02,
            prep_adherence: 0.5,
            needle_share: 0.3,
            sex_acts_mean: 2.0,
            condom_unsafe_prob: 0.4,
            death_rate: 0.001,
        }
    }

    #[test]
    fn missing_entry_is_config_error() {
        let table = DemographicsParams::new();
        let err = table.get(Race::Black, SexType::HM).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDemographics { .. }));
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut table = DemographicsParams::new();
        table.insert(Race::Black, SexType::HM, sample_entry());
        let entry = table.get(Race::Black, SexType::HM).unwrap();
        assert_eq!(entry.ppl, 0.5);
    }

    #[test]
    fn age_distribution_cumulative_reaches_one() {
        let entry = sample_entry();
        match entry.age_distribution() {
            Distribution::Bins(bins) => {
                assert_eq!(bins.len(), 2);
                assert!((bins.last().unwrap().cumulative_prob - 1.0).abs() < 1e-9);
            }
            _ => panic!("expected bins"),
        }
    }

    #[test]
    fn iter_is_sorted_deterministically() {
        let mut table = DemographicsParams::new();
        table.insert(Race::White, SexType::HF, sample_entry());
        table.insert(Race::Black, SexType::HM, sample_entry());
        let order: Vec<(Race, SexType)> =
            table.iter().map(|(r, s, _)| (r, s)).collect();
        assert_eq!(order, vec![(Race::Black, SexType::HM), (Race::White, SexType::HF)]);
    }
}

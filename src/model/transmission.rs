//! Per-relationship HIV transmission (spec §4.5).
//!
//! Injection and sexual transmission share the same shape: draw an act
//! count, retain an "unsafe" subset, convert the per-act probability
//! plus retained-act count into a single total probability via
//! [`crate::types::total_probability`], then one Bernoulli trial
//! against `run_random` decides seroconversion. Combined bonds run
//! injection-only with fixed probability [`INJECTION_ONLY_PROB`],
//! mirroring `original_source/titan/ABM_core.py`'s `agents_interact`.

use crate::enums::{ActKind, DrugType, Race, SexType};
use crate::model::{model::StepEvents, prep};
use crate::population::Population;
use crate::types::{total_probability, AgentId, RandomStream, RelationshipId};

/// Probability a combined injection+sex bond's interaction this step is
/// injection-only rather than running both legs (spec §4.5).
const INJECTION_ONLY_PROB: f64 = 0.25;

/// Per-act unsafe-injection probability when the source is enrolled in
/// syringe/needle-exchange services (spec §4.5).
const SYRINGE_EXCHANGE_P_UNSAFE: f64 = 0.02;

/// Exponential decay rate applied to injectable PrEP load when
/// computing its transmission-risk reduction factor (spec §4.5:
/// "injectable: `(1 − (1 − e^(−k·load)))`"). No params field names this
/// constant; chosen so a full `peak_load` gives near-complete
/// protection and decays over the course of a dosing interval.
const PREP_INJECTABLE_DECAY_K: f64 = 1.0;

/// A cheap, `Copy` snapshot of the agent fields transmission needs, so
/// every calculation below works from owned values instead of holding
/// a borrow of `pop` across the mutation that follows.
#[derive(Debug, Clone, Copy)]
struct SourceSnapshot {
    race: Race,
    sex_type: SexType,
    drug_type: DrugType,
    syringe_services: bool,
    hiv_time: u32,
}

#[derive(Debug, Clone, Copy)]
struct SusceptibleSnapshot {
    drug_type: DrugType,
    on_prep: bool,
    prep_resistant: bool,
    prep_adherent: bool,
    prep_type: Option<crate::enums::PrepType>,
    prep_load: f64,
}

fn source_snapshot(pop: &Population, id: AgentId) -> Option<SourceSnapshot> {
    let agent = pop.agent(id)?;
    Some(SourceSnapshot {
        race: agent.race,
        sex_type: agent.sex_type,
        drug_type: agent.drug_type,
        syringe_services: agent.syringe_services,
        hiv_time: agent.hiv_time,
    })
}

fn susceptible_snapshot(pop: &Population, id: AgentId) -> Option<SusceptibleSnapshot> {
    let agent = pop.agent(id)?;
    Some(SusceptibleSnapshot {
        drug_type: agent.drug_type,
        on_prep: agent.prep.active,
        prep_resistant: agent.prep.resistance,
        prep_adherent: agent.prep.adherent,
        prep_type: agent.prep.prep_type,
        prep_load: agent.prep.load,
    })
}

/// Returns `(source, susceptible)` if `rel_id` has exactly one
/// HIV-positive endpoint and neither endpoint is incarcerated (spec
/// §4.5: "Only relationships where exactly one endpoint is HIV+... can
/// transmit"). `None` otherwise.
fn transmissible_pair(pop: &Population, rel_id: RelationshipId) -> Option<(AgentId, AgentId)> {
    let rel = pop.relationship(rel_id)?;
    let one = pop.agent(rel.agent_one)?;
    let two = pop.agent(rel.agent_two)?;
    if one.incar.active || two.incar.active {
        return None;
    }
    match (one.hiv, two.hiv) {
        (true, false) => Some((one.id, two.id)),
        (false, true) => Some((two.id, one.id)),
        _ => None,
    }
}

/// Runs one step's transmission attempt(s) over relationship `rel_id`
/// (spec §4.4.c: `agents_interact(t, rel)`). A no-op if the relationship
/// is not currently transmissible or has since been removed.
pub fn interact(
    pop: &mut Population,
    rel_id: RelationshipId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some((source, susceptible)) = transmissible_pair(&*pop, rel_id) else { return };
    let Some(bond) = pop.relationship(rel_id).map(|r| r.bond.clone()) else { return };
    let Some(bond_def) = pop.params.classes.bond_type(&bond).cloned() else { return };

    if bond_def.is_combined() {
        if run_random.bernoulli(INJECTION_ONLY_PROB) {
            attempt_injection(pop, source, susceptible, run_random, events);
        } else {
            attempt_injection(pop, source, susceptible, run_random, events);
            attempt_sex(pop, rel_id, source, susceptible, run_random, events);
        }
        return;
    }
    if bond_def.requires_injection() {
        attempt_injection(pop, source, susceptible, run_random, events);
    }
    if bond_def.requires_sex() {
        attempt_sex(pop, rel_id, source, susceptible, run_random, events);
    }
}

/// Injection-transmission leg (spec §4.5: "Injection transmission").
/// Requires both endpoints to be injection drug users.
fn attempt_injection(
    pop: &mut Population,
    source: AgentId,
    susceptible: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some(src) = source_snapshot(pop, source) else { return };
    let Some(sus) = susceptible_snapshot(pop, susceptible) else { return };
    if !src.drug_type.is_injection_user() || !sus.drug_type.is_injection_user() {
        return;
    }
    let Ok(demographic) = pop.params.demographics.get(src.race, src.sex_type) else { return };
    let mean_n_acts = demographic.sex_acts_mean * pop.params.calibration.needle_act_scaling;
    let safe_needle_exchange_prevalence = pop.params.program.syringe_services.prevalence;
    let needle_share = demographic.needle_share;
    let acute_duration = pop.params.hiv.acute.duration;
    let acute_infectivity = pop.params.hiv.acute.infectivity;
    let mut per_act = pop.params.hiv.per_act_prob(src.race, src.sex_type, ActKind::Injection);
    if src.hiv_time < acute_duration {
        per_act *= acute_infectivity;
    }

    let mut share_acts = run_random.poisson(mean_n_acts);
    let p_unsafe = if src.syringe_services {
        SYRINGE_EXCHANGE_P_UNSAFE
    } else {
        share_acts = share_acts.max(1);
        needle_share * safe_needle_exchange_prevalence
    };

    let mut retained = 0u64;
    for _ in 0..share_acts {
        if run_random.bernoulli(p_unsafe) {
            retained += 1;
        }
    }

    let total = total_probability(per_act, retained);
    if run_random.bernoulli(total) {
        seroconvert(pop, susceptible, run_random, events);
    }
}

/// Sexual-transmission leg (spec §4.5: "Sexual transmission").
fn attempt_sex(
    pop: &mut Population,
    rel_id: RelationshipId,
    source: AgentId,
    susceptible: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some(src) = source_snapshot(pop, source) else { return };
    let Some(sus) = susceptible_snapshot(pop, susceptible) else { return };
    let Ok(demographic) = pop.params.demographics.get(src.race, src.sex_type) else { return };
    let mean_sex_acts = demographic.sex_acts_mean * pop.params.calibration.sex_act_scaling;
    let condom_use_type = pop.params.program.condom_use_type;
    let race_condom_unsafe_prob = demographic.condom_unsafe_prob;
    let acute_duration = pop.params.hiv.acute.duration;
    let acute_infectivity = pop.params.hiv.acute.infectivity;
    let mut ppact = pop.params.hiv.per_act_prob(src.race, src.sex_type, ActKind::Sex);
    if src.hiv_time < acute_duration {
        ppact *= acute_infectivity;
    }
    let adherence_efficacy = pop.params.prep.adherence_efficacy;
    let non_adherence_efficacy = pop.params.prep.non_adherence_efficacy;

    let total_sex_acts_so_far = pop.relationship(rel_id).map(|r| r.total_sex_acts).unwrap_or(0);

    let t = run_random.poisson(mean_sex_acts);
    let p_unsafe = match condom_use_type {
        crate::params::CondomUseType::Race => race_condom_unsafe_prob,
        crate::params::CondomUseType::ActBased => condom_fatigue(total_sex_acts_so_far),
    };

    let mut unsafe_acts = 0u64;
    for _ in 0..t {
        if run_random.bernoulli(p_unsafe) {
            unsafe_acts += 1;
        }
    }
    if unsafe_acts == 0 {
        return;
    }

    if let Some(rel) = pop.relationship_mut(rel_id) {
        rel.total_sex_acts += unsafe_acts;
    }

    if sus.on_prep && !sus.prep_resistant {
        ppact *= prep_reduction_factor(&sus, adherence_efficacy, non_adherence_efficacy);
    }

    let total = total_probability(ppact, unsafe_acts);
    if run_random.bernoulli(total) {
        seroconvert(pop, susceptible, run_random, events);
    }
}

/// Per-act unsafe-sex-act probability as a monotone function of acts
/// already accumulated on this relationship (spec §4.5:
/// "`condom_use_type=="ActBased"`... monotone function of
/// `rel.total_sex_acts`"). Condom use erodes with relationship length,
/// capped well short of certainty.
fn condom_fatigue(total_sex_acts: u64) -> f64 {
    (0.2 + 0.01 * total_sex_acts as f64).min(0.9)
}

/// Transmission-probability reduction factor for a PrEP-enrolled,
/// non-resistant susceptible agent (spec §4.5).
fn prep_reduction_factor(sus: &SusceptibleSnapshot, adherence_efficacy: f64, non_adherence_efficacy: f64) -> f64 {
    match sus.prep_type {
        Some(crate::enums::PrepType::Oral) | None => {
            if sus.prep_adherent {
                1.0 - adherence_efficacy
            } else {
                1.0 - non_adherence_efficacy
            }
        }
        Some(crate::enums::PrepType::Injectable) => {
            if sus.prep_adherent {
                1.0 - (1.0 - (-PREP_INJECTABLE_DECAY_K * sus.prep_load).exp())
            } else {
                1.0
            }
        }
    }
}

/// Marks `agent_id` HIV-positive, records the step's new infection, and
/// runs the PrEP-resistance/forced-discontinuation side effects (spec
/// §4.5: "Becoming HIV+": "If previously on PrEP, with probability
/// `prep.resist`, set `prep_resistance=true`; force PrEP
/// discontinuation").
pub(crate) fn seroconvert(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let was_on_prep = pop.agent(agent_id).is_some_and(|a| a.prep.active);
    if !pop.mark_hiv_positive(agent_id) {
        return;
    }
    events.new_infections.push(agent_id);
    if was_on_prep {
        let resist_prob = pop.params.prep.resist;
        if run_random.bernoulli(resist_prob) {
            if let Some(agent) = pop.agent_mut(agent_id) {
                agent.prep.resistance = true;
            }
        }
        prep::force_discontinue(pop, agent_id);
    }
}

//! PrEP enrollment, discontinuation, and load decay (spec §4.6).
//!
//! Targeting models split into two groups: population-wide passes
//! ([`enrollment_pass`], for `Default`/`RandomTrial`/`Racial`) and
//! event-triggered enrollment ([`enroll_partners_of`], for
//! `Incar`/`IncarHr`/`Clinical`, called from incarceration-release,
//! high-risk-entry, and — for `Clinical` — diagnosis (see
//! `model::clinical::test_for_hiv`, which calls `enroll_partners_of` on
//! a positive test).

use crate::agent::Agent;
use crate::enums::{PrepTargetingModel, PrepType};
use crate::error::SimError;
use crate::model::model::StepEvents;
use crate::population::Population;
use crate::types::{AgentId, RandomStream};

/// Injectable PrEP load decays by this fraction each step once dosing
/// has stopped (spec §4.6: "update `prep_load` via exponential decay
/// each step"). No params field names the rate; chosen so a
/// `peak_load` of 1.0 crosses [`PREP_LOAD_CLEAR_THRESHOLD`] within a
/// handful of steps, matching the sexual-transmission reduction
/// formula in `model::transmission`.
const PREP_INJECTABLE_STEP_DECAY: f64 = 0.1;

/// Below this, a decaying injectable load is treated as fully cleared.
const PREP_LOAD_CLEAR_THRESHOLD: f64 = 0.01;

/// Enrolls `agent_id` in PrEP (spec §4.6: "Enrollment sets `prep=true`,
/// `prep_time=0`, adherence flag per `prep_adherence`..."). Returns
/// [`SimError::InvalidPrepInitiation`] for an HIV-positive or
/// already-enrolled agent rather than silently succeeding (spec §7).
pub fn initiate(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) -> Result<(), SimError> {
    let Some(agent) = pop.agent(agent_id) else { return Ok(()) };
    if agent.hiv || agent.prep.active {
        return Err(SimError::InvalidPrepInitiation);
    }
    let race = agent.race;
    let sex_type = agent.sex_type;
    let Ok(demographic) = pop.params.demographics.get(race, sex_type) else { return Ok(()) };
    let adherent = run_random.bernoulli(demographic.prep_adherence);
    let prep_type = pop.params.prep.prep_type;
    let peak_load = pop.params.prep.peak_load;

    if let Some(agent) = pop.agent_mut(agent_id) {
        agent.prep.active = true;
        agent.prep.ever = true;
        agent.prep.time = 0;
        agent.prep.adherent = adherent;
        agent.prep.prep_type = Some(prep_type);
        agent.prep.fallout_time = 0;
        if prep_type == PrepType::Injectable {
            agent.prep.load = peak_load;
            agent.prep.last_dose = 0;
        }
    }
    events.new_prep.push(agent_id);
    Ok(())
}

/// Unconditional discontinuation, independent of the per-step
/// `prep_disc` roll (spec §4.5: "Becoming HIV+" forces PrEP
/// discontinuation on seroconversion). A no-op if not currently
/// enrolled.
pub(crate) fn force_discontinue(pop: &mut Population, agent_id: AgentId) {
    let fallout_t = pop.params.prep.fallout_t;
    if let Some(agent) = pop.agent_mut(agent_id) {
        if agent.prep.active {
            agent.prep.active = false;
            agent.prep.fallout_time = fallout_t;
            agent.prep.load = 0.0;
        }
    }
}

/// Applies injectable-PrEP load decay to one agent (spec §4.6). A
/// no-op for oral or never-enrolled agents.
fn decay_load(agent: &mut Agent) {
    if agent.prep.prep_type != Some(PrepType::Injectable) {
        return;
    }
    if agent.prep.load > 0.0 {
        agent.prep.load *= (-PREP_INJECTABLE_STEP_DECAY).exp();
        if agent.prep.load < PREP_LOAD_CLEAR_THRESHOLD {
            agent.prep.load = 0.0;
        }
    }
    agent.prep.last_dose += 1;
}

/// Per-agent per-step PrEP update (spec §4.4.e, §4.6): rolls
/// discontinuation for enrolled agents, decays injectable load, and
/// counts down the post-discontinuation fallout timer. Called once per
/// agent per main-loop step, HIV-negative or not — an agent who
/// seroconverts this step was already force-discontinued by
/// `model::transmission::seroconvert` before this runs.
pub fn step_agent(pop: &mut Population, agent_id: AgentId, run_random: &mut RandomStream) {
    let Some(agent) = pop.agent(agent_id) else { return };
    if !agent.prep.active && agent.prep.fallout_time == 0 {
        return;
    }
    let race = agent.race;
    let sex_type = agent.sex_type;
    let active = agent.prep.active;
    let prep_type = agent.prep.prep_type;

    let disc_prob = pop
        .params
        .demographics
        .get(race, sex_type)
        .map(|d| d.prep_disc)
        .unwrap_or(0.0);
    let fallout_t = pop.params.prep.fallout_t;

    if active {
        if run_random.bernoulli(disc_prob) {
            if let Some(agent) = pop.agent_mut(agent_id) {
                agent.prep.active = false;
                agent.prep.fallout_time = fallout_t;
                if prep_type != Some(PrepType::Injectable) {
                    agent.prep.load = 0.0;
                }
            }
        } else if prep_type == Some(PrepType::Injectable) {
            if let Some(agent) = pop.agent_mut(agent_id) {
                decay_load(agent);
            }
        }
    } else if let Some(agent) = pop.agent_mut(agent_id) {
        agent.prep.fallout_time = agent.prep.fallout_time.saturating_sub(1);
        decay_load(agent);
    }
}

/// Population-wide PrEP enrollment pass (spec §4.4.f), for the
/// targeting models that are not tied to a specific trigger event:
/// `Default`, `RandomTrial`, and `Racial`. A no-op before
/// `prep.start_time` or while the PrEP feature is disabled.
pub fn enrollment_pass(
    pop: &mut Population,
    step: u32,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    if !pop.params.features.prep || step < pop.params.prep.start_time {
        return;
    }
    let target_model = pop.params.prep.target_model;
    let target = pop.params.prep.target;
    if !matches!(
        target_model,
        PrepTargetingModel::Default | PrepTargetingModel::RandomTrial | PrepTargetingModel::Racial
    ) {
        return;
    }

    let candidates: Vec<AgentId> = pop
        .agents()
        .filter(|a| !a.hiv && !a.prep.active)
        .map(|a| a.id)
        .collect();
    for agent_id in candidates {
        if run_random.bernoulli(target) {
            let _ = initiate(pop, agent_id, run_random, events);
        }
    }
}

/// Attempts PrEP enrollment for every HIV-negative partner of
/// `agent_id` (spec §4.7: "if the appropriate PrEP targeting model is
/// active, attempt PrEP enrollment for HIV-negative partners"). Called
/// from `model::incarceration` on new incarceration, from
/// `model::high_risk` on high-risk entry, and from
/// `model::clinical::test_for_hiv` on a positive diagnosis; a no-op
/// unless the targeting model is `Incar`, `IncarHr`, or `Clinical`
/// (spec §4.6: "Targeting models", `Clinical` — "enroll HIV-negative
/// partners of newly diagnosed... agents encountered in a clinical
/// setting").
pub fn enroll_partners_of(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    if !pop.params.features.prep {
        return;
    }
    let target_model = pop.params.prep.target_model;
    if !matches!(
        target_model,
        PrepTargetingModel::Incar | PrepTargetingModel::IncarHr | PrepTargetingModel::Clinical
    ) {
        return;
    }
    let target = pop.params.prep.target;
    let partner_ids: Vec<AgentId> = pop
        .relationships()
        .filter_map(|rel| rel.other(agent_id))
        .collect();
    for partner_id in partner_ids {
        let eligible = pop.agent(partner_id).is_some_and(|a| !a.hiv && !a.prep.active);
        if eligible && run_random.bernoulli(target) {
            let _ = initiate(pop, partner_id, run_random, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DrugType, Race, SexType};
    use crate::model::test_support::{add_agent, minimal_population};

    #[test]
    fn initiate_rejects_hiv_positive_agent() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        pop.mark_hiv_positive(agent_id);
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        let result = initiate(&mut pop, agent_id, &mut run_random, &mut events);
        assert!(matches!(result, Err(SimError::InvalidPrepInitiation)));
    }

    #[test]
    fn initiate_rejects_already_enrolled_agent() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        initiate(&mut pop, agent_id, &mut run_random, &mut events).unwrap();
        let result = initiate(&mut pop, agent_id, &mut run_random, &mut events);
        assert!(matches!(result, Err(SimError::InvalidPrepInitiation)));
    }

    #[test]
    fn initiate_marks_agent_enrolled_and_records_event() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let mut run_random = RandomStream::new(7);
        let mut events = StepEvents::default();
        initiate(&mut pop, agent_id, &mut run_random, &mut events).unwrap();
        assert!(pop.agent(agent_id).unwrap().prep.active);
        assert!(pop.agent(agent_id).unwrap().prep.ever);
        assert_eq!(events.new_prep, vec![agent_id]);
    }

    #[test]
    fn force_discontinue_clears_active_flag_and_load() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let mut run_random = RandomStream::new(7);
        let mut events = StepEvents::default();
        initiate(&mut pop, agent_id, &mut run_random, &mut events).unwrap();
        force_discontinue(&mut pop, agent_id);
        let agent = pop.agent(agent_id).unwrap();
        assert!(!agent.prep.active);
        assert_eq!(agent.prep.load, 0.0);
    }

    #[test]
    fn injectable_load_decays_towards_zero() {
        let mut agent = Agent::new(
            AgentId::new(0),
            SexType::MSM,
            30,
            Race::Black,
            DrugType::None,
            std::sync::Arc::new(crate::population::Location::new("default")),
        );
        agent.prep.prep_type = Some(PrepType::Injectable);
        agent.prep.load = 1.0;
        decay_load(&mut agent);
        assert!(agent.prep.load < 1.0);
        for _ in 0..200 {
            decay_load(&mut agent);
        }
        assert_eq!(agent.prep.load, 0.0);
    }

    #[test]
    fn enrollment_pass_only_considers_hiv_negative_unenrolled_agents() {
        let mut pop = minimal_population();
        let positive = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let negative = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        pop.mark_hiv_positive(positive);
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        enrollment_pass(&mut pop, 0, &mut run_random, &mut events);
        assert!(!pop.agent(positive).unwrap().prep.active);
        let _ = negative;
    }
}

//! Incarceration entry, countdown, and release (spec §4.7).

use crate::model::model::StepEvents;
use crate::model::{high_risk, prep};
use crate::population::Population;
use crate::types::{AgentId, RandomStream};

/// Per-agent per-step incarceration update (spec §4.4.e, §4.7). An
/// agent already incarcerated counts down and, on release, rolls
/// high-risk entry and post-release HAART loss; a free agent rolls a
/// new incarceration with probability scaled by HIV status.
pub fn step_agent(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some(agent) = pop.agent(agent_id) else { return };
    if agent.incar.active {
        release_or_continue(pop, agent_id, run_random, events);
    } else {
        maybe_incarcerate(pop, agent_id, run_random, events);
    }
}

fn release_or_continue(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some(agent) = pop.agent_mut(agent_id) else { return };
    agent.incar.time = agent.incar.time.saturating_sub(1);
    if agent.incar.time > 0 {
        return;
    }
    agent.incar.active = false;
    agent.incar.ever = true;
    let was_high_risk = agent.high_risk.active;
    let hiv = agent.hiv;
    let haart_active = agent.haart.active;
    let race = agent.race;
    let sex_type = agent.sex_type;

    events.new_incar_release.push(agent_id);

    if pop.params.features.high_risk && !was_high_risk {
        high_risk::enter(pop, agent_id, run_random, events);
        prep::enroll_partners_of(pop, agent_id, run_random, events);
    }

    if hiv && haart_active && run_random.bernoulli(pop.params.program.incar.art_loss_on_release) {
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.haart.active = false;
            agent.haart.adherence = 1;
        }
        pop.forget_haart(race, sex_type);
    }
}

fn maybe_incarcerate(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some(agent) = pop.agent(agent_id) else { return };
    let race = agent.race;
    let sex_type = agent.sex_type;
    let hiv = agent.hiv;
    let hiv_dx = agent.hiv_dx;
    let Ok(demographic) = pop.params.demographics.get(race, sex_type) else { return };
    let base = demographic.incar.prob;
    let multiplier = if hiv { 5.0 } else { 1.0 };
    let p = base * multiplier * pop.params.calibration.incar;
    if !run_random.bernoulli(p) {
        return;
    }

    let duration_dist = demographic.incar.duration.clone();
    let duration = duration_dist.sample(&mut pop.np_random).max(1) as u32;

    if hiv && !hiv_dx && run_random.bernoulli(pop.params.program.incar.pris_test_prob) {
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.hiv_dx = true;
        }
        pop.record_dx(race, sex_type);
        events.new_dx.push(agent_id);
    } else if hiv && hiv_dx && run_random.bernoulli(pop.params.program.incar.art_enroll) {
        let adherence = crate::model::haart::draw_adherence(demographic.haart_adherence, run_random);
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.haart.active = true;
            agent.haart.ever = true;
            agent.haart.adherence = adherence;
        }
        pop.record_haart(race, sex_type);
    }

    if let Some(agent) = pop.agent_mut(agent_id) {
        agent.incar.active = true;
        agent.incar.time = duration;
    }

    entangle_partners(pop, agent_id, run_random, events);
}

/// Puts partners of a newly incarcerated agent at elevated high-risk
/// entry odds and, under the `Incar`/`IncarHr` targeting models,
/// attempts PrEP for HIV-negative partners (spec §4.7).
fn entangle_partners(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let partner_ids: Vec<AgentId> = pop.relationships().filter_map(|rel| rel.other(agent_id)).collect();
    let proportion = pop.params.program.high_risk.proportion;
    for partner_id in partner_ids {
        let already_high_risk = pop.agent(partner_id).is_some_and(|a| a.high_risk.active);
        if pop.params.features.high_risk && !already_high_risk && run_random.bernoulli(proportion) {
            high_risk::enter(pop, partner_id, run_random, events);
        }
    }
    prep::enroll_partners_of(pop, agent_id, run_random, events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DrugType, Race, SexType};
    use crate::model::test_support::{add_agent, minimal_population};

    #[test]
    fn release_clears_active_flag_and_records_event() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.incar.active = true;
            agent.incar.time = 1;
        }
        let mut run_random = RandomStream::new(3);
        let mut events = StepEvents::default();
        step_agent(&mut pop, agent_id, &mut run_random, &mut events);
        assert!(!pop.agent(agent_id).unwrap().incar.active);
        assert!(pop.agent(agent_id).unwrap().incar.ever);
        assert_eq!(events.new_incar_release, vec![agent_id]);
    }

    #[test]
    fn countdown_decrements_without_releasing() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.incar.active = true;
            agent.incar.time = 3;
        }
        let mut run_random = RandomStream::new(3);
        let mut events = StepEvents::default();
        step_agent(&mut pop, agent_id, &mut run_random, &mut events);
        assert!(pop.agent(agent_id).unwrap().incar.active);
        assert_eq!(pop.agent(agent_id).unwrap().incar.time, 2);
        assert!(events.new_incar_release.is_empty());
    }
}

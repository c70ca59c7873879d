//! High-risk status entry, countdown, and expiry (spec §4.7).

use crate::model::model::StepEvents;
use crate::model::prep;
use crate::population::Population;
use crate::types::{AgentId, RandomStream};

/// Enrolls `agent_id` in high-risk status (spec §4.7: "entry"): sets
/// `active`/`ever`, starts the countdown at
/// `program.high_risk.duration_for(sex_type)`, scales up
/// `mean_num_partners` for every bond by `partner_scale`, and redraws
/// `target_partners` from the new mean (mirroring the redraw
/// `Population::create_agent` performs at construction). A no-op if
/// already high-risk.
pub fn enter(pop: &mut Population, agent_id: AgentId, run_random: &mut RandomStream, events: &mut StepEvents) {
    let Some(agent) = pop.agent(agent_id) else { return };
    if agent.high_risk.active {
        return;
    }
    let sex_type = agent.sex_type;
    let ever = agent.high_risk.ever;
    let duration = pop.params.program.high_risk.duration_for(sex_type);
    let partner_scale = pop.params.program.high_risk.partner_scale;
    let bonds: Vec<_> = pop.params.classes.bond_types.keys().cloned().collect();

    if let Some(agent) = pop.agent_mut(agent_id) {
        agent.high_risk.active = true;
        agent.high_risk.ever = true;
        agent.high_risk.time = duration;
        for bond in &bonds {
            let mean = agent.mean_num_partners.entry(bond.clone()).or_insert(0.0);
            *mean += partner_scale;
        }
    }
    for bond in &bonds {
        let mean = pop.agent(agent_id).and_then(|a| a.mean_num_partners.get(bond)).copied().unwrap_or(0.0);
        let target = pop.np_random.poisson(mean) as u32;
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.target_partners.insert(bond.clone(), target);
        }
    }
    pop.recompute_partnerable(agent_id);
    pop.all_agents.add_to(&["high_risk"], agent_id);

    if !ever {
        events.new_high_risk.push(agent_id);
    }
    prep::enroll_partners_of(pop, agent_id, run_random, events);
}

/// Per-step high-risk countdown and expiry for every currently
/// high-risk agent (spec §4.4.d, §4.7). Snapshots the member list
/// first since expiry mutates `high_risk` set membership.
pub fn step_all(pop: &mut Population, run_random: &mut RandomStream, events: &mut StepEvents) {
    let members: Vec<AgentId> = pop.high_risk_agents().iter().collect();
    for agent_id in members {
        step_agent(pop, agent_id, run_random, events);
    }
}

fn step_agent(pop: &mut Population, agent_id: AgentId, run_random: &mut RandomStream, events: &mut StepEvents) {
    let Some(agent) = pop.agent_mut(agent_id) else { return };
    if agent.high_risk.time == 0 {
        return;
    }
    agent.high_risk.time -= 1;
    if agent.high_risk.time > 0 {
        return;
    }
    expire(pop, agent_id, run_random, events);
}

/// Reverses [`enter`]'s partner-count scaling and clears `active`
/// (spec §4.7: "expiry"): redraws `target_partners` from the
/// de-scaled mean, then force-evicts relationships left over target
/// via `progress(force=true)` (spec §4.7).
fn expire(pop: &mut Population, agent_id: AgentId, _run_random: &mut RandomStream, _events: &mut StepEvents) {
    let Some(agent) = pop.agent(agent_id) else { return };
    if !agent.high_risk.active {
        return;
    }
    let partner_scale = pop.params.program.high_risk.partner_scale;
    let bonds: Vec<_> = pop.params.classes.bond_types.keys().cloned().collect();

    if let Some(agent) = pop.agent_mut(agent_id) {
        agent.high_risk.active = false;
        for bond in &bonds {
            if let Some(mean) = agent.mean_num_partners.get_mut(bond) {
                *mean = (*mean - partner_scale).max(0.0);
            }
        }
    }
    for bond in &bonds {
        let mean = pop.agent(agent_id).and_then(|a| a.mean_num_partners.get(bond)).copied().unwrap_or(0.0);
        let target = pop.np_random.poisson(mean) as u32;
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.target_partners.insert(bond.clone(), target);
        }
        pop.evict_excess_partners(agent_id, bond);
    }
    pop.recompute_partnerable(agent_id);
    if let Some(high_risk) = pop.all_agents.subset_mut("high_risk") {
        high_risk.remove(agent_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DrugType, Race, SexType};
    use crate::model::test_support::{add_agent, minimal_population};

    #[test]
    fn enter_sets_active_and_records_first_time_event() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        enter(&mut pop, agent_id, &mut run_random, &mut events);
        assert!(pop.agent(agent_id).unwrap().high_risk.active);
        assert!(pop.high_risk_agents().contains(agent_id));
        assert_eq!(events.new_high_risk, vec![agent_id]);
    }

    #[test]
    fn countdown_expires_and_removes_from_high_risk_set() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        enter(&mut pop, agent_id, &mut run_random, &mut events);
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.high_risk.time = 1;
        }
        step_all(&mut pop, &mut run_random, &mut events);
        assert!(!pop.agent(agent_id).unwrap().high_risk.active);
        assert!(!pop.high_risk_agents().contains(agent_id));
    }
}

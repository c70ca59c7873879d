//! Diagnosis and AIDS progression (spec §4.6).

use crate::error::SimError;
use crate::model::model::StepEvents;
use crate::model::prep;
use crate::population::Population;
use crate::types::{AgentId, RandomStream};

/// Probability an undiagnosed HIV-positive agent on adherence tier
/// `adherence` (1..5, GLOSSARY) is diagnosed this step (spec §4.6:
/// "test probability scales with calibration.test_freq"). Adherence
/// has no bearing on diagnosis; this is just the demographic test
/// probability scaled by the calibration factor.
fn test_probability(hiv_test_prob: f64, test_freq: f64) -> f64 {
    hiv_test_prob * test_freq
}

/// Rolls the per-step HIV test for one agent (spec §4.6: "Diagnosis").
/// A no-op for agents who are already diagnosed or HIV-negative. On a
/// positive test: sets `hiv_dx`, records it on the diagnosed-count
/// ledger, pushes `agent_id` onto `events.new_dx`, and — under the
/// `Clinical` PrEP targeting model — attempts PrEP enrollment for the
/// agent's HIV-negative partners (spec §4.6: "Targeting models",
/// `Clinical`).
pub fn test_for_hiv(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
    events: &mut StepEvents,
) {
    let Some(agent) = pop.agent(agent_id) else { return };
    if !agent.hiv || agent.hiv_dx {
        return;
    }
    let race = agent.race;
    let sex_type = agent.sex_type;
    let Ok(demographic) = pop.params.demographics.get(race, sex_type) else { return };
    let p = test_probability(demographic.hiv_test_prob, pop.params.calibration.test_freq);
    if !run_random.bernoulli(p) {
        return;
    }
    if let Some(agent) = pop.agent_mut(agent_id) {
        agent.hiv_dx = true;
    }
    pop.record_dx(race, sex_type);
    events.new_dx.push(agent_id);
    prep::enroll_partners_of(pop, agent_id, run_random, events);
}

/// Maps a HAART adherence tier (1..5) onto the probability that it
/// fully suppresses progression to AIDS (GLOSSARY, spec §4.6). The
/// originating Python (`probabilities.adherence_prob`) was not
/// retrievable from the source pack; this monotone mapping — tier 5
/// (near-perfect adherence) almost always suppressing, tier 1 rarely
/// doing so — is this crate's own resolution of that gap (DESIGN.md).
fn adherence_suppression(adherence: u8) -> f64 {
    match adherence {
        1 => 0.05,
        2 => 0.20,
        3 => 0.40,
        4 => 0.60,
        _ => 0.90,
    }
}

/// Rolls AIDS progression for one agent (spec §4.6: "Progression to
/// AIDS"). Agents on HAART progress at the full calibrated rate,
/// reduced by how well the regimen is suppressing (see
/// [`adherence_suppression`]); agents not on HAART progress at the
/// unreduced rate. Returns [`SimError::AidsOnHivNegative`] rather than
/// silently returning for an HIV-negative agent (spec §7).
pub fn progress_to_aids(
    pop: &mut Population,
    agent_id: AgentId,
    run_random: &mut RandomStream,
) -> Result<(), SimError> {
    let Some(agent) = pop.agent(agent_id) else { return Ok(()) };
    if !agent.hiv {
        return Err(SimError::AidsOnHivNegative);
    }
    if agent.aids {
        return Ok(());
    }
    let base = pop.params.calibration.prog_aids;
    let p = if agent.haart.active {
        base * (1.0 - adherence_suppression(agent.haart.adherence))
    } else {
        base
    };
    if run_random.bernoulli(p) {
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.aids = true;
        }
    }
    Ok(())
}

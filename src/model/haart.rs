//! HAART enrollment, discontinuation, and adherence (spec §4.6).

use crate::population::Population;
use crate::types::{AgentId, RandomStream};

/// Draws an adherence tier on enrollment (spec §4.6: "adherence is 5
/// with probability `haart_adherence`, else uniform over 1..4"),
/// matching the incarceration-entry adherence draw in
/// `model::incarceration`.
pub(crate) fn draw_adherence(haart_adherence: f64, run_random: &mut RandomStream) -> u8 {
    if run_random.bernoulli(haart_adherence) {
        5
    } else {
        run_random.uniform_range(1, 5) as u8
    }
}

/// Per-agent per-step HAART update for a diagnosed HIV-positive agent
/// (spec §4.6: "HAART"). Undiagnosed agents are not eligible for
/// enrollment, matching the original's HAART update gating on
/// `agent.tested`.
///
/// - Not yet on HAART: enrolls with probability `haart_prev *
///   calibration.art_cov`, drawing an adherence tier via
///   [`draw_adherence`].
/// - On HAART: discontinues with probability `haart_disc`, unless the
///   agent is under post-release incarceration treatment
///   (`incar.treatment_time > 0`) and `program.incar.treat_ric` holds
///   agents on their regimen through that window.
pub fn update_agent(pop: &mut Population, agent_id: AgentId, run_random: &mut RandomStream) {
    let Some(agent) = pop.agent(agent_id) else { return };
    if !agent.hiv || !agent.hiv_dx {
        return;
    }
    let race = agent.race;
    let sex_type = agent.sex_type;
    let active = agent.haart.active;
    let treatment_time = agent.incar.treatment_time;
    let Ok(demographic) = pop.params.demographics.get(race, sex_type) else { return };

    if active {
        let protected = treatment_time > 0 && pop.params.program.incar.treat_ric;
        if !protected && run_random.bernoulli(demographic.haart_disc) {
            if let Some(agent) = pop.agent_mut(agent_id) {
                agent.haart.active = false;
                agent.haart.adherence = 1;
            }
            pop.forget_haart(race, sex_type);
        }
    } else {
        let p = demographic.haart_prev * pop.params.calibration.art_cov;
        if run_random.bernoulli(p) {
            let adherence = draw_adherence(demographic.haart_adherence, run_random);
            if let Some(agent) = pop.agent_mut(agent_id) {
                agent.haart.active = true;
                agent.haart.ever = true;
                agent.haart.time = 0;
                agent.haart.adherence = adherence;
            }
            pop.record_haart(race, sex_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DrugType, Race, SexType};
    use crate::model::test_support::{add_agent, minimal_population};

    #[test]
    fn update_agent_ignores_undiagnosed_agent() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        pop.mark_hiv_positive(agent_id);
        let mut run_random = RandomStream::new(1);
        update_agent(&mut pop, agent_id, &mut run_random);
        assert!(!pop.agent(agent_id).unwrap().haart.active);
    }

    #[test]
    fn update_agent_can_enroll_diagnosed_agent() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        pop.mark_hiv_positive(agent_id);
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.hiv_dx = true;
        }
        let mut run_random = RandomStream::new(7);
        update_agent(&mut pop, agent_id, &mut run_random);
        assert!(pop.agent(agent_id).unwrap().haart.active);
        assert_eq!(pop.haart_count(Race::Black, SexType::MSM), 1);
    }
}

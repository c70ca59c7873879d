//! Death and replacement (spec §4.8).

use crate::model::model::StepEvents;
use crate::population::Population;
use crate::types::RandomStream;

/// Maps HAART adherence tier onto a death-rate multiplier: well-
/// suppressed agents (tier 5) die at closer to the HIV-negative
/// baseline than unsuppressed ones (tier 1). The originating Python
/// (`probabilities.get_death_rate`) was not retrievable from the
/// source pack; this monotone mapping is this crate's own resolution
/// of that gap (DESIGN.md), consistent with `clinical::adherence_suppression`.
fn haart_death_multiplier(adherence: u8) -> f64 {
    match adherence {
        1 => 1.00,
        2 => 0.85,
        3 => 0.65,
        4 => 0.45,
        _ => 0.25,
    }
}

/// Computes one step's death probability for an agent with the given
/// clinical state (spec §4.8: "death rate scales with HIV/AIDS status
/// and HAART adherence"). AIDS roughly doubles the demographic baseline;
/// HIV-positive without AIDS leaves it unchanged; HAART scales the
/// HIV-positive rate down per [`haart_death_multiplier`].
fn death_probability(base_rate: f64, hiv: bool, aids: bool, haart_active: bool, haart_adherence: u8) -> f64 {
    if !hiv {
        return base_rate;
    }
    let aids_multiplier = if aids { 2.0 } else { 1.0 };
    let haart_multiplier = if haart_active { haart_death_multiplier(haart_adherence) } else { 1.0 };
    base_rate * aids_multiplier * haart_multiplier
}

/// Runs one step's death-and-replace pass over every agent (spec §4.8).
/// Incarcerated agents are skipped: incarceration is treated as
/// protective for the duration of the sentence. A dying agent has
/// every relationship force-terminated, is removed from the
/// population, and is replaced by a fresh, clinically unseeded agent of
/// the same race, sex type, drug type, and location; `(race, sex_type)`
/// is pushed onto `events.deaths`.
pub fn die_and_replace(pop: &mut Population, run_random: &mut RandomStream, events: &mut StepEvents) {
    let candidates: Vec<_> = pop
        .agents()
        .filter(|a| !a.incar.active)
        .map(|a| (a.id, a.race, a.sex_type, a.drug_type, a.location.clone(), a.hiv, a.aids, a.haart.active, a.haart.adherence))
        .collect();

    for (agent_id, race, sex_type, drug_type, location, hiv, aids, haart_active, haart_adherence) in candidates {
        let Ok(demographic) = pop.params.demographics.get(race, sex_type) else { continue };
        let p = death_probability(demographic.death_rate, hiv, aids, haart_active, haart_adherence);
        if !run_random.bernoulli(p) {
            continue;
        }
        pop.terminate_all_relationships(agent_id);
        pop.remove_agent(agent_id);
        pop.create_agent(race, sex_type, drug_type, location, false);
        events.deaths.push((race, sex_type));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{DrugType, Race, SexType};
    use crate::model::test_support::{add_agent, minimal_population};

    #[test]
    fn incarcerated_agent_never_dies() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.incar.active = true;
        }
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        die_and_replace(&mut pop, &mut run_random, &mut events);
        assert!(pop.agent(agent_id).is_some());
        assert!(events.deaths.is_empty());
    }

    #[test]
    fn aids_and_unsuppressed_haart_raise_death_probability_above_baseline() {
        let base = 0.1;
        let p_negative = death_probability(base, false, false, false, 1);
        let p_aids = death_probability(base, true, true, false, 1);
        let p_suppressed = death_probability(base, true, true, true, 5);
        assert!(p_aids > p_negative);
        assert!(p_suppressed < p_aids);
    }

    #[test]
    fn death_replaces_agent_with_same_demographics_and_records_event() {
        let mut pop = minimal_population();
        let agent_id = add_agent(&mut pop, Race::Black, SexType::MSM, DrugType::None);
        let before_count = pop.agent_count();
        if let Some(agent) = pop.agent_mut(agent_id) {
            agent.hiv = true;
            agent.aids = true;
        }
        // test_support's demographic_entry sets death_rate to 1.0, and the
        // AIDS multiplier doubles it, so this death is certain regardless
        // of the run stream's seed.
        let mut run_random = RandomStream::new(1);
        let mut events = StepEvents::default();
        die_and_replace(&mut pop, &mut run_random, &mut events);
        assert_eq!(pop.agent_count(), before_count);
        assert!(pop.agent(agent_id).is_none());
        assert_eq!(events.deaths, vec![(Race::Black, SexType::MSM)]);
    }
}

//! The top-level simulation driver (spec §4.4: `Model.run`).
//!
//! Composition over inheritance (spec §9): rather than `HIVModel`
//! extending a `NetworkClass` base, [`Model`] owns a [`Population`] and
//! a `run_random` stream, and delegates every per-step behavior to the
//! plug-in feature modules under `crate::model`.

use crate::enums::{Race, SexType};
use crate::model::{clinical, death, haart, high_risk, incarceration, prep, stats, transmission};
use crate::model::stats::StatsSink;
use crate::population::Population;
use crate::types::{AgentId, RandomStream};

/// One step's bookkeeping (spec §4.4.b): cleared at the start of every
/// main-loop step, filled in as phases c through h run, and read once
/// by [`stats::compute_snapshot`] at phase i.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepEvents {
    /// Agents who seroconverted this step.
    pub new_infections: Vec<AgentId>,
    /// Agents diagnosed this step.
    pub new_dx: Vec<AgentId>,
    /// Agents released from incarceration this step.
    pub new_incar_release: Vec<AgentId>,
    /// Agents who entered high-risk status this step.
    pub new_high_risk: Vec<AgentId>,
    /// Agents newly enrolled in PrEP this step.
    pub new_prep: Vec<AgentId>,
    /// `(race, sex_type)` of every agent who died and was replaced this
    /// step.
    pub deaths: Vec<(Race, SexType)>,
}

/// Number of forced new partnerships for the optional agent-zero seed
/// (spec §4.4.2: "force a fixed number of new partners").
const AGENT_ZERO_PARTNERS: usize = 4;

/// Owns the population and the `run_random` stream and drives the
/// burn-in plus main loop described in spec §4.4.
pub struct Model {
    /// The simulated population.
    pub population: Population,
    /// Time-stepped-dynamics random stream (spec §5).
    pub run_random: RandomStream,
    /// Caller-supplied run identifier, threaded through to every
    /// [`stats::StatsSnapshot`].
    pub run_id: u64,
}

impl Model {
    /// Builds a model around an already-[`Population::initialize`]d
    /// population and a `run_random` stream seeded from
    /// `population.params.model.seed.run`.
    #[must_use]
    pub fn new(population: Population, run_id: u64) -> Self {
        let run_seed = population.params.model.seed.run;
        Model { population, run_random: RandomStream::new(run_seed), run_id }
    }

    /// Runs burn-in, the optional agent-zero seed, and the main loop,
    /// reporting one [`stats::StatsSnapshot`] per main-loop step through
    /// `sink` (spec §4.4).
    pub fn run(&mut self, agent_zero: bool, sink: &mut dyn StatsSink) {
        self.burn_in();
        if agent_zero {
            self.seed_agent_zero();
        }
        let num_steps = self.population.params.model.time.num_steps;
        for step in 1..=num_steps {
            tracing::debug!(step, "main loop step");
            self.run_step(step, sink);
        }
    }

    /// Runs `burn_steps` steps with transmission and diagnosis/treatment
    /// suppressed, then discards the per-step bookkeeping those steps
    /// accumulated (spec §4.4.1).
    fn burn_in(&mut self) {
        let burn_steps = self.population.params.model.time.burn_steps;
        tracing::info!(burn_steps, "burn-in starting");
        for t in 0..=burn_steps {
            self.update_all_agents(t, true, &mut StepEvents::default());
            death::die_and_replace(&mut self.population, &mut self.run_random, &mut StepEvents::default());
        }
        tracing::info!("burn-in complete");
    }

    /// Selects one PWID uniformly via `run_random`, forces
    /// [`AGENT_ZERO_PARTNERS`] new partnerships across every declared
    /// bond type, and marks it HIV-positive (spec §4.4.2).
    fn seed_agent_zero(&mut self) {
        let candidates: Vec<AgentId> = self.population.pwid_agents().iter().collect();
        let Some(&agent_id) = self.run_random.choice(&candidates) else { return };
        let bonds: Vec<_> = self.population.params.classes.bond_types.keys().cloned().collect();
        for _ in 0..AGENT_ZERO_PARTNERS {
            for bond in &bonds {
                self.population.attempt_partner(agent_id, bond);
            }
        }
        let mut events = StepEvents::default();
        transmission::seroconvert(&mut self.population, agent_id, &mut self.run_random, &mut events);
        tracing::info!(agent_id = agent_id.get(), "agent zero seeded");
    }

    /// Runs one main-loop step: phases a through i of spec §4.4.
    fn run_step(&mut self, step: u32, sink: &mut dyn StatsSink) {
        let mut events = StepEvents::default();
        self.update_all_agents(step, false, &mut events);

        prep::enrollment_pass(&mut self.population, step, &mut self.run_random, &mut events);

        let threshold = self.population.params.program.incar.treatment_program_threshold;
        if !self.population.syringe_services_enabled
            && self.population.params.features.syringe_services
            && self.population.total_dx_count() >= threshold
        {
            self.enable_syringe_services();
        }

        death::die_and_replace(&mut self.population, &mut self.run_random, &mut events);

        let snapshot =
            stats::compute_snapshot(&self.population, &events, step, self.run_id, self.run_random.seed());
        sink.record(&snapshot);
    }

    /// One-shot enrollment of every current injection drug user into
    /// syringe services once the diagnosed-count threshold is crossed
    /// (spec §4.4.g).
    fn enable_syringe_services(&mut self) {
        self.population.syringe_services_enabled = true;
        let coverage = self.population.params.program.syringe_services.coverage;
        let candidates: Vec<AgentId> = self
            .population
            .agents()
            .filter(|a| a.drug_type.is_injection_user())
            .map(|a| a.id)
            .collect();
        for agent_id in candidates {
            if self.run_random.bernoulli(coverage) {
                if let Some(agent) = self.population.agent_mut(agent_id) {
                    agent.syringe_services = true;
                }
            }
        }
        tracing::info!("syringe services enabled");
    }

    /// Phases a through e of spec §4.4, shared between burn-in and the
    /// main loop (`burn` suppresses transmission and clinical updates
    /// but not partnership turnover or death).
    fn update_all_agents(&mut self, t: u32, burn: bool, events: &mut StepEvents) {
        if t > 0 && !self.population.params.features.static_network {
            tracing::debug!(step = t, "partnership assignment");
            self.population.update_partner_assignments();
        }

        let rel_ids: Vec<_> = self.population.relationships().map(|r| r.id).collect();
        for rel_id in rel_ids {
            if !burn {
                transmission::interact(&mut self.population, rel_id, &mut self.run_random, events);
            }
            self.population.progress_relationship(rel_id, false);
        }

        if self.population.params.features.high_risk {
            high_risk::step_all(&mut self.population, &mut self.run_random, events);
        }

        let agent_ids: Vec<AgentId> = self.population.agents().map(|a| a.id).collect();
        for agent_id in agent_ids {
            self.update_one_agent(agent_id, burn, events);
        }
    }

    fn update_one_agent(&mut self, agent_id: AgentId, burn: bool, events: &mut StepEvents) {
        let Some(agent) = self.population.agent_mut(agent_id) else { return };
        agent.time_alive += 1;

        if self.population.params.features.incar {
            incarceration::step_agent(&mut self.population, agent_id, &mut self.run_random, events);
        }

        self.check_msmw(agent_id, events);

        let Some(agent) = self.population.agent(agent_id) else { return };
        if agent.hiv {
            if burn {
                if let Some(agent) = self.population.agent_mut(agent_id) {
                    agent.incar.treatment_time = agent.incar.treatment_time.saturating_sub(1);
                }
            } else {
                clinical::test_for_hiv(&mut self.population, agent_id, &mut self.run_random, events);
                let _ = clinical::progress_to_aids(&mut self.population, agent_id, &mut self.run_random);
                haart::update_agent(&mut self.population, agent_id, &mut self.run_random);
            }
        } else if !burn {
            prep::step_agent(&mut self.population, agent_id, &mut self.run_random);
        }
    }

    fn check_msmw(&mut self, agent_id: AgentId, events: &mut StepEvents) {
        if !self.population.params.features.msmw {
            return;
        }
        let Some(agent) = self.population.agent(agent_id) else { return };
        if !agent.msmw || agent.hiv {
            return;
        }
        let Ok(demographic) = self.population.params.demographics.get(agent.race, agent.sex_type) else { return };
        let msmw_seroconvert_prob = demographic.msmw_prob;
        if self.run_random.bernoulli(msmw_seroconvert_prob) {
            transmission::seroconvert(&mut self.population, agent_id, &mut self.run_random, events);
        }
    }
}

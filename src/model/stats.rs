//! The statistics callback (spec §6: "External interfaces"): a
//! snapshot of population state plus this step's events, handed to a
//! caller-supplied sink once per step.

use crate::enums::{Race, SexType};
use crate::model::model::StepEvents;
use crate::population::Population;
use std::collections::BTreeMap;

/// Per-`(race, sex_type)` tallies for one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStats {
    /// Agents currently alive in this cell.
    pub num_agents: u64,
    /// HIV-positive agents.
    pub num_hiv: u64,
    /// AIDS-progressed agents.
    pub num_aids: u64,
    /// Ever-diagnosed agents.
    pub num_tested: u64,
    /// Currently HAART-enrolled agents.
    pub num_art: u64,
    /// Currently PrEP-enrolled agents.
    pub num_prep: u64,
    /// Currently incarcerated agents.
    pub num_incar: u64,
    /// Currently high-risk agents.
    pub num_high_risk: u64,
    /// New infections this step.
    pub new_infections: u64,
    /// New diagnoses this step.
    pub new_dx: u64,
    /// Incarceration releases this step.
    pub new_incar_release: u64,
    /// High-risk entries this step.
    pub new_high_risk: u64,
    /// PrEP enrollments this step.
    pub new_prep: u64,
    /// Deaths (and replacements) this step.
    pub deaths: u64,
}

/// One step's full statistics payload (spec §6: "emitted once per
/// step, carrying the step index, run id, both seeds, and a snapshot
/// of population state").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    /// The main-loop step this snapshot was taken at (1-indexed; burn-in
    /// steps are not reported).
    pub step: u32,
    /// The run identifier the caller supplied to [`crate::model::Model`].
    pub run_id: u64,
    /// The population seed this run was constructed with.
    pub seed_ppl: u64,
    /// The run seed this run was constructed with.
    pub seed_run: u64,
    /// Per-`(race, sex_type)` tallies.
    pub cells: BTreeMap<(Race, SexType), CellStats>,
}

impl StatsSnapshot {
    /// Sums `field` across every cell.
    #[must_use]
    pub fn total(&self, field: impl Fn(&CellStats) -> u64) -> u64 {
        self.cells.values().map(field).sum()
    }
}

/// A statistics sink: the collaborator spec §6 calls "statistics
/// callback". Report writers, file persistence, and dashboards are all
/// out of scope for this crate (spec §1); this trait is the seam a
/// caller implements one of those behind.
pub trait StatsSink {
    /// Called once per main-loop step, in step order.
    fn record(&mut self, snapshot: &StatsSnapshot);
}

/// A [`StatsSink`] that simply retains every snapshot, useful for tests
/// and short-lived runs that want the full history in memory.
#[derive(Debug, Default)]
pub struct VecStatsSink {
    /// Snapshots recorded so far, in step order.
    pub snapshots: Vec<StatsSnapshot>,
}

impl StatsSink for VecStatsSink {
    fn record(&mut self, snapshot: &StatsSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

/// Builds a [`StatsSnapshot`] from current population state plus this
/// step's bookkeeping (spec §4.4.i).
pub(super) fn compute_snapshot(
    pop: &Population,
    events: &StepEvents,
    step: u32,
    run_id: u64,
    seed_run: u64,
) -> StatsSnapshot {
    let mut cells: BTreeMap<(Race, SexType), CellStats> = BTreeMap::new();

    for agent in pop.agents() {
        let cell = cells.entry((agent.race, agent.sex_type)).or_default();
        cell.num_agents += 1;
        if agent.hiv {
            cell.num_hiv += 1;
        }
        if agent.aids {
            cell.num_aids += 1;
        }
        if agent.hiv_dx {
            cell.num_tested += 1;
        }
        if agent.haart.active {
            cell.num_art += 1;
        }
        if agent.prep.active {
            cell.num_prep += 1;
        }
        if agent.incar.active {
            cell.num_incar += 1;
        }
        if agent.high_risk.active {
            cell.num_high_risk += 1;
        }
    }

    for &id in &events.new_infections {
        if let Some(agent) = pop.agent(id) {
            cells.entry((agent.race, agent.sex_type)).or_default().new_infections += 1;
        }
    }
    for &id in &events.new_dx {
        if let Some(agent) = pop.agent(id) {
            cells.entry((agent.race, agent.sex_type)).or_default().new_dx += 1;
        }
    }
    for &id in &events.new_incar_release {
        if let Some(agent) = pop.agent(id) {
            cells.entry((agent.race, agent.sex_type)).or_default().new_incar_release += 1;
        }
    }
    for &id in &events.new_high_risk {
        if let Some(agent) = pop.agent(id) {
            cells.entry((agent.race, agent.sex_type)).or_default().new_high_risk += 1;
        }
    }
    for &id in &events.new_prep {
        if let Some(agent) = pop.agent(id) {
            cells.entry((agent.race, agent.sex_type)).or_default().new_prep += 1;
        }
    }
    for &(race, sex_type) in &events.deaths {
        cells.entry((race, sex_type)).or_default().deaths += 1;
    }

    StatsSnapshot {
        step,
        run_id,
        seed_ppl: pop.pop_random.seed(),
        seed_run,
        cells,
    }
}

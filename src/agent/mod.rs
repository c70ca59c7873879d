//! The agent data model: the smallest entity in the simulation and the
//! membership container used to group agents by clinical/behavioral
//! status (spec §3, §4.1).

#[allow(clippy::module_inception)]
mod agent;
mod agent_set;
mod feature_state;

pub use agent::Agent;
pub use agent_set::AgentSet;
pub use feature_state::{HaartState, HighRiskState, IncarState, PrepState};

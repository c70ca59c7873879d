//! The smallest entity in the model (spec §3: "Agent").

use crate::agent::feature_state::{HaartState, HighRiskState, IncarState, PrepState};
use crate::enums::{BondTypeName, DrugType, Race, SexRole, SexType};
use crate::population::Location;
use crate::types::AgentId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// An agent: demographics fixed at creation, plus mutable clinical and
/// behavioral state (spec §3).
///
/// `hiv`, `aids`, and `hiv_dx` have no separate "ever" counterpart:
/// unlike HAART/PrEP/incarceration/high-risk, none of these three ever
/// clear once set, so the flag itself already answers "ever" (spec §3
/// lists "ever" versions generically; the four feature sub-states in
/// [`crate::agent::feature_state`] are where that distinction is
/// load-bearing).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Agent {
    /// Globally unique, immutable identifier.
    pub id: AgentId,
    /// Race, fixed at creation.
    pub race: Race,
    /// Sex type, fixed at creation.
    pub sex_type: SexType,
    /// Drug-use classification, fixed at creation.
    pub drug_type: DrugType,
    /// The location this agent was created in.
    pub location: Arc<Location>,
    /// Birth-time sex role, fixed at creation.
    pub sex_role: SexRole,
    /// Current age in years.
    pub age: u32,
    /// The age-bin label this agent was seeded into, if any (kept for
    /// reporting; aging does not currently move agents between bins).
    pub age_bin: Option<String>,

    /// HIV-positive flag. Monotonic: never clears once set.
    pub hiv: bool,
    /// Steps since seroconversion (1 on the step of conversion).
    pub hiv_time: u32,
    /// AIDS flag. Monotonic: never clears once set.
    pub aids: bool,
    /// HIV-diagnosed flag. Monotonic: never clears once set.
    pub hiv_dx: bool,
    /// Men-who-have-sex-with-men-and-women flag (SPEC_FULL.md §3),
    /// meaningful only when `sex_type == SexType::HM`.
    pub msmw: bool,
    /// Enrolled in syringe/needle-exchange services (spec §4.4.g, §4.5).
    pub syringe_services: bool,
    /// Total steps this agent (or the lineage replacing a dead agent's
    /// slot) has been alive, incremented once per main-loop step
    /// (spec §4.4.e).
    pub time_alive: u32,

    /// PrEP feature state.
    pub prep: PrepState,
    /// HAART feature state.
    pub haart: HaartState,
    /// Incarceration feature state.
    pub incar: IncarState,
    /// High-risk feature state.
    pub high_risk: HighRiskState,

    /// Current partners, per bond type (spec §3: invariant on
    /// symmetric membership).
    pub partners: HashMap<BondTypeName, BTreeSet<AgentId>>,
    /// Target partner count, per bond type, redrawn yearly (spec §4.3).
    pub target_partners: HashMap<BondTypeName, u32>,
    /// Mean partner count used to redraw `target_partners`, per bond
    /// type (spec §4.3; mutated by high-risk entry/exit, §4.7).
    pub mean_num_partners: HashMap<BondTypeName, f64>,
}

impl Agent {
    /// Creates a new agent with the given demographics and a default
    /// sex role. Population construction that needs a sampled sex role
    /// should use [`Agent::with_sex_role`] instead.
    #[must_use]
    pub fn new(
        id: AgentId,
        sex_type: SexType,
        age: u32,
        race: Race,
        drug_type: DrugType,
        location: Arc<Location>,
    ) -> Self {
        Agent::with_sex_role(id, sex_type, age, race, drug_type, location, SexRole::Versatile)
    }

    /// Creates a new agent with an explicit birth-time sex role.
    #[must_use]
    pub fn with_sex_role(
        id: AgentId,
        sex_type: SexType,
        age: u32,
        race: Race,
        drug_type: DrugType,
        location: Arc<Location>,
        sex_role: SexRole,
    ) -> Self {
        Agent {
            id,
            race,
            sex_type,
            drug_type,
            location,
            sex_role,
            age,
            age_bin: None,
            hiv: false,
            hiv_time: 0,
            aids: false,
            hiv_dx: false,
            msmw: false,
            syringe_services: false,
            time_alive: 0,
            prep: PrepState::new(),
            haart: HaartState::new(),
            incar: IncarState::new(),
            high_risk: HighRiskState::new(),
            partners: HashMap::new(),
            target_partners: HashMap::new(),
            mean_num_partners: HashMap::new(),
        }
    }

    /// Returns true iff this agent has at least one partner, under any
    /// bond type (spec §4.1: "`has_partners()`").
    #[must_use]
    pub fn has_partners(&self) -> bool {
        self.partners.values().any(|set| !set.is_empty())
    }

    /// Returns the number of partners this agent has under `bond`.
    #[must_use]
    pub fn partner_count(&self, bond: &BondTypeName) -> usize {
        self.partners.get(bond).map_or(0, BTreeSet::len)
    }

    /// Returns the total partner count across every bond type (spec
    /// §4.1: "accessor for total partner count").
    #[must_use]
    pub fn total_partner_count(&self) -> usize {
        self.partners.values().map(BTreeSet::len).sum()
    }

    /// Returns true iff this agent is currently under its target
    /// partner count for `bond`, scaled by `buffer` (spec §4.3:
    /// "Partnerable set").
    #[must_use]
    pub fn is_under_target(&self, bond: &BondTypeName, buffer: f64) -> bool {
        let target = self.target_partners.get(bond).copied().unwrap_or(0);
        let limit = (f64::from(target) * buffer).floor() as usize;
        self.partner_count(bond) < limit.max(if target > 0 { 1 } else { 0 })
    }

    /// Records `other` as a partner under `bond` (spec §5: mutation
    /// happens only through the `Population` that mediates both sides
    /// of a bond; this method mutates only `self`'s half).
    pub fn add_partner(&mut self, bond: BondTypeName, other: AgentId) {
        self.partners.entry(bond).or_default().insert(other);
    }

    /// Removes `other` as a partner under `bond`, if present.
    pub fn remove_partner(&mut self, bond: &BondTypeName, other: AgentId) {
        if let Some(set) = self.partners.get_mut(bond) {
            set.remove(&other);
        }
    }

    /// Removes `other` from every bond type's partner set (used on
    /// death: spec §4.8 "force-terminate all the agent's relationships").
    pub fn remove_partner_everywhere(&mut self, other: AgentId) {
        for set in self.partners.values_mut() {
            set.remove(&other);
        }
    }

    /// Returns true iff this agent is in the acute window: HIV-positive
    /// and `hiv_time < acute_duration` (spec §4.5: "Acute window";
    /// GLOSSARY).
    #[must_use]
    pub fn is_acute(&self, acute_duration: u32) -> bool {
        self.hiv && self.hiv_time < acute_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::DrugType;

    fn test_agent() -> Agent {
        Agent::new(AgentId::new(1), SexType::MSM, 30, Race::Black, DrugType::None, Arc::new(Location::new("default")))
    }

    #[test]
    fn new_agent_has_no_partners() {
        let agent = test_agent();
        assert!(!agent.has_partners());
        assert_eq!(agent.total_partner_count(), 0);
    }

    #[test]
    fn add_partner_then_has_partners() {
        let mut agent = test_agent();
        let bond = BondTypeName::new("Sex");
        agent.add_partner(bond.clone(), AgentId::new(2));
        assert!(agent.has_partners());
        assert_eq!(agent.partner_count(&bond), 1);
    }

    #[test]
    fn remove_partner_clears_membership() {
        let mut agent = test_agent();
        let bond = BondTypeName::new("Sex");
        agent.add_partner(bond.clone(), AgentId::new(2));
        agent.remove_partner(&bond, AgentId::new(2));
        assert_eq!(agent.partner_count(&bond), 0);
    }

    #[test]
    fn remove_partner_everywhere_clears_all_bonds() {
        let mut agent = test_agent();
        agent.add_partner(BondTypeName::new("Sex"), AgentId::new(2));
        agent.add_partner(BondTypeName::new("Inj"), AgentId::new(2));
        agent.remove_partner_everywhere(AgentId::new(2));
        assert_eq!(agent.total_partner_count(), 0);
    }

    #[test]
    fn is_under_target_respects_buffer() {
        let mut agent = test_agent();
        let bond = BondTypeName::new("Sex");
        agent.target_partners.insert(bond.clone(), 2);
        assert!(agent.is_under_target(&bond, 1.5));
        agent.add_partner(bond.clone(), AgentId::new(2));
        agent.add_partner(bond.clone(), AgentId::new(3));
        agent.add_partner(bond.clone(), AgentId::new(4));
        assert!(!agent.is_under_target(&bond, 1.5));
    }

    #[test]
    fn zero_target_means_no_room() {
        let agent = test_agent();
        let bond = BondTypeName::new("Sex");
        assert!(!agent.is_under_target(&bond, 1.5));
    }

    #[test]
    fn acute_window_bounds() {
        let mut agent = test_agent();
        agent.hiv = true;
        agent.hiv_time = 1;
        assert!(agent.is_acute(12));
        agent.hiv_time = 12;
        assert!(!agent.is_acute(12));
    }

    #[test]
    fn not_acute_when_hiv_negative() {
        let agent = test_agent();
        assert!(!agent.is_acute(12));
    }
}

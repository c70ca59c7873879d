//! Owns every agent and relationship, the partnership graph, and the
//! population random stream (spec §2, §3: "Population").

use crate::agent::{Agent, AgentSet};
use crate::enums::{BondTypeName, DrugType, OTHER_KEY, Race, SexType, SleepsWithTable};
use crate::params::Params;
use crate::population::graph::Graph;
use crate::population::location::Location;
use crate::relationship::Relationship;
use crate::types::{AgentId, IdAllocator, RandomStream, RandomStreams, RelationshipId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Owns all agents, all relationships, the partnership graph, and the
/// derived membership/eligibility sets the partnership engine reads
/// every step (spec §2, §3).
pub struct Population {
    /// Frozen parameter tree.
    pub params: Arc<Params>,
    /// Every location this population's agents may be created in.
    pub locations: HashMap<String, Arc<Location>>,
    agents: BTreeMap<AgentId, Agent>,
    relationships: BTreeMap<RelationshipId, Relationship>,
    /// Root of the nested AgentSet tree: `all_agents`, with `hiv`,
    /// `pwid`, and `high_risk` declared as subsets (spec §3).
    pub all_agents: AgentSet,
    /// Undirected graph mirroring `relationships`, present iff
    /// `params.model.network.enable` (spec §2).
    pub graph: Option<Graph>,
    sex_partners: HashMap<SexType, BTreeSet<AgentId>>,
    partnerable_agents: HashMap<BondTypeName, BTreeSet<AgentId>>,
    dx_counts: HashMap<(Race, SexType), u64>,
    haart_counts: HashMap<(Race, SexType), u64>,
    sleeps_with: SleepsWithTable,
    agent_ids: IdAllocator,
    relationship_ids: IdAllocator,
    /// Population-construction / partner-selection random stream.
    pub pop_random: RandomStream,
    /// Distribution-draw stream, distinct from `pop_random` (spec §5).
    pub np_random: RandomStream,
    /// One-shot flag: set once the diagnosed-count threshold in
    /// `program.incar.treatment_program_threshold` is crossed (spec
    /// §4.4.g).
    pub syringe_services_enabled: bool,
}

impl Population {
    /// Creates an empty population (no agents yet); call
    /// [`Population::initialize`] to seed it per `params.model.num_pop`.
    #[must_use]
    pub fn new(
        params: Arc<Params>,
        locations: HashMap<String, Arc<Location>>,
        streams: &RandomStreams,
        sleeps_with: SleepsWithTable,
    ) -> Self {
        let mut all_agents = AgentSet::new("AllAgents");
        all_agents.add_subset("hiv");
        all_agents.add_subset("pwid");
        all_agents.add_subset("high_risk");
        let graph = params.model.network.enable.then(Graph::new);
        Population {
            params,
            locations,
            agents: BTreeMap::new(),
            relationships: BTreeMap::new(),
            all_agents,
            graph,
            sex_partners: HashMap::new(),
            partnerable_agents: HashMap::new(),
            dx_counts: HashMap::new(),
            haart_counts: HashMap::new(),
            sleeps_with,
            agent_ids: IdAllocator::new(),
            relationship_ids: IdAllocator::new(),
            pop_random: streams.pop.clone(),
            np_random: streams.np.clone(),
            syringe_services_enabled: false,
        }
    }

    /// Seeds the population with `params.model.num_pop` agents (spec
    /// §2, §3: "Lifecycle"). Each agent's location is drawn uniformly
    /// across declared locations; race is drawn weighted by the summed
    /// `demographics[race][*].ppl` across sex types; sex type and drug
    /// type are then drawn from that location's per-race weight tables.
    /// Runs one-time incarceration seeding, the initial partner-
    /// assignment pass, and the post-init graph trim, in that order.
    pub fn initialize(&mut self) {
        let mut location_names: Vec<String> = self.locations.keys().cloned().collect();
        location_names.sort();
        if location_names.is_empty() {
            return;
        }
        let races = self.params.classes.races.clone();
        let race_weights: Vec<f64> = races
            .iter()
            .map(|&race| {
                SexType::all()
                    .iter()
                    .filter_map(|&st| self.params.demographics.get(race, st).ok())
                    .map(|d| d.ppl)
                    .sum()
            })
            .collect();
        for _ in 0..self.params.model.num_pop {
            let Some(race_idx) = self.pop_random.weighted_index(&race_weights) else { break };
            let race = races[race_idx];
            let loc_idx = self.pop_random.uniform_range(0, location_names.len() as i64) as usize;
            let location = self.locations[&location_names[loc_idx]].clone();
            let sex_type = location.sample_sex_type(race, &mut self.pop_random);
            let drug_type = location.sample_drug_type(race, &mut self.pop_random);
            self.create_agent(race, sex_type, drug_type, location, true);
        }
        self.initialize_incarceration();
        self.update_partner_assignments();
        self.trim_graph();
    }

    /// Returns a reference to the agent with `id`, if present.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Returns a mutable reference to the agent with `id`, if present.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Iterates every agent in ascending id order (spec §5: determinism).
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Returns the total number of agents currently alive.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Returns a reference to the relationship with `id`, if present.
    #[must_use]
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Iterates every active relationship, in ascending id order (spec
    /// §5: "Relationships are iterated in a deterministic order").
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Returns a mutable reference to the relationship with `id`, if
    /// present (used by transmission to accumulate `total_sex_acts`).
    pub fn relationship_mut(&mut self, id: RelationshipId) -> Option<&mut Relationship> {
        self.relationships.get_mut(&id)
    }

    /// Returns the number of relationships currently tracked.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Returns the `hiv` subset of `all_agents`.
    #[must_use]
    pub fn hiv_agents(&self) -> &AgentSet {
        self.all_agents.subset("hiv").expect("hiv subset declared at construction")
    }

    /// Returns the `pwid` subset of `all_agents`.
    #[must_use]
    pub fn pwid_agents(&self) -> &AgentSet {
        self.all_agents.subset("pwid").expect("pwid subset declared at construction")
    }

    /// Returns the `high_risk` subset of `all_agents`.
    #[must_use]
    pub fn high_risk_agents(&self) -> &AgentSet {
        self.all_agents.subset("high_risk").expect("high_risk subset declared at construction")
    }

    /// Returns the eligible sexual-partner set for sex-type key `key`:
    /// every agent whose sex type is a `sleeps_with` target of `key`
    /// (spec §3: "`sex_partners[sex_type]`").
    #[must_use]
    pub fn sex_partners(&self, key: SexType) -> BTreeSet<AgentId> {
        self.sex_partners.get(&key).cloned().unwrap_or_default()
    }

    /// Returns the partnerable set for `bond`: agents currently under
    /// their target partner count for that bond, accounting for the
    /// calibration buffer (spec §4.3: "Partnerable set").
    #[must_use]
    pub fn partnerable_agents(&self, bond: &BondTypeName) -> BTreeSet<AgentId> {
        self.partnerable_agents.get(bond).cloned().unwrap_or_default()
    }

    /// Returns the cumulative diagnosed count for `(race, sex_type)`.
    #[must_use]
    pub fn dx_count(&self, race: Race, sex_type: SexType) -> u64 {
        self.dx_counts.get(&(race, sex_type)).copied().unwrap_or(0)
    }

    /// Returns the total diagnosed count across every demographic cell
    /// (spec §4.4.g: treatment-program threshold is cumulative).
    #[must_use]
    pub fn total_dx_count(&self) -> u64 {
        self.dx_counts.values().sum()
    }

    /// Returns the cumulative HAART-enrolled count for `(race, sex_type)`.
    #[must_use]
    pub fn haart_count(&self, race: Race, sex_type: SexType) -> u64 {
        self.haart_counts.get(&(race, sex_type)).copied().unwrap_or(0)
    }

    /// Records a new diagnosis against the `(race, sex_type)` tally
    /// (SPEC_FULL.md §3; called once per diagnosis, never decremented:
    /// diagnosis is monotonic).
    pub fn record_dx(&mut self, race: Race, sex_type: SexType) {
        *self.dx_counts.entry((race, sex_type)).or_insert(0) += 1;
    }

    /// Records a new HAART enrollment against the `(race, sex_type)`
    /// tally. Unlike diagnosis, HAART enrollment can reverse
    /// (discontinuation); callers decrement via
    /// [`Population::forget_haart`] on discontinuation.
    pub fn record_haart(&mut self, race: Race, sex_type: SexType) {
        *self.haart_counts.entry((race, sex_type)).or_insert(0) += 1;
    }

    /// Reverses [`Population::record_haart`] on discontinuation.
    pub fn forget_haart(&mut self, race: Race, sex_type: SexType) {
        if let Some(count) = self.haart_counts.get_mut(&(race, sex_type)) {
            *count = count.saturating_sub(1);
        }
    }

    /// Marks `agent_id` HIV-positive for the first time (spec §4.5:
    /// "Becoming HIV+"). Returns `false`, a no-op, if the agent was
    /// already HIV-positive or does not exist.
    pub fn mark_hiv_positive(&mut self, agent_id: AgentId) -> bool {
        let Some(agent) = self.agents.get_mut(&agent_id) else { return false };
        if agent.hiv {
            return false;
        }
        agent.hiv = true;
        agent.hiv_time = 1;
        self.all_agents.add_to(&["hiv"], agent_id);
        true
    }

    /// Creates a new agent of the given demographics, registers it in
    /// every derived set, and returns its id (spec §3: "Lifecycle").
    ///
    /// `seed_clinical` controls whether initial-population clinical
    /// seeding (HIV/AIDS/diagnosis/HAART/PrEP/incarceration/high-risk
    /// probabilities from `demographics[race][sex_type]`) runs: true at
    /// population construction, false for a death-and-replace
    /// replacement, which starts clinically clean (spec §4.8:
    /// "create a replacement agent with identical race and sex type").
    pub fn create_agent(
        &mut self,
        race: Race,
        sex_type: SexType,
        drug_type: DrugType,
        location: Arc<Location>,
        seed_clinical: bool,
    ) -> AgentId {
        let id = AgentId::new(self.agent_ids.next());
        let demographic = self.params.demographics.get(race, sex_type).ok();
        let age = demographic
            .map(|d| d.age_distribution().sample(&mut self.np_random).max(0) as u32)
            .unwrap_or(25);
        let sex_role = location.sample_sex_role(race, &mut self.pop_random);
        let mut agent = Agent::with_sex_role(id, sex_type, age, race, drug_type, location, sex_role);

        for (bond_name, bond_def) in &self.params.classes.bond_types {
            if bond_def.requires_injection() && !drug_type.is_injection_user() {
                continue;
            }
            let mean = demographic
                .and_then(|d| d.num_partners.get(bond_name))
                .map(|dist| dist.sample(&mut self.np_random) as f64)
                .unwrap_or(0.0);
            let duration_dist = if bond_def.requires_injection() {
                &self.params.partnership.duration.injection
            } else {
                &self.params.partnership.duration.sex
            };
            let mean_rel_duration = duration_dist.mean().max(1.0);
            let scaled_mean =
                (mean * self.params.calibration.sex.partner / mean_rel_duration).max(0.0);
            agent.mean_num_partners.insert(bond_name.clone(), scaled_mean);
            let target = self.np_random.poisson(scaled_mean) as u32;
            agent.target_partners.insert(bond_name.clone(), target);
        }

        if seed_clinical {
            self.seed_clinical_state(&mut agent, demographic);
        }

        self.add_agent(agent);
        id
    }

    fn seed_clinical_state(&mut self, agent: &mut Agent, demographic: Option<&crate::params::DemographicEntry>) {
        let Some(d) = demographic else { return };
        if self.pop_random.bernoulli(d.hiv.init) {
            agent.hiv = true;
            agent.hiv_time = self.pop_random.uniform_range(1, i64::from(d.hiv.max_init_time).max(2)) as u32;
            if self.pop_random.bernoulli(d.hiv.dx_init) {
                agent.hiv_dx = true;
            }
            if self.pop_random.bernoulli(d.aids_init) {
                agent.aids = true;
            }
            if self.pop_random.bernoulli(d.haart_init) {
                agent.haart.active = true;
                agent.haart.ever = true;
                agent.haart.adherence = if self.pop_random.bernoulli(d.haart_adherence) {
                    5
                } else {
                    self.pop_random.uniform_range(1, 5) as u8
                };
            }
        }
        if !agent.hiv && self.pop_random.bernoulli(d.prep_init) {
            agent.prep.active = true;
            agent.prep.ever = true;
            agent.prep.adherent = self.pop_random.bernoulli(d.prep_adherence);
        }
        if self.pop_random.bernoulli(d.high_risk_init) {
            agent.high_risk.active = true;
            agent.high_risk.ever = true;
        }
        if self.params.features.msmw && agent.sex_type == SexType::HM && self.pop_random.bernoulli(d.msmw_prob) {
            agent.msmw = true;
        }
    }

    /// Registers `agent` (already fully constructed) into every
    /// derived set: `all_agents` and its subsets, the partnership
    /// graph, `sex_partners`, and `partnerable_agents`.
    pub fn add_agent(&mut self, agent: Agent) {
        let id = agent.id;
        let mut path: Vec<&str> = Vec::new();
        if agent.hiv {
            path.push("hiv");
        }
        if agent.drug_type.is_injection_user() {
            path.push("pwid");
        }
        if agent.high_risk.active {
            path.push("high_risk");
        }
        self.all_agents.add(id);
        for subset in &["hiv", "pwid", "high_risk"] {
            if path.contains(subset) {
                if let Some(child) = self.all_agents.subset_mut(subset) {
                    child.add(id);
                }
            }
        }
        if let Some(graph) = &mut self.graph {
            graph.add_node(id);
        }
        for key in SexType::all() {
            if self.sleeps_with.sex_possible(key, agent.sex_type) {
                self.sex_partners.entry(key).or_default().insert(id);
            }
        }
        self.agents.insert(id, agent);
        self.recompute_partnerable(id);
    }

    /// Removes `agent_id` from every derived set and from the agent
    /// table. Callers are responsible for force-terminating the
    /// agent's relationships first (spec §4.8).
    pub fn remove_agent(&mut self, agent_id: AgentId) {
        self.all_agents.remove(agent_id);
        if let Some(graph) = &mut self.graph {
            graph.remove_node(agent_id);
        }
        for set in self.sex_partners.values_mut() {
            set.remove(&agent_id);
        }
        for set in self.partnerable_agents.values_mut() {
            set.remove(&agent_id);
        }
        self.agents.remove(&agent_id);
    }

    /// Recomputes `agent_id`'s membership in every bond's partnerable
    /// set, based on its current `is_under_target` state (spec §4.3:
    /// "maintained incrementally on every add/remove/death/relationship
    /// change").
    pub fn recompute_partnerable(&mut self, agent_id: AgentId) {
        let buffer = self.params.calibration.partnership.buffer;
        let Some(agent) = self.agents.get(&agent_id) else { return };
        let bonds: Vec<BondTypeName> = self.params.classes.bond_types.keys().cloned().collect();
        let under_target: Vec<(BondTypeName, bool)> =
            bonds.iter().map(|b| (b.clone(), agent.is_under_target(b, buffer))).collect();
        for (bond, under) in under_target {
            let set = self.partnerable_agents.entry(bond).or_default();
            if under {
                set.insert(agent_id);
            } else {
                set.remove(&agent_id);
            }
        }
    }

    /// Forms a new relationship between `a` and `b` under `bond`,
    /// mutating both endpoints' partner sets and the graph. Returns
    /// `None` if `a == b`, either agent is missing, or a relationship
    /// between this pair already exists under this bond (spec §3:
    /// "Two relationships with the same unordered pair and bond type
    /// must not coexist").
    pub fn form_relationship(
        &mut self,
        a: AgentId,
        b: AgentId,
        bond: BondTypeName,
        duration: i64,
    ) -> Option<RelationshipId> {
        if a == b || !self.agents.contains_key(&a) || !self.agents.contains_key(&b) {
            return None;
        }
        if self
            .relationships
            .values()
            .any(|r| r.bond == bond && ((r.agent_one == a && r.agent_two == b) || (r.agent_one == b && r.agent_two == a)))
        {
            return None;
        }
        let id = RelationshipId::new(self.relationship_ids.next());
        let rel = Relationship::new(id, a, b, bond.clone(), duration);
        if let Some(agent) = self.agents.get_mut(&a) {
            agent.add_partner(bond.clone(), b);
        }
        if let Some(agent) = self.agents.get_mut(&b) {
            agent.add_partner(bond, a);
        }
        if let Some(graph) = &mut self.graph {
            graph.add_edge(a, b);
        }
        self.relationships.insert(id, rel);
        self.recompute_partnerable(a);
        self.recompute_partnerable(b);
        Some(id)
    }

    /// Advances relationship `id` by one step (spec §4.2). Returns
    /// `true` iff the relationship terminated and was torn down.
    pub fn progress_relationship(&mut self, id: RelationshipId, force: bool) -> bool {
        let Some(rel) = self.relationships.get_mut(&id) else { return false };
        if !rel.progress(force) {
            return false;
        }
        let (a, b, bond) = (rel.agent_one, rel.agent_two, rel.bond.clone());
        if let Some(agent) = self.agents.get_mut(&a) {
            agent.remove_partner(&bond, b);
        }
        if let Some(agent) = self.agents.get_mut(&b) {
            agent.remove_partner(&bond, a);
        }
        if let Some(graph) = &mut self.graph {
            graph.remove_edge(a, b);
        }
        self.relationships.remove(&id);
        self.recompute_partnerable(a);
        self.recompute_partnerable(b);
        true
    }

    /// Force-terminates every relationship involving `agent_id` (spec
    /// §4.8: death; §4.7: high-risk expiry trimming). Snapshots the id
    /// list before mutating so no collection is iterated while being
    /// mutated (spec §9).
    pub fn terminate_all_relationships(&mut self, agent_id: AgentId) {
        let ids: Vec<RelationshipId> = self
            .relationships
            .values()
            .filter(|r| r.involves(agent_id))
            .map(|r| r.id)
            .collect();
        for id in ids {
            self.progress_relationship(id, true);
        }
    }

    /// Force-terminates `agent_id`'s relationships under `bond` in
    /// excess of its current `target_partners[bond]` (spec §4.7:
    /// high-risk expiry, "evict relationships beyond the new target via
    /// `progress(force=true)`"). Evicts in ascending relationship-id
    /// order for determinism (spec §5).
    pub fn evict_excess_partners(&mut self, agent_id: AgentId, bond: &BondTypeName) {
        let Some(agent) = self.agents.get(&agent_id) else { return };
        let target = agent.target_partners.get(bond).copied().unwrap_or(0) as usize;
        let mut ids: Vec<RelationshipId> = self
            .relationships
            .values()
            .filter(|r| r.involves(agent_id) && r.bond == *bond)
            .map(|r| r.id)
            .collect();
        if ids.len() <= target {
            return;
        }
        ids.sort_by_key(|id| id.get());
        let evict_count = ids.len() - target;
        for id in ids.into_iter().take(evict_count) {
            self.progress_relationship(id, true);
        }
    }

    /// Runs the post-construction one-shot graph trim (SPEC_FULL.md
    /// §3): each edge is independently removed with probability
    /// `calibration.network.trim.prob`.
    pub fn trim_graph(&mut self) {
        let prob = self.params.calibration.network.trim.prob;
        if prob <= 0.0 {
            return;
        }
        let edges = match &self.graph {
            Some(graph) => graph.edges(),
            None => return,
        };
        for (a, b) in edges {
            if self.pop_random.bernoulli(prob) {
                if let Some(id) = self.relationship_id_for_pair(a, b) {
                    self.progress_relationship(id, true);
                }
            }
        }
    }

    fn relationship_id_for_pair(&self, a: AgentId, b: AgentId) -> Option<RelationshipId> {
        self.relationships
            .values()
            .find(|r| r.involves(a) && r.involves(b))
            .map(|r| r.id)
    }

    /// Runs one-time incarceration seeding at population construction
    /// (SPEC_FULL.md §3: `Population::initialize_incarceration`),
    /// using `demographics[..].incar.init`/`duration_init`.
    pub fn initialize_incarceration(&mut self) {
        let ids: Vec<AgentId> = self.agents.keys().copied().collect();
        for id in ids {
            let Some(agent) = self.agents.get(&id) else { continue };
            let (race, sex_type) = (agent.race, agent.sex_type);
            let Ok(demographic) = self.params.demographics.get(race, sex_type) else { continue };
            let init_prob = demographic.incar.init;
            let duration_dist = demographic.incar.duration_init.clone();
            if self.pop_random.bernoulli(init_prob) {
                let duration = duration_dist.sample(&mut self.np_random).max(1) as u32;
                if let Some(agent) = self.agents.get_mut(&id) {
                    agent.incar.active = true;
                    agent.incar.ever = true;
                    agent.incar.time = duration;
                }
            }
        }
    }
}

impl Population {
    /// Attempts to select an eligible candidate partner for `agent_id`
    /// under `bond`: narrows the partnerable pool to candidates not
    /// already partnered with `agent_id`, applies injection/sex
    /// compatibility, the `same_component` mixing restriction, and
    /// assortative mixing, in that order (spec §4.3). Returns `None`
    /// if no eligible candidate remains.
    fn select_partner(&mut self, agent_id: AgentId, bond: &BondTypeName) -> Option<AgentId> {
        let (agent_sex_type, existing, has_partners) = {
            let agent = self.agents.get(&agent_id)?;
            (agent.sex_type, agent.partners.get(bond).cloned().unwrap_or_default(), agent.has_partners())
        };
        let bond_def = self.params.classes.bond_types.get(bond)?.clone();

        let mut pool: Vec<AgentId> = self
            .partnerable_agents
            .get(bond)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        pool.retain(|id| *id != agent_id && !existing.contains(id));

        if bond_def.requires_injection() || bond_def.requires_sex() {
            let candidate_info: HashMap<AgentId, (SexType, DrugType)> = pool
                .iter()
                .filter_map(|id| self.agents.get(id).map(|a| (*id, (a.sex_type, a.drug_type))))
                .collect();
            if bond_def.requires_injection() {
                pool.retain(|id| candidate_info.get(id).is_some_and(|(_, dt)| dt.is_injection_user()));
            }
            if bond_def.requires_sex() {
                let sex_pool = self.sex_partners(agent_sex_type);
                pool.retain(|id| sex_pool.contains(id));
                pool.retain(|id| {
                    candidate_info
                        .get(id)
                        .is_some_and(|(st, _)| self.sleeps_with.sex_possible(agent_sex_type, *st))
                });
            }
        }
        if pool.is_empty() {
            return None;
        }

        let same_component_prob = self.params.partnership.network.same_component.prob;
        if same_component_prob > 0.0 && has_partners {
            if let Some(graph) = self.graph.clone() {
                if self.pop_random.bernoulli(same_component_prob) {
                    let component = graph.connected_component(agent_id);
                    let restricted: Vec<AgentId> =
                        pool.iter().filter(|id| component.contains(id)).copied().collect();
                    if !restricted.is_empty() {
                        pool = restricted;
                    }
                }
            }
        }

        if self.params.features.assort_mix {
            if let Some(candidate) = self.select_by_assort_mix(agent_id, &pool) {
                return Some(candidate);
            }
        }

        self.pop_random.choice(&pool).copied()
    }

    /// Narrows `candidates` to a single assortative-mixing pick, using
    /// the first declared `assort_mix` definition whose attribute/value
    /// matches `agent_id` (spec §4.3, step 6). Returns `None` if no
    /// definition matches, so the caller falls back to a uniform draw.
    fn select_by_assort_mix(&mut self, agent_id: AgentId, candidates: &[AgentId]) -> Option<AgentId> {
        let requester = self.agents.get(&agent_id)?.clone();
        let mut matched = None;
        for (_, def) in self.params.assort_mix.iter() {
            if def.attribute.value_of(&requester) == def.agent_value {
                matched = Some(def.clone());
                break;
            }
        }
        let def = matched?;
        let mut weights = Vec::with_capacity(candidates.len());
        for id in candidates {
            let candidate = self.agents.get(id)?;
            let key = def.attribute.value_of(candidate);
            let weight = def
                .partner_values
                .get(&key)
                .or_else(|| def.partner_values.get(OTHER_KEY))
                .copied()
                .unwrap_or(0.0);
            weights.push(weight);
        }
        let idx = self.pop_random.weighted_index(&weights)?;
        candidates.get(idx).copied()
    }

    /// Runs one partner-selection pass across every bond type,
    /// repeatedly assigning partners to under-target agents until a
    /// round forms no new relationships (spec §4.3: "Assignment loop").
    /// A no-op when `features.static_network` freezes the graph after
    /// initialization (spec §4.4.a).
    pub fn update_partner_assignments(&mut self) {
        if self.params.features.static_network {
            return;
        }
        let break_point = self.params.calibration.partnership.break_point;
        let bonds: Vec<BondTypeName> = self.params.classes.bond_types.keys().cloned().collect();
        for bond in bonds {
            let duration_dist = if self.params.classes.bond_types[&bond].requires_injection() {
                self.params.partnership.duration.injection.clone()
            } else {
                self.params.partnership.duration.sex.clone()
            };
            loop {
                let candidates: Vec<AgentId> = self.partnerable_agents(&bond).into_iter().collect();
                if candidates.is_empty() {
                    break;
                }
                let mut formed_any = false;
                for agent_id in candidates {
                    if !self.partnerable_agents(&bond).contains(&agent_id) {
                        continue;
                    }
                    let mut attempts = 0;
                    while attempts < break_point {
                        attempts += 1;
                        let Some(partner_id) = self.select_partner(agent_id, &bond) else { break };
                        let duration = duration_dist.sample(&mut self.np_random).max(1);
                        if self.form_relationship(agent_id, partner_id, bond.clone(), duration).is_some() {
                            formed_any = true;
                            break;
                        }
                    }
                }
                if !formed_any {
                    break;
                }
            }
        }
    }

    /// Attempts to select and form one relationship for `agent_id`
    /// under `bond`, sampling a duration the same way
    /// `update_partner_assignments` does. Used for one-off insertions
    /// outside the normal assignment loop, such as agent-zero seeding
    /// (spec §4.4.b).
    pub fn attempt_partner(&mut self, agent_id: AgentId, bond: &BondTypeName) -> Option<RelationshipId> {
        let partner_id = self.select_partner(agent_id, bond)?;
        let duration_dist = if self.params.classes.bond_types.get(bond)?.requires_injection() {
            self.params.partnership.duration.injection.clone()
        } else {
            self.params.partnership.duration.sex.clone()
        };
        let duration = duration_dist.sample(&mut self.np_random).max(1);
        self.form_relationship(agent_id, partner_id, bond.clone(), duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ActKind, BondTypeDef, Race};
    use crate::params::*;
    use std::collections::HashMap as Map;

    fn test_params() -> Arc<Params> {
        let mut bond_types = Map::new();
        bond_types.insert(BondTypeName::new("Sex"), BondTypeDef::new("Sex", [ActKind::Sex]));
        Arc::new(Params {
            model: ModelParams {
                num_pop: 10,
                time: TimeParams { num_steps: 5, burn_steps: 0, steps_per_year: 52 },
                network: NetworkParams { enable: true, network_type: "default".into(), component_size_max: 50 },
                seed: SeedParams { ppl: 1, run: 2 },
            },
            classes: ClassesParams {
                races: vec![Race::Black],
                sex_types: vec![SexType::MSM],
                bond_types,
                populations: vec!["default".into()],
            },
            features: FeatureParams::none(),
            demographics: DemographicsParams::new(),
            partnership: PartnershipParams {
                bonds: BondsParams::new(),
                duration: DurationParams {
                    sex: crate::types::Distribution::Parametric {
                        kind: crate::types::ParametricKind::Poisson,
                        var_1: 10.0,
                        var_2: 0.0,
                    },
                    injection: crate::types::Distribution::Parametric {
                        kind: crate::types::ParametricKind::Poisson,
                        var_1: 10.0,
                        var_2: 0.0,
                    },
                },
                network: NetworkMixingParams { same_component: SameComponentParams { prob: 0.0 } },
            },
            calibration: CalibrationParams {
                sex: SexCalibration { partner: 1.0, act: 1.0 },
                partnership: PartnershipCalibration { buffer: 1.5, break_point: 5 },
                needle_act_scaling: 1.0,
                sex_act_scaling: 1.0,
                test_freq: 1.0,
                art_cov: 1.0,
                prog_aids: 1.0,
                incar: 1.0,
                network: NetworkCalibration { trim: NetworkTrimCalibration { prob: 0.0 } },
            },
            hiv: HivParams { start_time: 0, acute: AcuteParams { duration: 12, infectivity: 3.0 }, per_act: Map::new() },
            prep: PrepParams {
                target: 0.0,
                start_time: 0,
                target_model: crate::enums::PrepTargetingModel::Default,
                prep_type: crate::enums::PrepType::Oral,
                peak_load: 1.0,
                fallout_t: 4,
                adherence_efficacy: 0.96,
                non_adherence_efficacy: 0.76,
                resist: 0.01,
                pca: PcaParams::default(),
            },
            assort_mix: AssortMixParams::new(),
            program: ProgramParams {
                incar: IncarProgramParams {
                    pris_test_prob: 0.5,
                    art_enroll: 0.3,
                    art_loss_on_release: 0.2,
                    treat_ric: false,
                    treatment_program_threshold: 1000,
                },
                high_risk: HighRiskProgramParams { proportion: 0.3, duration: Map::new(), partner_scale: 2.0 },
                syringe_services: SyringeServicesParams { prevalence: 0.0, coverage: 0.0 },
                condom_use_type: CondomUseType::ActBased,
            },
        })
    }

    fn test_population() -> Population {
        let params = test_params();
        let streams = RandomStreams::new(params.model.seed.ppl, params.model.seed.run);
        let mut locations = Map::new();
        locations.insert("default".to_string(), Arc::new(Location::new("default")));
        let mut sleeps_with = SleepsWithTable::new();
        sleeps_with.set(SexType::MSM, vec![SexType::MSM]);
        Population::new(params, locations, &streams, sleeps_with)
    }

    #[test]
    fn create_agent_registers_in_all_agents() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let id = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        assert!(pop.all_agents.contains(id));
        assert_eq!(pop.agent_count(), 1);
    }

    #[test]
    fn create_pwid_agent_joins_pwid_subset() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let id = pop.create_agent(Race::Black, SexType::MSM, DrugType::Inj, location, false);
        assert!(pop.pwid_agents().contains(id));
    }

    #[test]
    fn form_relationship_updates_both_partner_sets() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
        let b = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        let bond = BondTypeName::new("Sex");
        let rel_id = pop.form_relationship(a, b, bond.clone(), 5).unwrap();
        assert!(pop.relationship(rel_id).is_some());
        assert!(pop.agent(a).unwrap().partners[&bond].contains(&b));
        assert!(pop.agent(b).unwrap().partners[&bond].contains(&a));
    }

    #[test]
    fn duplicate_relationship_is_rejected() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
        let b = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        let bond = BondTypeName::new("Sex");
        assert!(pop.form_relationship(a, b, bond.clone(), 5).is_some());
        assert!(pop.form_relationship(a, b, bond, 5).is_none());
    }

    #[test]
    fn progress_relationship_to_termination_removes_partners() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
        let b = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        let bond = BondTypeName::new("Sex");
        let rel_id = pop.form_relationship(a, b, bond.clone(), 1).unwrap();
        assert!(pop.progress_relationship(rel_id, true));
        assert!(pop.relationship(rel_id).is_none());
        assert!(!pop.agent(a).unwrap().partners[&bond].contains(&b));
    }

    #[test]
    fn self_relationship_is_rejected() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        assert!(pop.form_relationship(a, a, BondTypeName::new("Sex"), 5).is_none());
    }

    #[test]
    fn terminate_all_relationships_clears_every_bond() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
        let b = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        pop.form_relationship(a, b, BondTypeName::new("Sex"), 5).unwrap();
        pop.terminate_all_relationships(a);
        assert_eq!(pop.relationship_count(), 0);
    }

    #[test]
    fn evict_excess_partners_trims_down_to_target() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
        let bond = BondTypeName::new("Sex");
        let mut partners = Vec::new();
        for _ in 0..3 {
            let p = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
            pop.form_relationship(a, p, bond.clone(), 10).unwrap();
            partners.push(p);
        }
        assert_eq!(pop.agent(a).unwrap().partner_count(&bond), 3);
        pop.agent_mut(a).unwrap().target_partners.insert(bond.clone(), 1);
        pop.evict_excess_partners(a, &bond);
        assert_eq!(pop.agent(a).unwrap().partner_count(&bond), 1);
        let remaining = pop.agent(a).unwrap().partners[&bond].clone();
        for p in partners {
            assert_eq!(remaining.contains(&p), pop.agent(p).unwrap().partners[&bond].contains(&a));
        }
    }

    #[test]
    fn remove_agent_clears_all_agents_membership() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        pop.remove_agent(a);
        assert!(!pop.all_agents.contains(a));
        assert_eq!(pop.agent_count(), 0);
    }

    #[test]
    fn dx_count_accumulates() {
        let mut pop = test_population();
        pop.record_dx(Race::Black, SexType::MSM);
        pop.record_dx(Race::Black, SexType::MSM);
        assert_eq!(pop.dx_count(Race::Black, SexType::MSM), 2);
        assert_eq!(pop.total_dx_count(), 2);
    }

    #[test]
    fn update_partner_assignments_forms_relationship_between_under_target_agents() {
        let mut pop = test_population();
        let location = pop.locations["default"].clone();
        let a = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location.clone(), false);
        let b = pop.create_agent(Race::Black, SexType::MSM, DrugType::None, location, false);
        let bond = BondTypeName::new("Sex");
        pop.agent_mut(a).unwrap().target_partners.insert(bond.clone(), 1);
        pop.agent_mut(b).unwrap().target_partners.insert(bond.clone(), 1);
        pop.recompute_partnerable(a);
        pop.recompute_partnerable(b);
        pop.update_partner_assignments();
        assert!(pop.agent(a).unwrap().partner_count(&bond) > 0 || pop.agent(b).unwrap().partner_count(&bond) > 0);
    }

    #[test]
    fn haart_count_round_trips() {
        let mut pop = test_population();
        pop.record_haart(Race::Black, SexType::MSM);
        assert_eq!(pop.haart_count(Race::Black, SexType::MSM), 1);
        pop.forget_haart(Race::Black, SexType::MSM);
        assert_eq!(pop.haart_count(Race::Black, SexType::MSM), 0);
    }

    #[test]
    fn initialize_seeds_num_pop_agents() {
        let mut pop = test_population();
        let mut entry = DemographicEntry {
            ppl: 1.0,
            num_partners: Map::new(),
            hiv: HivInitParams { init: 0.0, dx_init: 0.0, max_init_time: 1 },
            aids_init: 0.0,
            haart_init: 0.0,
            haart_adherence: 0.0,
            prep_init: 0.0,
            incar: IncarDemographicParams {
                init: 0.0,
                prob: 0.0,
                duration_init: crate::types::Distribution::Bins(vec![]),
                duration: crate::types::Distribution::Bins(vec![]),
            },
            high_risk_init: 0.0,
            age: Map::new(),
            msmw_prob: 0.0,
            haart_prev: 0.0,
            haart_disc: 0.0,
            hiv_test_prob: 0.0,
            prep_disc: 0.0,
            prep_adherence: 0.0,
            needle_share: 0.0,
            sex_acts_mean: 0.0,
            condom_unsafe_prob: 0.0,
            death_rate: 0.0,
        };
        entry.num_partners.insert(BondTypeName::new("Sex"), crate::types::Distribution::Parametric {
            kind: crate::types::ParametricKind::Poisson,
            var_1: 1.0,
            var_2: 0.0,
        });
        let mut params = (*pop.params).clone();
        params.demographics.insert(Race::Black, SexType::MSM, entry);
        pop.params = Arc::new(params);
        pop.initialize();
        assert_eq!(pop.agent_count(), 10);
    }
}

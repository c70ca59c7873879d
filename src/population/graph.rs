//! Undirected graph mirroring the current relationships (spec §2:
//! "`graph` (optional undirected graph mirroring relationships)";
//! spec §4.3 step 5: "same_component" mixing).

use crate::types::AgentId;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// An undirected adjacency-list graph over agent ids.
///
/// Edges carry no payload: the graph only needs to answer "is there a
/// partnership between these two agents" and "what's reachable from
/// this agent", both of which [`crate::population::Population`]'s
/// `relationships` map already answers authoritatively — the graph is
/// a read-optimized mirror, never the source of truth (spec §8:
/// "Graph edges... equal the set of current relationships").
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Graph {
    adjacency: HashMap<AgentId, BTreeSet<AgentId>>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Graph { adjacency: HashMap::new() }
    }

    /// Ensures `agent` has a (possibly empty) adjacency entry, so it
    /// shows up as an isolated node before it has any edges.
    pub fn add_node(&mut self, agent: AgentId) {
        self.adjacency.entry(agent).or_default();
    }

    /// Removes `agent` and every edge touching it.
    pub fn remove_node(&mut self, agent: AgentId) {
        if let Some(neighbors) = self.adjacency.remove(&agent) {
            for neighbor in neighbors {
                if let Some(set) = self.adjacency.get_mut(&neighbor) {
                    set.remove(&agent);
                }
            }
        }
    }

    /// Adds an undirected edge between `a` and `b`.
    pub fn add_edge(&mut self, a: AgentId, b: AgentId) {
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Removes the undirected edge between `a` and `b`, if present.
    pub fn remove_edge(&mut self, a: AgentId, b: AgentId) {
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.remove(&a);
        }
    }

    /// Returns true iff `a` and `b` are directly connected.
    #[must_use]
    pub fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Returns the total number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Returns every agent directly connected to `agent`.
    #[must_use]
    pub fn neighbors(&self, agent: AgentId) -> BTreeSet<AgentId> {
        self.adjacency.get(&agent).cloned().unwrap_or_default()
    }

    /// Returns `agent`'s connected component via breadth-first search,
    /// including `agent` itself (spec §4.3 step 5: "same_component"
    /// mixing restriction).
    #[must_use]
    pub fn connected_component(&self, agent: AgentId) -> BTreeSet<AgentId> {
        let mut visited = BTreeSet::new();
        if !self.adjacency.contains_key(&agent) {
            visited.insert(agent);
            return visited;
        }
        let mut queue = VecDeque::new();
        queue.push_back(agent);
        visited.insert(agent);
        while let Some(current) = queue.pop_front() {
            for neighbor in self.adjacency.get(&current).into_iter().flatten() {
                if visited.insert(*neighbor) {
                    queue.push_back(*neighbor);
                }
            }
        }
        visited
    }

    /// Returns every edge as an unordered pair, with the smaller id
    /// first, in deterministic order.
    #[must_use]
    pub fn edges(&self) -> Vec<(AgentId, AgentId)> {
        let mut seen = BTreeSet::new();
        for (&a, neighbors) in &self.adjacency {
            for &b in neighbors {
                let pair = if a.get() < b.get() { (a, b) } else { (b, a) };
                seen.insert(pair);
            }
        }
        seen.into_iter().collect()
    }
}

//! Insertion-unaware membership container, optionally nested as a tree
//! of named subsets that share members by reference (spec §3, §4.1:
//! "AgentSet").
//!
//! Rather than parent back-pointers (which Rust's ownership model makes
//! awkward for a mutable tree), subsets are owned by their parent and
//! addressed by path: [`AgentSet::add_to`] inserts into the root and
//! every named descendant along the given path, and [`AgentSet::remove`]
//! removes from the set it's called on and *every* descendant
//! recursively — exactly the "add propagates to ancestors, remove
//! propagates to descendants" contract spec §4.1 describes, expressed
//! without shared mutable references.

use crate::types::AgentId;
use std::collections::{BTreeSet, HashMap};

/// A named set of agent ids, optionally holding further named subsets.
///
/// Iteration order is by ascending [`AgentId`] (a `BTreeSet` underneath),
/// satisfying spec §5's determinism contract ("stable iteration order...
/// sorted by id").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AgentSet {
    name: String,
    members: BTreeSet<AgentId>,
    children: HashMap<String, AgentSet>,
}

impl AgentSet {
    /// Creates an empty set named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        AgentSet { name: name.into(), members: BTreeSet::new(), children: HashMap::new() }
    }

    /// Returns this set's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `id` to this set only (not descendants). Prefer
    /// [`AgentSet::add_to`] when adding through a nested path so
    /// ancestors stay consistent.
    pub fn add(&mut self, id: AgentId) {
        self.members.insert(id);
    }

    /// Adds `id` to this set and to the named descendant at `path`,
    /// and every set along the way (spec §4.1: "Adding to a child must
    /// add to all ancestors"). A path component that doesn't yet exist
    /// as a subset is a no-op for that component (and anything past
    /// it); create subsets with [`AgentSet::add_subset`] first.
    pub fn add_to(&mut self, path: &[&str], id: AgentId) {
        self.members.insert(id);
        if let Some((head, rest)) = path.split_first() {
            if let Some(child) = self.children.get_mut(*head) {
                child.add_to(rest, id);
            }
        }
    }

    /// Removes `id` from this set and from every descendant,
    /// recursively (spec §4.1: "removing from a parent must remove
    /// from all descendants"). A no-op if `id` was not a member.
    pub fn remove(&mut self, id: AgentId) {
        self.members.remove(&id);
        for child in self.children.values_mut() {
            child.remove(id);
        }
    }

    /// Returns true iff `id` is a member of this set.
    #[must_use]
    pub fn contains(&self, id: AgentId) -> bool {
        self.members.contains(&id)
    }

    /// Returns the number of members in this set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Iterates members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }

    /// Declares a named child subset, creating it empty if absent.
    /// Returns a mutable reference to the (possibly newly created)
    /// subset.
    pub fn add_subset(&mut self, name: impl Into<String>) -> &mut AgentSet {
        let name = name.into();
        self.children.entry(name.clone()).or_insert_with(|| AgentSet::new(name))
    }

    /// Returns the named subset, if declared.
    #[must_use]
    pub fn subset(&self, name: &str) -> Option<&AgentSet> {
        self.children.get(name)
    }

    /// Returns a mutable reference to the named subset, if declared.
    pub fn subset_mut(&mut self, name: &str) -> Option<&mut AgentSet> {
        self.children.get_mut(name)
    }

    /// Iterates the named subset's members in ascending id order, or
    /// an empty iterator if the subset isn't declared.
    pub fn iter_subset(&self, name: &str) -> Box<dyn Iterator<Item = AgentId> + '_> {
        match self.subset(name) {
            Some(set) => Box::new(set.iter()),
            None => Box::new(std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_leaves_set_unchanged() {
        let mut set = AgentSet::new("all");
        set.add(AgentId::new(1));
        set.remove(AgentId::new(1));
        assert_eq!(set.count(), 0);
        assert!(!set.contains(AgentId::new(1)));
    }

    #[test]
    fn remove_from_set_not_containing_agent_is_noop() {
        let mut set = AgentSet::new("all");
        set.remove(AgentId::new(99));
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn add_to_nested_path_propagates_to_ancestors() {
        let mut root = AgentSet::new("all");
        root.add_subset("hiv");
        root.add_to(&["hiv"], AgentId::new(1));
        assert!(root.contains(AgentId::new(1)));
        assert!(root.subset("hiv").unwrap().contains(AgentId::new(1)));
    }

    #[test]
    fn remove_from_root_cascades_to_descendants() {
        let mut root = AgentSet::new("all");
        root.add_subset("hiv");
        root.add_to(&["hiv"], AgentId::new(1));
        root.remove(AgentId::new(1));
        assert!(!root.contains(AgentId::new(1)));
        assert!(!root.subset("hiv").unwrap().contains(AgentId::new(1)));
    }

    #[test]
    fn add_to_path_missing_subset_does_not_panic() {
        let mut root = AgentSet::new("all");
        root.add_to(&["missing"], AgentId::new(1));
        assert!(root.contains(AgentId::new(1)));
        assert!(root.subset("missing").is_none());
    }

    #[test]
    fn iter_is_sorted_by_id() {
        let mut set = AgentSet::new("all");
        set.add(AgentId::new(3));
        set.add(AgentId::new(1));
        set.add(AgentId::new(2));
        let ids: Vec<u64> = set.iter().map(|a| a.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn iter_subset_of_undeclared_subset_is_empty() {
        let set = AgentSet::new("all");
        assert_eq!(set.iter_subset("missing").count(), 0);
    }

    #[test]
    fn nested_two_levels_deep() {
        let mut root = AgentSet::new("all");
        root.add_subset("hiv").add_subset("dx");
        root.add_to(&["hiv", "dx"], AgentId::new(5));
        assert!(root.contains(AgentId::new(5)));
        assert!(root.subset("hiv").unwrap().contains(AgentId::new(5)));
        assert!(root.subset("hiv").unwrap().subset("dx").unwrap().contains(AgentId::new(5)));
    }
}

//! Relationship state machine (spec §4.2).

use crate::enums::BondTypeName;
use crate::types::{AgentId, RelationshipId};

/// A relationship's lifecycle state (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RelationshipStatus {
    /// Duration remaining is positive.
    Active,
    /// Forced or decremented to zero; the relationship is being removed.
    Terminated,
}

/// An unordered pair of agents bonded under one bond type (spec §3).
///
/// Two relationships with the same unordered pair and bond type must
/// not coexist; [`crate::population::Population`] is responsible for
/// enforcing that at creation time, since only it can see every
/// existing relationship.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Relationship {
    /// Unique identifier.
    pub id: RelationshipId,
    /// One endpoint. Unordered with `agent_two`: no method here treats
    /// either side specially.
    pub agent_one: AgentId,
    /// The other endpoint.
    pub agent_two: AgentId,
    /// The bond type this relationship was formed under.
    pub bond: BondTypeName,
    /// Steps remaining before this relationship terminates on its own.
    pub duration_remaining: i64,
    /// Cumulative sex acts recorded across this relationship's
    /// lifetime (spec §3: "monotonically non-decreasing").
    pub total_sex_acts: u64,
    /// Current lifecycle state.
    pub status: RelationshipStatus,
}

impl Relationship {
    /// Creates a new active relationship.
    #[must_use]
    pub fn new(
        id: RelationshipId,
        agent_one: AgentId,
        agent_two: AgentId,
        bond: BondTypeName,
        duration: i64,
    ) -> Self {
        Relationship {
            id,
            agent_one,
            agent_two,
            bond,
            duration_remaining: duration,
            total_sex_acts: 0,
            status: RelationshipStatus::Active,
        }
    }

    /// Returns true iff this relationship is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, RelationshipStatus::Active)
    }

    /// Returns the other endpoint given one, or `None` if `agent` is
    /// not a party to this relationship.
    #[must_use]
    pub fn other(&self, agent: AgentId) -> Option<AgentId> {
        if agent == self.agent_one {
            Some(self.agent_two)
        } else if agent == self.agent_two {
            Some(self.agent_one)
        } else {
            None
        }
    }

    /// Returns true iff `agent` is one of this relationship's endpoints.
    #[must_use]
    pub fn involves(&self, agent: AgentId) -> bool {
        agent == self.agent_one || agent == self.agent_two
    }

    /// Advances this relationship by one step (spec §4.2).
    ///
    /// If `force` is true, transitions to [`RelationshipStatus::Terminated`]
    /// unconditionally. Otherwise decrements `duration_remaining`;
    /// transitions to `Terminated` once it reaches zero or below.
    /// Returns true iff the relationship is now terminated, so callers
    /// know to tear down partner-set membership and remove it from the
    /// population (spec §4.2: "On `terminated`, both endpoints remove
    /// each other...").
    pub fn progress(&mut self, force: bool) -> bool {
        if force {
            self.status = RelationshipStatus::Terminated;
            return true;
        }
        self.duration_remaining -= 1;
        if self.duration_remaining <= 0 {
            self.status = RelationshipStatus::Terminated;
        }
        !self.is_active()
    }
}

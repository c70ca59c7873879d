//! Type-safe integer identifier wrappers.
//!
//! Agents and relationships are referenced by stable integer id
//! everywhere outside the collection that owns them (spec §3, §9):
//! partner sets, graph nodes, and per-step bookkeeping sets all hold
//! ids rather than object references, so there is no agent-relationship-
//! population reference cycle to manage.

use std::fmt;

/// Macro to generate integer id newtypes with common functionality.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw integer id.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw integer id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an agent.
    ///
    /// Assigned monotonically by [`crate::population::Population`] as
    /// agents are created, including replacements created by
    /// death-and-replace (spec §3: "Lifecycle").
    AgentId
);

define_id!(
    /// Unique identifier for a relationship.
    ///
    /// Assigned when a relationship is formed in
    /// `update_partner_assignments` (spec §3).
    RelationshipId
);

/// Monotonic id allocator.
///
/// Both agents and relationships need a simple "next integer" source;
/// this is shared rather than duplicated per id type.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        IdAllocator { next: 0 }
    }

    /// Returns the next integer, advancing the allocator.
    pub fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

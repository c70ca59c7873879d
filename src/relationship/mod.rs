//! Relationship state machine: an unordered, typed, timed bond between
//! two agents (spec §3, §4.2).

#[allow(clippy::module_inception)]
mod relationship;

pub use relationship::{Relationship, RelationshipStatus};

//! Core of a stochastic agent-based simulator of HIV transmission
//! through sexual and injection-drug partnerships in a heterogeneous
//! population (spec §1).
//!
//! Three subsystems make up the whole of this crate:
//!
//! - the population & partnership engine ([`population`], [`agent`],
//!   [`relationship`]);
//! - the per-step stochastic transmission & clinical state machine
//!   ([`model`]);
//! - seeded random-stream discipline ([`types::rng`]).
//!
//! Parameter parsing from on-disk configuration, command-line entry,
//! tabular report writers, and persistence are out of scope (spec §1):
//! this crate consumes a frozen [`params::Params`] tree, emits
//! statistics through [`model::StatsSink`], and leaves persistence to
//! a caller able to enumerate agents/relationships by stable id.

pub mod agent;
pub mod enums;
pub mod error;
pub mod model;
pub mod params;
pub mod population;
pub mod relationship;
pub mod types;

pub use error::SimError;

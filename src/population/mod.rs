//! Everything that groups agents together: named locations, the
//! partnership graph, and the `Population` that owns every agent,
//! relationship, and derived set (spec §2, §3, §4.3).

mod graph;
mod location;
#[allow(clippy::module_inception)]
mod population;

pub use graph::Graph;
pub use location::Location;
pub use population::Population;

//! Shared primitive types: integer ids, the random-stream wrappers,
//! and the bins/parametric distribution abstraction.

mod distribution;
mod ids;
mod rng;

pub use distribution::{Bin, Distribution, ParametricKind};
pub use ids::{AgentId, IdAllocator, RelationshipId};
pub use rng::{total_probability, RandomStream, RandomStreams};

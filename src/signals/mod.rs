//! Signal composition: per-indicator votes reduced into one direction.

pub mod engine;
pub mod votes;

pub use engine::*;
pub use votes::*;

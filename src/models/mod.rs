//! Domain model types for electric vehicle routing.
//!
//! Provides graph nodes (depot, chargers, customers), the vehicle's battery
//! and load parameters, the problem definition tying them together, candidate
//! solutions and the record produced by an optimisation run.

mod node;
mod problem;
mod result;
mod solution;
mod vehicle;

pub use node::{Node, NodeKind, TimeWindow};
pub use problem::{EvrpData, ProblemDefinition, ProblemError};
pub use result::OptimizationResult;
pub use solution::{Solution, SolutionSet, UNSET_DISTANCE};
pub use vehicle::VehicleParameters;

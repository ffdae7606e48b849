//! Particle swarm optimization for hyperparameter search.
//!
//! A swarm of candidate solutions explores a bounded continuous space,
//! each particle pulled towards its own best position and the swarm's
//! best (Kennedy & Eberhart, 1995). The fitness function here is "train
//! a candidate sequence model and report its in-sample error", which
//! makes each evaluation expensive; the budget is therefore small and
//! fixed.

mod optimizer;
mod particle;

pub use optimizer::{SwarmConfig, SwarmOptimizer, SwarmResult};
pub use particle::{Particle, VelocityCoefficients};

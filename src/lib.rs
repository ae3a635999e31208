//! # Drone Swarm Behavior Simulation
//!
//! Decentralized behavioral engine for a swarm of grid-bound drones that
//! organize into a leader/follower/peer network, keep station-keeping
//! distances and manage their batteries without any central coordination.
//!
//! ## Components
//! - Battery resource model
//! - Per-drone knowledge store (neighbours, fires, mailbox)
//! - Single-hop messaging and decentralized network formation
//! - Distance-based formation and grid navigation
//! - Explicit finite-state controller per drone
//! - Shuffled-order round coordinator
//!
//! ## Execution model
//! Single-threaded discrete rounds. Each round every drone runs
//! monitor → decide → act exactly once, in a freshly shuffled order, and
//! observes whatever earlier drones in the same round already changed.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![allow(clippy::wildcard_imports)] // Used for internal module re-exports
#![allow(clippy::cast_possible_truncation)] // Grid sizes are validated to fit i32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

/// Base stations: deployment, charging and fire report sinks
pub mod base;
/// Battery resource model
pub mod battery;
/// Simulation and drone parameters
pub mod config;
/// Decision logic, state machine and navigation
pub mod control;
/// Round coordinator owning a full run
pub mod coordinator;
/// Per-drone local world view
pub mod knowledge;
/// Messaging and network formation
pub mod network;
/// Seedable random source
pub mod rng;
/// Drone agents and the swarm arena
pub mod swarm;
/// Telemetry snapshots, observer sink and cost accounting
pub mod telemetry;
/// Core types (DroneId, GridPos, Role, errors)
pub mod types;
/// Spatial world abstraction and grid implementation
pub mod world;

pub use config::*;
pub use coordinator::Simulation;
pub use swarm::{Drone, StepContext, Swarm};
pub use types::*;
pub use world::{GridWorld, SpatialWorld};

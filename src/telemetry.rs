//! Telemetry, observation and cost accounting
//!
//! The behavioral engine reports outward through three seams:
//! - [`DroneTelemetry`] snapshots, read-only, for visualization
//! - a [`SwarmObserver`] sink notified of transitions, role changes and broadcasts
//! - a [`CostLedger`] booking deployments and charging events
//!
//! # Example
//! ```ignore
//! use drone_swarm_sim::telemetry::{CostLedger, CostTracker};
//!
//! let mut ledger = CostTracker::new(10.0, 5.0);
//! ledger.register_drone_deployment(3);
//! ledger.register_charging_event();
//! assert_eq!(ledger.cost_details().total_cost, 35.0);
//! ```

use crate::control::{DroneEvent, DroneState};
use crate::network::LinkKind;
use crate::types::*;
use log::debug;
use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════
// COST ACCOUNTING
// ═══════════════════════════════════════════════════════════════════════════

/// Outward cost-accounting callbacks
pub trait CostLedger {
    /// `count` drones left a base
    fn register_drone_deployment(&mut self, count: usize);
    /// A drone took one round of charge
    fn register_charging_event(&mut self);
}

/// Cost breakdown report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Drones deployed so far
    pub drone_deployments: usize,
    /// Charging events so far
    pub charging_events: usize,
    /// Cost of all deployments
    pub deployment_cost: f64,
    /// Cost of all charging events
    pub charging_cost: f64,
    /// Sum of both
    pub total_cost: f64,
}

/// Running cost totals
#[derive(Debug, Clone, PartialEq)]
pub struct CostTracker {
    deployment_cost: f64,
    charge_cost: f64,
    drone_deployments: usize,
    charging_events: usize,
    total_cost: f64,
}

impl CostTracker {
    /// Create a tracker with unit prices
    pub fn new(deployment_cost: f64, charge_cost: f64) -> Self {
        Self {
            deployment_cost,
            charge_cost,
            drone_deployments: 0,
            charging_events: 0,
            total_cost: 0.0,
        }
    }

    /// Drones deployed so far
    pub fn drone_deployments(&self) -> usize {
        self.drone_deployments
    }

    /// Charging events so far
    pub fn charging_events(&self) -> usize {
        self.charging_events
    }

    /// Accumulated cost
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Detailed breakdown of all costs
    pub fn cost_details(&self) -> CostBreakdown {
        let deployment_cost = self.drone_deployments as f64 * self.deployment_cost;
        let charging_cost = self.charging_events as f64 * self.charge_cost;
        CostBreakdown {
            drone_deployments: self.drone_deployments,
            charging_events: self.charging_events,
            deployment_cost,
            charging_cost,
            total_cost: self.total_cost,
        }
    }
}

impl CostLedger for CostTracker {
    fn register_drone_deployment(&mut self, count: usize) {
        self.drone_deployments += count;
        let cost = count as f64 * self.deployment_cost;
        self.total_cost += cost;
        debug!("deployed {} drones, added cost {}", count, cost);
    }

    fn register_charging_event(&mut self) {
        self.charging_events += 1;
        self.total_cost += self.charge_cost;
        debug!("charging event, added cost {}", self.charge_cost);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OBSERVER SINK
// ═══════════════════════════════════════════════════════════════════════════

/// Receives behavioral events as they happen during a round.
///
/// Every method has a no-op default so sinks only implement what they need.
pub trait SwarmObserver {
    /// A state machine transition was taken (self-transitions included)
    fn on_transition(&mut self, _drone: DroneId, _from: DroneState, _event: DroneEvent, _to: DroneState) {}

    /// Leader election changed a drone's role
    fn on_role_change(&mut self, _drone: DroneId, _from: Role, _to: Role) {}

    /// A drone flushed its outgoing buffer
    fn on_broadcast(&mut self, _drone: DroneId, _messages: usize, _recipients: usize) {}

    /// Every drone has stepped once
    fn on_round_end(&mut self, _round: u64) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SwarmObserver for NullObserver {}

/// One recorded transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    /// Round the transition happened in
    pub round: u64,
    /// Drone that transitioned
    pub drone: DroneId,
    /// Source state
    pub from: DroneState,
    /// Triggering event
    pub event: DroneEvent,
    /// Target state
    pub to: DroneState,
}

/// In-memory observer, useful for tests and replays
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    round: u64,
    /// Transitions in the order they happened
    pub transitions: Vec<TransitionRecord>,
    /// `(drone, from, to)` role changes
    pub role_changes: Vec<(DroneId, Role, Role)>,
    /// `(drone, messages, recipients)` broadcasts
    pub broadcasts: Vec<(DroneId, usize, usize)>,
    /// Rounds completed
    pub rounds_completed: u64,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions of a single drone
    pub fn transitions_of(&self, drone: DroneId) -> impl Iterator<Item = &TransitionRecord> {
        self.transitions.iter().filter(move |t| t.drone == drone)
    }
}

impl SwarmObserver for EventLog {
    fn on_transition(&mut self, drone: DroneId, from: DroneState, event: DroneEvent, to: DroneState) {
        self.transitions.push(TransitionRecord {
            round: self.round,
            drone,
            from,
            event,
            to,
        });
    }

    fn on_role_change(&mut self, drone: DroneId, from: Role, to: Role) {
        self.role_changes.push((drone, from, to));
    }

    fn on_broadcast(&mut self, drone: DroneId, messages: usize, recipients: usize) {
        self.broadcasts.push((drone, messages, recipients));
    }

    fn on_round_end(&mut self, round: u64) {
        self.rounds_completed += 1;
        self.round = round + 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SNAPSHOTS
// ═══════════════════════════════════════════════════════════════════════════

/// Read-only view of one drone for visualization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneTelemetry {
    /// Drone id
    pub id: DroneId,
    /// Grid cell
    pub position: GridPos,
    /// Current role
    pub role: Role,
    /// Current state machine state name
    pub state: &'static str,
    /// Battery charge (percent)
    pub battery_percent: u32,
    /// Typed links in this drone's own network view
    pub links: Vec<(DroneId, LinkKind)>,
}

/// Swarm-wide aggregates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SwarmStats {
    /// Total drones
    pub drones: usize,
    /// Drones currently in the leader role
    pub leaders: usize,
    /// Drones currently in the scout role
    pub scouts: usize,
    /// Drones returning to or charging at a base
    pub returning_or_charging: usize,
    /// Mean battery percentage
    pub avg_battery: f32,
    /// Lowest battery percentage
    pub min_battery: u32,
    /// Follower links held by leaders
    pub follower_links: usize,
}

impl SwarmStats {
    /// Aggregate a set of snapshots
    pub fn from_telemetry(snapshots: &[DroneTelemetry]) -> Self {
        if snapshots.is_empty() {
            return Self::default();
        }
        let mut stats = SwarmStats {
            drones: snapshots.len(),
            min_battery: u32::MAX,
            ..Self::default()
        };
        let mut battery_sum = 0u64;
        for snap in snapshots {
            match snap.role {
                Role::Leader => stats.leaders += 1,
                Role::Scout => stats.scouts += 1,
                _ => {}
            }
            if snap.state == DroneState::ReturnToBase.as_str()
                || snap.state == DroneState::Recharging.as_str()
            {
                stats.returning_or_charging += 1;
            }
            battery_sum += snap.battery_percent as u64;
            stats.min_battery = stats.min_battery.min(snap.battery_percent);
            stats.follower_links += snap
                .links
                .iter()
                .filter(|(_, kind)| *kind == LinkKind::Follower)
                .count();
        }
        stats.avg_battery = battery_sum as f32 / snapshots.len() as f32;
        stats
    }
}

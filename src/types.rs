//! Core type definitions for the swarm simulation

use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for swarm operations
pub type Result<T> = core::result::Result<T, SwarmError>;

/// Stable identifier of a drone; doubles as its index in the swarm arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DroneId(pub u32);

impl DroneId {
    /// Create a new DroneId
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Arena slot of this drone
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D-{}", self.0)
    }
}

/// Cell coordinate on the simulation grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridPos {
    /// Create a new grid position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chessboard ("king move") distance: the larger of the axis differences.
    pub fn chebyshev_distance(&self, other: &GridPos) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// One cell closer to `target` on every axis where they differ.
    pub fn step_towards(&self, target: &GridPos) -> GridPos {
        GridPos {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    /// One cell further from `other` on every axis where they differ.
    pub fn step_away_from(&self, other: &GridPos) -> GridPos {
        GridPos {
            x: self.x - (other.x - self.x).signum(),
            y: self.y - (other.y - self.y).signum(),
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Role a drone currently plays in the swarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Holds formation and recruits followers
    Leader,
    /// Patrols and reports fires to its leader and peers
    Scout,
    /// Surrounds a known fire
    Cordon,
    /// Free roaming
    Walker,
}

impl Role {
    /// Lowercase name used in telemetry
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Scout => "scout",
            Role::Cordon => "cordon",
            Role::Walker => "walker",
        }
    }

    /// Whether this is the leader role
    pub const fn is_leader(&self) -> bool {
        matches!(self, Role::Leader)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building or querying a simulation.
///
/// The round loop itself never fails; these only surface at construction
/// time or through explicit lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwarmError {
    /// No drone with this id exists in the arena
    #[error("invalid drone id {0}")]
    InvalidDroneId(DroneId),
    /// A configuration value is outside its allowed range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The configuration document could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
    /// A position lies outside the grid
    #[error("position {0} is outside the grid")]
    OutOfBounds(GridPos),
}

impl From<serde_json::Error> for SwarmError {
    fn from(err: serde_json::Error) -> Self {
        SwarmError::ConfigParse(err.to_string())
    }
}

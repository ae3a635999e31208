//! Configuration management for the swarm simulation
//!
//! All numeric parameters are validated here, once, so the behavioral engine
//! can assume sane values (positive capacity, non-zero movement cost, ...).

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Fraction of the communication range used as station-keeping distance
pub const DESIRED_DISTANCE_MULTIPLIER: f64 = 0.9;

/// Per-drone parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    /// Single-hop radio range (cells, Chebyshev)
    pub communication_range: u32,
    /// Fire detection radius (cells, Chebyshev)
    pub vision_range: u32,
    /// Full battery charge
    pub battery_capacity: f64,
    /// Energy spent per cell moved
    pub movement_cost: f64,
    /// Energy spent per round without moving
    pub hovering_cost: f64,
    /// Energy restored per round at the base
    pub recharge_rate: f64,
    /// Low battery threshold (percent)
    pub low_threshold: f64,
    /// Expected fraction of leaders in the swarm
    pub leader_ratio: f64,
    /// Peers a scout links with on first contact
    pub max_peers: usize,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            communication_range: 10,
            vision_range: 5,
            battery_capacity: 100.0,
            movement_cost: 1.0,
            hovering_cost: 0.5,
            recharge_rate: 5.0,
            low_threshold: 20.0,
            leader_ratio: 0.1,
            max_peers: 3,
        }
    }
}

impl DroneConfig {
    /// Distance a drone tries to keep from its reference leader
    pub fn desired_distance(&self) -> u32 {
        libm::floor(self.communication_range as f64 * DESIRED_DISTANCE_MULTIPLIER) as u32
    }

    /// Maximum number of followers a leader accepts
    pub fn follower_capacity(&self) -> usize {
        libm::floor(1.0 / self.leader_ratio) as usize
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.communication_range == 0 {
            return Err(invalid("communication_range must be at least 1"));
        }
        if self.communication_range > i32::MAX as u32 || self.vision_range > i32::MAX as u32 {
            return Err(invalid("ranges exceed the coordinate range"));
        }
        if !(self.battery_capacity > 0.0) {
            return Err(invalid("battery_capacity must be positive"));
        }
        if !(self.movement_cost > 0.0) {
            return Err(invalid("movement_cost must be positive"));
        }
        if !(self.hovering_cost >= 0.0) {
            return Err(invalid("hovering_cost must not be negative"));
        }
        if !(self.recharge_rate > 0.0) {
            return Err(invalid("recharge_rate must be positive"));
        }
        if !(0.0..100.0).contains(&self.low_threshold) {
            return Err(invalid("low_threshold must be a percentage in [0, 100)"));
        }
        if !(self.leader_ratio > 0.0 && self.leader_ratio <= 1.0) {
            return Err(invalid("leader_ratio must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Run-level parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Upper bound on rounds executed by `Simulation::run`
    pub max_rounds: u64,
    /// Seed for the shared random source (`None` seeds from entropy)
    pub seed: Option<u64>,
    /// Bases placed when the simulation is built from config
    pub initial_bases: usize,
    /// Drones deployed by each base
    pub drones_per_base: usize,
    /// Cost booked per deployed drone
    pub deployment_cost: f64,
    /// Cost booked per charging event
    pub charge_cost: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 150,
            max_rounds: 100,
            seed: Some(42),
            initial_bases: 1,
            drones_per_base: 10,
            deployment_cost: 10.0,
            charge_cost: 5.0,
        }
    }
}

impl SimulationConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("grid must have a non-zero size"));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(invalid("grid dimensions exceed the coordinate range"));
        }
        if self.max_rounds == 0 {
            return Err(invalid("max_rounds must be at least 1"));
        }
        if self.deployment_cost < 0.0 || self.charge_cost < 0.0 {
            return Err(invalid("costs must not be negative"));
        }
        Ok(())
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Run-level parameters
    pub simulation: SimulationConfig,
    /// Per-drone parameters
    pub drone: DroneConfig,
}

impl SwarmConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SwarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Small grid and few drones, for tests
    pub fn test_config() -> Self {
        Self {
            simulation: SimulationConfig {
                width: 60,
                height: 60,
                max_rounds: 50,
                seed: Some(7),
                initial_bases: 1,
                drones_per_base: 5,
                ..SimulationConfig::default()
            },
            drone: DroneConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.drone.validate()?;
        let longest = self.simulation.width.max(self.simulation.height);
        if self.drone.communication_range > longest {
            return Err(invalid("communication_range must not exceed the longer grid side"));
        }
        if self.drone.vision_range > longest {
            return Err(invalid("vision_range must not exceed the longer grid side"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> SwarmError {
    SwarmError::InvalidConfig(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SwarmConfig::default().validate().is_ok());
        assert!(SwarmConfig::test_config().validate().is_ok());
    }

    #[test]
    fn test_derived_values() {
        let drone = DroneConfig::default();
        assert_eq!(drone.desired_distance(), 9);
        assert_eq!(drone.follower_capacity(), 10);

        let drone = DroneConfig {
            communication_range: 20,
            leader_ratio: 0.25,
            ..DroneConfig::default()
        };
        assert_eq!(drone.desired_distance(), 18);
        assert_eq!(drone.follower_capacity(), 4);
    }

    #[test]
    fn test_rejects_bad_battery() {
        let mut config = SwarmConfig::default();
        config.drone.battery_capacity = 0.0;
        assert!(matches!(config.validate(), Err(SwarmError::InvalidConfig(_))));

        let mut config = SwarmConfig::default();
        config.drone.movement_cost = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let mut config = SwarmConfig::default();
        config.drone.leader_ratio = 0.0;
        assert!(config.validate().is_err());
        config.drone.leader_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_range_beyond_grid() {
        let mut config = SwarmConfig::test_config();
        config.drone.communication_range = 60;
        assert!(config.validate().is_ok());
        config.drone.communication_range = 61;
        assert!(matches!(config.validate(), Err(SwarmError::InvalidConfig(_))));

        let drone = DroneConfig {
            communication_range: 3_000_000_000,
            ..DroneConfig::default()
        };
        assert!(drone.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config =
            SwarmConfig::from_json_str(r#"{"drone": {"communication_range": 20}}"#).unwrap();
        assert_eq!(config.drone.communication_range, 20);
        assert_eq!(config.drone.battery_capacity, 100.0);
        assert_eq!(config.simulation.width, 150);
    }

    #[test]
    fn test_malformed_json() {
        let err = SwarmConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, SwarmError::ConfigParse(_)));
    }
}

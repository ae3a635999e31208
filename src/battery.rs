//! Battery resource model
//!
//! Tracks the energy of a single drone. Movement costs energy per cell,
//! staying put costs the hovering rate, and the base restores a fixed amount
//! per round. The model knows nothing about positions: callers pass the
//! distance to base when asking whether a return is due.

use crate::config::DroneConfig;
use crate::telemetry::CostLedger;
use log::trace;

/// Energy store of one drone
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    capacity: f64,
    level: f64,
    movement_cost: f64,
    hovering_cost: f64,
    recharge_rate: f64,
    /// Percent
    low_threshold: f64,
}

impl Battery {
    /// Create a fully charged battery
    pub fn new(
        capacity: f64,
        movement_cost: f64,
        hovering_cost: f64,
        recharge_rate: f64,
        low_threshold: f64,
    ) -> Self {
        Self {
            capacity,
            level: capacity,
            movement_cost,
            hovering_cost,
            recharge_rate,
            low_threshold,
        }
    }

    /// Create a fully charged battery from drone parameters
    pub fn from_config(config: &DroneConfig) -> Self {
        Self::new(
            config.battery_capacity,
            config.movement_cost,
            config.hovering_cost,
            config.recharge_rate,
            config.low_threshold,
        )
    }

    /// Current energy level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Overwrite the energy level
    pub fn set_level(&mut self, level: f64) {
        self.level = level;
    }

    /// Full charge
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Low battery threshold (percent)
    pub fn low_threshold(&self) -> f64 {
        self.low_threshold
    }

    /// Energy needed to move `cells` cells, or to hover when `cells == 0`.
    pub fn calculate_travel_cost(&self, cells: u32) -> f64 {
        if cells > 0 {
            cells as f64 * self.movement_cost
        } else {
            self.hovering_cost
        }
    }

    /// Deduct the cost of moving `cells` cells (hovering when zero).
    ///
    /// The level is not floored at zero; `is_depleted` reports exhaustion.
    pub fn update(&mut self, cells: u32) {
        self.level -= self.calculate_travel_cost(cells);
    }

    /// Cells the remaining charge can still pay for
    pub fn estimate_range(&self) -> i64 {
        libm::floor(self.level / self.movement_cost) as i64
    }

    /// Whether the drone must head home now to keep the low-threshold reserve.
    pub fn needs_recharging(&self, distance_to_base: u32) -> bool {
        if distance_to_base == 0 {
            return false;
        }
        let usable = self.estimate_range() as f64 * (1.0 - self.low_threshold / 100.0);
        distance_to_base as f64 > usable
    }

    /// Add one round of charge, capped at capacity.
    ///
    /// Books exactly one charging event when the battery was not already
    /// full; returns whether any charge was added.
    pub fn recharge(&mut self, ledger: &mut dyn CostLedger) -> bool {
        if self.is_fully_charged() {
            return false;
        }
        self.level = (self.level + self.recharge_rate).min(self.capacity);
        ledger.register_charging_event();
        trace!("recharged to {:.1}/{:.1}", self.level, self.capacity);
        true
    }

    /// Whether the level has reached capacity
    pub fn is_fully_charged(&self) -> bool {
        self.level >= self.capacity
    }

    /// Whether no energy is left
    pub fn is_depleted(&self) -> bool {
        self.level <= 0.0
    }

    /// Level as a rounded percentage of capacity (0 for a zero capacity)
    pub fn current_charge_percentage(&self) -> u32 {
        if self.capacity <= 0.0 {
            return 0;
        }
        let percent = libm::round(self.level / self.capacity * 100.0);
        if percent <= 0.0 {
            0
        } else {
            percent as u32
        }
    }

    /// Whether the charge percentage is below `threshold` (defaults to the configured low threshold)
    pub fn is_low(&self, threshold: Option<f64>) -> bool {
        let threshold = threshold.unwrap_or(self.low_threshold);
        (self.current_charge_percentage() as f64) < threshold
    }
}

//! Round coordinator
//!
//! Owns every collaborator of a run and drives it round by round. A round
//! shuffles the whole population into a fresh random order and steps each
//! drone to completion before the next one starts; the order is the only
//! source of ordering effects and is fixed by the seed.
//!
//! # Example
//! ```ignore
//! use drone_swarm_sim::{Simulation, SwarmConfig};
//!
//! let mut sim = Simulation::new(SwarmConfig::test_config())?;
//! sim.world_mut().ignite((30, 30).into())?;
//! let rounds = sim.run();
//! println!("{} rounds, cost {}", rounds, sim.ledger().total_cost());
//! ```

use crate::config::SwarmConfig;
use crate::rng::SimRng;
use crate::swarm::{StepContext, Swarm};
use crate::telemetry::{CostBreakdown, CostTracker, DroneTelemetry, NullObserver, SwarmObserver, SwarmStats};
use crate::types::*;
use crate::world::{GridWorld, SpatialWorld};
use log::{debug, info};

/// A complete simulation run
pub struct Simulation<W: SpatialWorld = GridWorld, O: SwarmObserver = NullObserver> {
    config: SwarmConfig,
    world: W,
    swarm: Swarm,
    rng: SimRng,
    ledger: CostTracker,
    observer: O,
    round: u64,
    running: bool,
}

impl Simulation<GridWorld, NullObserver> {
    /// Build a run from config: a grid world with `initial_bases` random
    /// bases, each deploying `drones_per_base` drones
    pub fn new(config: SwarmConfig) -> Result<Self> {
        let world = GridWorld::new(config.simulation.width, config.simulation.height);
        let mut sim = Self::with_parts(config, world, NullObserver)?;
        for _ in 0..sim.config.simulation.initial_bases {
            sim.add_random_base()?;
        }
        Ok(sim)
    }
}

impl<W: SpatialWorld, O: SwarmObserver> Simulation<W, O> {
    /// Build a run around an existing world and observer, without bases
    pub fn with_parts(config: SwarmConfig, world: W, observer: O) -> Result<Self> {
        config.validate()?;
        if world.width() != config.simulation.width || world.height() != config.simulation.height {
            return Err(SwarmError::InvalidConfig(format!(
                "world is {}x{} but config asks for {}x{}",
                world.width(),
                world.height(),
                config.simulation.width,
                config.simulation.height
            )));
        }
        let rng = SimRng::from_seed(config.simulation.seed);
        let ledger = CostTracker::new(config.simulation.deployment_cost, config.simulation.charge_cost);
        Ok(Self {
            config,
            world,
            swarm: Swarm::new(),
            rng,
            ledger,
            observer,
            round: 0,
            running: true,
        })
    }

    /// Place a base at `pos` and deploy `drones_per_base` drones from it
    pub fn add_base(&mut self, pos: GridPos) -> Result<usize> {
        let count = self.config.simulation.drones_per_base;
        self.add_base_with(pos, count)
    }

    /// Place a base at `pos` and deploy `count` drones from it
    pub fn add_base_with(&mut self, pos: GridPos, count: usize) -> Result<usize> {
        let base = self.swarm.add_base(&self.world, pos)?;
        self.swarm.deploy(
            &mut self.world,
            &mut self.rng,
            &mut self.ledger,
            &self.config.drone,
            base,
            count,
        )?;
        info!("base {} at {} deployed {} drones", base, pos, count);
        Ok(base)
    }

    /// Place a base at a random spot: x in `[2, width - 2)`, y at the top,
    /// middle or bottom band
    pub fn add_random_base(&mut self) -> Result<usize> {
        let width = self.world.width() as i32;
        let height = self.world.height() as i32;
        let x = self.rng.range_i32(2, width - 2);
        let bands = [2, height / 2, height - 3];
        let y = self.rng.choice(&bands).copied().unwrap_or(height / 2);
        self.add_base(GridPos::new(x, y))
    }

    /// Execute one round; returns `false` once stopped or at `max_rounds`
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.round >= self.config.simulation.max_rounds {
            self.running = false;
            return false;
        }

        let mut order = self.swarm.ids();
        self.rng.shuffle(&mut order);

        let mut ctx = StepContext {
            world: &mut self.world,
            rng: &mut self.rng,
            ledger: &mut self.ledger,
            observer: &mut self.observer,
            round: self.round,
        };
        for id in order {
            self.swarm.step_drone(id, &mut ctx);
        }
        ctx.observer.on_round_end(self.round);

        debug!("round {} complete", self.round);
        self.round += 1;
        true
    }

    /// Run until `max_rounds` or until stopped; returns rounds executed
    pub fn run(&mut self) -> u64 {
        let start = self.round;
        info!(
            "running up to {} rounds with {} drones",
            self.config.simulation.max_rounds,
            self.swarm.len()
        );
        while self.step() {}
        let executed = self.round - start;
        info!("run finished after {} rounds, total cost {}", executed, self.ledger.total_cost());
        executed
    }

    /// Clear the running flag; the next `step` does nothing
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Set the running flag again
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Whether rounds are still being executed
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Rounds executed so far
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Run configuration
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// The world
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The world, mutably (e.g. to ignite cells)
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// The swarm arena
    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    /// The swarm arena, mutably
    pub fn swarm_mut(&mut self) -> &mut Swarm {
        &mut self.swarm
    }

    /// The observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Cost totals
    pub fn ledger(&self) -> &CostTracker {
        &self.ledger
    }

    /// Cost breakdown report
    pub fn cost_details(&self) -> CostBreakdown {
        self.ledger.cost_details()
    }

    /// Snapshot of every drone
    pub fn telemetry(&self) -> Vec<DroneTelemetry> {
        self.swarm.telemetry()
    }

    /// Swarm-wide aggregates
    pub fn stats(&self) -> SwarmStats {
        SwarmStats::from_telemetry(&self.swarm.telemetry())
    }

    /// Log one drone's transitions at debug level
    pub fn set_debug(&mut self, id: DroneId, debug: bool) -> Result<()> {
        self.swarm.get_mut(id)?.set_debug(debug);
        Ok(())
    }
}

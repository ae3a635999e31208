//! Shared scaffolding for integration tests

#![allow(dead_code)]

use drone_swarm_sim::control::DroneEvent;
use drone_swarm_sim::rng::SimRng;
use drone_swarm_sim::telemetry::{CostTracker, EventLog};
use drone_swarm_sim::*;

/// A hand-built swarm with every collaborator exposed
pub struct Harness {
    pub world: GridWorld,
    pub rng: SimRng,
    pub ledger: CostTracker,
    pub log: EventLog,
    pub swarm: Swarm,
    pub params: DroneConfig,
    pub base: usize,
    pub round: u64,
}

impl Harness {
    pub fn new(width: u32, height: u32, base: (i32, i32)) -> Self {
        Self::with_params(width, height, base, DroneConfig::default())
    }

    pub fn with_params(width: u32, height: u32, base: (i32, i32), params: DroneConfig) -> Self {
        let world = GridWorld::new(width, height);
        let mut swarm = Swarm::new();
        let base = swarm.add_base(&world, base.into()).unwrap();
        Self {
            world,
            rng: SimRng::seeded(17),
            ledger: CostTracker::new(10.0, 5.0),
            log: EventLog::new(),
            swarm,
            params,
            base,
            round: 0,
        }
    }

    pub fn spawn(&mut self, role: Role, x: i32, y: i32) -> DroneId {
        self.swarm
            .spawn_at(&mut self.world, &self.params, self.base, role, GridPos::new(x, y))
            .unwrap()
    }

    pub fn drone(&self, id: DroneId) -> &Drone {
        self.swarm.get(id).unwrap()
    }

    pub fn drone_mut(&mut self, id: DroneId) -> &mut Drone {
        self.swarm.get_mut(id).unwrap()
    }

    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut Swarm, &mut StepContext<'_>) -> R) -> R {
        let mut ctx = StepContext {
            world: &mut self.world,
            rng: &mut self.rng,
            ledger: &mut self.ledger,
            observer: &mut self.log,
            round: self.round,
        };
        f(&mut self.swarm, &mut ctx)
    }

    pub fn step(&mut self, id: DroneId) {
        self.with_ctx(|swarm, ctx| swarm.step_drone(id, ctx));
    }

    pub fn refresh(&mut self, id: DroneId) {
        self.with_ctx(|swarm, ctx| swarm.refresh_knowledge(id, ctx));
    }

    pub fn update_network(&mut self, id: DroneId) {
        self.with_ctx(|swarm, ctx| swarm.update_network(id, ctx));
    }

    pub fn decide(&mut self, id: DroneId) -> DroneEvent {
        self.with_ctx(|swarm, ctx| swarm.decide_event(id, ctx))
    }

    pub fn dispatch(&mut self, id: DroneId, event: DroneEvent) {
        self.with_ctx(|swarm, ctx| swarm.dispatch(id, event, ctx));
    }

    pub fn broadcast(&mut self, id: DroneId) {
        self.with_ctx(|swarm, ctx| swarm.broadcast(id, ctx));
    }

    pub fn mailbox(&self, id: DroneId) -> usize {
        self.drone(id).knowledge().mailbox_len()
    }

    pub fn distance(&self, a: DroneId, b: DroneId) -> u32 {
        self.drone(a).position().chebyshev_distance(&self.drone(b).position())
    }
}

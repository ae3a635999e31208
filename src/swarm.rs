//! Drone agents and the swarm arena
//!
//! Drones live in a single arena indexed by [`DroneId`]; links between them
//! are id pairs inside each drone's own network graph, never references.
//! One call to [`Swarm::step_drone`] runs the full per-round cycle of one
//! drone:
//!
//! 1. monitor: refresh surroundings, drain the mailbox, look for fires
//! 2. network: send registrations/deregistrations for its role
//! 3. decide: pick this round's single event (leader election on deploy)
//! 4. act: feed the state machine and run the entry action
//! 5. broadcast: flush the outgoing buffer to valid recipients
//!
//! Later drones in a round see the already-mutated state of earlier ones.

use crate::base::DroneBase;
use crate::battery::Battery;
use crate::config::DroneConfig;
use crate::control::navigation::{next_cell, random_direction};
use crate::control::{
    change_target, decide, formation_move, next_state, role_switch_event, DecisionInputs,
    DroneEvent, DroneState, EntryAction, FormationMove, GuardInputs,
};
use crate::knowledge::{Knowledge, Sighting};
use crate::network::comm::reports_to_base;
use crate::network::{
    elect_role, leader_score, link_pair, plan_network, unlink_pair, valid_recipients, LocalView,
    Message, MessageKind, Outbox, PeerDirectory,
};
use crate::rng::SimRng;
use crate::telemetry::{CostLedger, DroneTelemetry, SwarmObserver};
use crate::types::*;
use crate::world::SpatialWorld;
use log::{debug, trace, warn};

/// Collaborators borrowed for one drone step
pub struct StepContext<'a> {
    /// Spatial index
    pub world: &'a mut dyn SpatialWorld,
    /// Shared random source
    pub rng: &'a mut SimRng,
    /// Cost accounting sink
    pub ledger: &'a mut dyn CostLedger,
    /// Behavior event sink
    pub observer: &'a mut dyn SwarmObserver,
    /// Current round index
    pub round: u64,
}

/// One drone agent
#[derive(Debug, Clone)]
pub struct Drone {
    id: DroneId,
    pos: GridPos,
    role: Role,
    params: DroneConfig,
    desired_distance: u32,
    state: DroneState,
    battery: Battery,
    knowledge: Knowledge,
    outbox: Outbox,
    target: Option<GridPos>,
    base: usize,
    debug: bool,
}

impl Drone {
    fn new(id: DroneId, pos: GridPos, role: Role, params: DroneConfig, base: usize, base_pos: GridPos) -> Self {
        Self {
            id,
            pos,
            role,
            desired_distance: params.desired_distance(),
            state: DroneState::Idle,
            battery: Battery::from_config(&params),
            knowledge: Knowledge::new(id, base_pos, params.follower_capacity()),
            outbox: Outbox::new(),
            target: None,
            base,
            debug: false,
            params,
        }
    }

    /// Drone id
    pub fn id(&self) -> DroneId {
        self.id
    }

    /// Current cell
    pub fn position(&self) -> GridPos {
        self.pos
    }

    /// Current role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Override the role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Current state machine state
    pub fn state(&self) -> DroneState {
        self.state
    }

    /// Parameters the drone was created with
    pub fn params(&self) -> &DroneConfig {
        &self.params
    }

    /// Station-keeping distance
    pub fn desired_distance(&self) -> u32 {
        self.desired_distance
    }

    /// Battery
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Mutable battery
    pub fn battery_mut(&mut self) -> &mut Battery {
        &mut self.battery
    }

    /// Local knowledge
    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    /// Mutable local knowledge
    pub fn knowledge_mut(&mut self) -> &mut Knowledge {
        &mut self.knowledge
    }

    /// Outgoing buffer
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Last navigation target
    pub fn target(&self) -> Option<GridPos> {
        self.target
    }

    /// Index of the home base
    pub fn base_index(&self) -> usize {
        self.base
    }

    /// Whether transitions are logged at debug level
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Log this drone's transitions at debug level
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Whether the drone keeps its desired distance to the closest leader
    pub fn is_in_formation(&self) -> bool {
        self.knowledge.is_in_formation(self.desired_distance)
    }

    /// Standing on the home base cell
    pub fn is_at_base(&self) -> bool {
        self.pos == self.knowledge.base_pos()
    }

    /// Chebyshev distance to the home base
    pub fn distance_to_base(&self) -> u32 {
        self.pos.chebyshev_distance(&self.knowledge.base_pos())
    }

    /// Read-only snapshot for visualization
    pub fn telemetry(&self) -> DroneTelemetry {
        DroneTelemetry {
            id: self.id,
            position: self.pos,
            role: self.role,
            state: self.state.as_str(),
            battery_percent: self.battery.current_charge_percentage(),
            links: self.knowledge.network.links().collect(),
        }
    }
}

/// Arena of all drones and bases
#[derive(Debug, Clone, Default)]
pub struct Swarm {
    drones: Vec<Drone>,
    bases: Vec<DroneBase>,
}

impl Swarm {
    /// Create an empty swarm
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drones
    pub fn len(&self) -> usize {
        self.drones.len()
    }

    /// Whether there are no drones
    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// All drone ids, in creation order
    pub fn ids(&self) -> Vec<DroneId> {
        self.drones.iter().map(|d| d.id).collect()
    }

    /// All drones
    pub fn drones(&self) -> impl Iterator<Item = &Drone> {
        self.drones.iter()
    }

    /// All bases
    pub fn bases(&self) -> &[DroneBase] {
        &self.bases
    }

    /// Look up a drone
    pub fn get(&self, id: DroneId) -> Result<&Drone> {
        self.drones.get(id.index()).ok_or(SwarmError::InvalidDroneId(id))
    }

    /// Look up a drone mutably
    pub fn get_mut(&mut self, id: DroneId) -> Result<&mut Drone> {
        self.drones.get_mut(id.index()).ok_or(SwarmError::InvalidDroneId(id))
    }

    /// Snapshot of every drone
    pub fn telemetry(&self) -> Vec<DroneTelemetry> {
        self.drones.iter().map(Drone::telemetry).collect()
    }

    /// Add a base station at `pos`
    pub fn add_base(&mut self, world: &dyn SpatialWorld, pos: GridPos) -> Result<usize> {
        if world.out_of_bounds(pos) {
            return Err(SwarmError::OutOfBounds(pos));
        }
        let index = self.bases.len();
        self.bases.push(DroneBase::new(index, pos));
        debug!("base {} placed at {}", index, pos);
        Ok(index)
    }

    /// Create one drone on its base cell with a fixed role
    pub fn spawn(
        &mut self,
        world: &mut dyn SpatialWorld,
        params: &DroneConfig,
        base: usize,
        role: Role,
    ) -> Result<DroneId> {
        let base_pos = self
            .bases
            .get(base)
            .map(DroneBase::pos)
            .ok_or_else(|| SwarmError::InvalidConfig(format!("unknown base {base}")))?;
        self.spawn_at(world, params, base, role, base_pos)
    }

    /// Create one drone at an arbitrary cell, homed at `base`
    pub fn spawn_at(
        &mut self,
        world: &mut dyn SpatialWorld,
        params: &DroneConfig,
        base: usize,
        role: Role,
        pos: GridPos,
    ) -> Result<DroneId> {
        let base_pos = self
            .bases
            .get(base)
            .map(DroneBase::pos)
            .ok_or_else(|| SwarmError::InvalidConfig(format!("unknown base {base}")))?;
        let id = DroneId::new(self.drones.len() as u32);
        world.place_agent(id, pos)?;
        self.drones.push(Drone::new(id, pos, role, params.clone(), base, base_pos));
        self.bases[base].register_drone(id);
        trace!("{} spawned at {} as {}", id, pos, role);
        Ok(id)
    }

    /// Deploy `count` drones from `base`, drawing roles by the leader ratio
    pub fn deploy(
        &mut self,
        world: &mut dyn SpatialWorld,
        rng: &mut SimRng,
        ledger: &mut dyn CostLedger,
        params: &DroneConfig,
        base: usize,
        count: usize,
    ) -> Result<Vec<DroneId>> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let role = if rng.weighted_bool(params.leader_ratio) {
                Role::Leader
            } else {
                Role::Scout
            };
            ids.push(self.spawn(world, params, base, role)?);
        }
        ledger.register_drone_deployment(count);
        debug!("base {} deployed {} drones", base, count);
        Ok(ids)
    }

    pub(crate) fn drone(&self, id: DroneId) -> &Drone {
        &self.drones[id.index()]
    }

    pub(crate) fn drone_mut(&mut self, id: DroneId) -> &mut Drone {
        &mut self.drones[id.index()]
    }

    fn pair_mut(&mut self, a: DroneId, b: DroneId) -> (&mut Drone, &mut Drone) {
        assert_ne!(a, b, "drone {a} cannot pair with itself");
        let (i, j) = (a.index(), b.index());
        if i < j {
            let (left, right) = self.drones.split_at_mut(j);
            (&mut left[i], &mut right[0])
        } else {
            let (left, right) = self.drones.split_at_mut(i);
            (&mut right[0], &mut left[j])
        }
    }

    /// Run one full step of drone `id`
    pub fn step_drone(&mut self, id: DroneId, ctx: &mut StepContext<'_>) {
        self.refresh_knowledge(id, ctx);
        self.update_network(id, ctx);
        let event = self.decide_event(id, ctx);
        self.dispatch(id, event, ctx);
        self.broadcast(id, ctx);
    }

    /// Monitor phase: surroundings, mailbox and fire sensing
    pub fn refresh_knowledge(&mut self, id: DroneId, ctx: &mut StepContext<'_>) {
        let (pos, range, vision) = {
            let drone = self.drone(id);
            (drone.pos, drone.params.communication_range, drone.params.vision_range)
        };

        let seen: Vec<Sighting> = ctx
            .world
            .get_neighbors(pos, range, true)
            .into_iter()
            .filter(|other| *other != id)
            .filter_map(|other| {
                self.drones.get(other.index()).map(|d| Sighting {
                    drone: other,
                    pos: d.pos,
                    role: d.role,
                })
            })
            .collect();

        let control = {
            let knowledge = &mut self.drone_mut(id).knowledge;
            knowledge.refresh_surroundings(pos, &seen);
            knowledge.drain_mailbox()
        };
        for message in control {
            self.apply_link_message(id, &message);
        }

        let round = ctx.round;
        let drone = self.drone_mut(id);
        for fire in ctx.world.burning_cells_within(pos, vision) {
            if drone.knowledge.record_fire(fire) {
                debug!("{} spotted fire at {}", id, fire);
                drone.outbox.queue(Message::fire_alert(id, fire, round, pos));
            }
        }
    }

    fn apply_link_message(&mut self, receiver: DroneId, message: &Message) {
        let sender = message.sender;
        if sender.index() >= self.drones.len() {
            warn!("{} dropped {:?} from unknown sender {}", receiver, message.kind, sender);
            return;
        }
        let (r, s) = self.pair_mut(receiver, sender);
        match message.kind {
            MessageKind::Registration => {
                if link_pair(&mut r.knowledge.network, r.role, &mut s.knowledge.network, s.role) {
                    trace!("{} linked with {}", receiver, sender);
                }
            }
            MessageKind::Deregistration => {
                if unlink_pair(&mut r.knowledge.network, &mut s.knowledge.network) {
                    trace!("{} unlinked from {}", receiver, sender);
                }
            }
            MessageKind::FireAlert => {}
        }
    }

    /// Network phase: role-specific link maintenance
    pub fn update_network(&mut self, id: DroneId, ctx: &mut StepContext<'_>) {
        let drone = self.drone(id);
        let pos = drone.pos;
        let view = LocalView {
            id,
            pos,
            knowledge: &drone.knowledge,
            params: &drone.params,
            desired_distance: drone.desired_distance,
        };
        let directives = plan_network(drone.role, &view, &*self);

        for directive in directives {
            let message = Message::control(directive.kind, id, ctx.round, pos);
            self.drone_mut(directive.target).knowledge.deliver(message);
        }
    }

    /// `battery + |neighbours| − 2 × |neighbouring leaders|` of drone `id`
    pub fn leader_score(&self, id: DroneId) -> f64 {
        let drone = self.drone(id);
        let neighbours = drone.knowledge.neighbours();
        let leaders = neighbours.iter().filter(|n| self.drone(**n).role.is_leader()).count();
        leader_score(drone.battery.level(), neighbours.len(), leaders)
    }

    /// Decision phase: the single event for this round
    pub fn decide_event(&mut self, id: DroneId, ctx: &mut StepContext<'_>) -> DroneEvent {
        let drone = self.drone(id);
        let inputs = DecisionInputs {
            state: drone.state,
            role: drone.role,
            needs_recharging: drone.battery.needs_recharging(drone.distance_to_base()),
            fires_known: !drone.knowledge.reported_fires().is_empty(),
        };
        let event = decide(&inputs);
        if event != DroneEvent::Deploy || !matches!(drone.role, Role::Leader | Role::Scout) {
            return event;
        }

        let old_role = drone.role;
        let scores: Vec<f64> = drone
            .knowledge
            .neighbours()
            .iter()
            .map(|n| self.leader_score(*n))
            .collect();
        let new_role = elect_role(old_role, self.leader_score(id), &scores);
        if new_role == old_role {
            return event;
        }

        self.drone_mut(id).role = new_role;
        debug!("{} changed role {} -> {}", id, old_role, new_role);
        ctx.observer.on_role_change(id, old_role, new_role);
        role_switch_event(inputs.state, old_role, new_role).unwrap_or(event)
    }

    /// Act phase: take the transition and run its entry action
    pub fn dispatch(&mut self, id: DroneId, event: DroneEvent, ctx: &mut StepContext<'_>) {
        let drone = self.drone(id);
        let inputs = GuardInputs {
            crowded: drone.knowledge.is_crowded(),
            role: drone.role,
            in_formation: drone.is_in_formation(),
            at_base: drone.is_at_base(),
            fully_charged: drone.battery.is_fully_charged(),
        };
        let from = drone.state;
        let Some(to) = next_state(from, event, &inputs) else {
            trace!("{} ignores {} in {}", id, event, from);
            return;
        };

        let drone = self.drone_mut(id);
        drone.state = to;
        if drone.debug {
            debug!("{} {} --{}--> {}", id, from, event, to);
        } else {
            trace!("{} {} --{}--> {}", id, from, event, to);
        }
        ctx.observer.on_transition(id, from, event, to);
        self.run_entry_action(id, to.entry_action(), ctx);
    }

    fn run_entry_action(&mut self, id: DroneId, action: EntryAction, ctx: &mut StepContext<'_>) {
        let drone = self.drone(id);
        let pos = drone.pos;
        let base = drone.knowledge.base_pos();
        match action {
            EntryAction::None => {}
            EntryAction::Disperse => {
                let target = random_direction(&*ctx.world, ctx.rng, pos, false);
                self.head_for(id, target, ctx);
            }
            EntryAction::RandomWalk => {
                let target = random_direction(&*ctx.world, ctx.rng, pos, true);
                self.head_for(id, target, ctx);
            }
            EntryAction::Formation => {
                let reference = drone.knowledge.closest_leader().or(drone.knowledge.closest_neighbour());
                match formation_move(pos, reference, drone.desired_distance) {
                    FormationMove::Wander => {
                        let target = random_direction(&*ctx.world, ctx.rng, pos, true);
                        self.head_for(id, target, ctx);
                    }
                    FormationMove::Hold => self.drone_mut(id).battery.update(0),
                    FormationMove::Nudge(target) => self.head_for(id, target, ctx),
                }
            }
            EntryAction::Hover => self.drone_mut(id).battery.update(0),
            EntryAction::MoveToBase => self.move_towards(id, base, ctx),
            EntryAction::Recharge => {
                self.drone_mut(id).battery.recharge(ctx.ledger);
            }
        }
    }

    fn head_for(&mut self, id: DroneId, target: GridPos, ctx: &mut StepContext<'_>) {
        let base = self.drone(id).knowledge.base_pos();
        let target = change_target(&*ctx.world, target, base);
        self.drone_mut(id).target = Some(target);
        self.move_towards(id, target, ctx);
    }

    /// Advance at most one cell per axis towards `target` and pay for the
    /// cells actually moved (hovering cost when stationary)
    pub fn move_towards(&mut self, id: DroneId, target: GridPos, ctx: &mut StepContext<'_>) {
        let drone = self.drone_mut(id);
        let next = next_cell(&*ctx.world, drone.pos, target);
        let moved = drone.pos.chebyshev_distance(&next);
        drone.pos = next;
        drone.battery.update(moved);
        ctx.world.move_agent(id, next);
    }

    /// Broadcast phase: deliver queued messages and clear the buffer
    pub fn broadcast(&mut self, id: DroneId, ctx: &mut StepContext<'_>) {
        let drone = self.drone_mut(id);
        let messages = drone.outbox.take();
        if messages.is_empty() {
            return;
        }

        let pos = drone.pos;
        let role = drone.role;
        let range = drone.params.communication_range;
        let base = drone.base;
        let recipients = valid_recipients(role, &drone.knowledge.network, drone.knowledge.drones_in_range());
        let base_reached = reports_to_base(role)
            && self
                .bases
                .get(base)
                .map_or(false, |b| b.pos().chebyshev_distance(&pos) <= range);

        for mut message in messages.iter().copied() {
            message.stamp(ctx.round, pos);
            for recipient in &recipients {
                self.drone_mut(*recipient).knowledge.deliver(message);
            }
            if base_reached {
                self.bases[base].receive(&message);
            }
        }

        let reached = recipients.len() + usize::from(base_reached);
        self.drone_mut(id).outbox.record_delivery(messages.len(), reached);
        ctx.observer.on_broadcast(id, messages.len(), reached);
        debug!("{} broadcast {} messages to {} recipients", id, messages.len(), reached);
    }
}

impl PeerDirectory for Swarm {
    fn role_of(&self, id: DroneId) -> Role {
        self.drone(id).role
    }

    fn position_of(&self, id: DroneId) -> GridPos {
        self.drone(id).pos
    }

    fn leader_of(&self, id: DroneId) -> Option<DroneId> {
        self.drone(id).knowledge.network.leader()
    }

    fn followers_of(&self, id: DroneId) -> Vec<DroneId> {
        self.drone(id).knowledge.network.followers()
    }

    fn is_in_formation(&self, id: DroneId) -> bool {
        self.drone(id).is_in_formation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{CostTracker, EventLog};
    use crate::world::GridWorld;

    struct Harness {
        world: GridWorld,
        rng: SimRng,
        ledger: CostTracker,
        log: EventLog,
        swarm: Swarm,
        base: usize,
    }

    impl Harness {
        fn new(base: GridPos) -> Self {
            let world = GridWorld::new(100, 100);
            let mut swarm = Swarm::new();
            let base = swarm.add_base(&world, base).unwrap();
            Self {
                world,
                rng: SimRng::seeded(1),
                ledger: CostTracker::new(10.0, 5.0),
                log: EventLog::new(),
                swarm,
                base,
            }
        }

        fn spawn(&mut self, role: Role, x: i32, y: i32) -> DroneId {
            self.swarm
                .spawn_at(&mut self.world, &DroneConfig::default(), self.base, role, GridPos::new(x, y))
                .unwrap()
        }

        fn step(&mut self, id: DroneId) {
            let mut ctx = StepContext {
                world: &mut self.world,
                rng: &mut self.rng,
                ledger: &mut self.ledger,
                observer: &mut self.log,
                round: 0,
            };
            self.swarm.step_drone(id, &mut ctx);
        }
    }

    #[test]
    fn test_get_unknown_drone() {
        let swarm = Swarm::new();
        assert_eq!(swarm.get(DroneId::new(4)).unwrap_err(), SwarmError::InvalidDroneId(DroneId::new(4)));
    }

    #[test]
    fn test_spawn_requires_known_base() {
        let mut world = GridWorld::new(10, 10);
        let mut swarm = Swarm::new();
        let err = swarm.spawn(&mut world, &DroneConfig::default(), 0, Role::Scout).unwrap_err();
        assert!(matches!(err, SwarmError::InvalidConfig(_)));
    }

    #[test]
    fn test_add_base_out_of_bounds() {
        let world = GridWorld::new(10, 10);
        let mut swarm = Swarm::new();
        assert!(swarm.add_base(&world, GridPos::new(10, 3)).is_err());
    }

    #[test]
    fn test_deploy_books_cost_and_places_at_base() {
        let mut h = Harness::new(GridPos::new(20, 20));
        let ids = h
            .swarm
            .deploy(&mut h.world, &mut h.rng, &mut h.ledger, &DroneConfig::default(), h.base, 4)
            .unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(h.ledger.drone_deployments(), 4);
        assert_eq!(h.world.agents_at(GridPos::new(20, 20)).len(), 4);
        assert_eq!(h.swarm.bases()[0].drones().len(), 4);
    }

    #[test]
    fn test_crowded_idle_drones_disperse() {
        let mut h = Harness::new(GridPos::new(50, 50));
        let a = h.spawn(Role::Scout, 50, 50);
        let _b = h.spawn(Role::Scout, 50, 50);
        h.step(a);

        let drone = h.swarm.get(a).unwrap();
        assert_eq!(drone.state(), DroneState::Dispersing);
        assert_eq!(drone.position().chebyshev_distance(&GridPos::new(50, 50)), 1);
        assert_eq!(drone.battery().level(), 99.0);
    }

    #[test]
    fn test_lone_leader_hovers_once_in_formation() {
        let mut h = Harness::new(GridPos::new(10, 10));
        let leader = h.spawn(Role::Leader, 50, 50);
        h.step(leader);
        assert_eq!(h.swarm.get(leader).unwrap().state(), DroneState::Formation);
        let settled = h.swarm.get(leader).unwrap().position();
        assert!(settled.chebyshev_distance(&GridPos::new(50, 50)) <= 1);

        h.step(leader);
        assert_eq!(h.swarm.get(leader).unwrap().state(), DroneState::HoveringLeader);
        let level = h.swarm.get(leader).unwrap().battery().level();
        h.step(leader);
        let drone = h.swarm.get(leader).unwrap();
        assert_eq!(drone.state(), DroneState::HoveringLeader);
        assert_eq!(drone.position(), settled);
        assert_eq!(drone.battery().level(), level - 0.5);
    }

    #[test]
    fn test_broadcast_reaches_followers_and_base() {
        let mut h = Harness::new(GridPos::new(45, 45));
        let leader = h.spawn(Role::Leader, 50, 50);
        let follower = h.spawn(Role::Scout, 52, 50);
        let stranger = h.spawn(Role::Scout, 49, 52);
        {
            let (l, f) = h.swarm.pair_mut(leader, follower);
            assert!(link_pair(&mut l.knowledge.network, Role::Leader, &mut f.knowledge.network, Role::Scout));
        }
        h.world.ignite(GridPos::new(53, 53)).unwrap();

        let mut ctx = StepContext {
            world: &mut h.world,
            rng: &mut h.rng,
            ledger: &mut h.ledger,
            observer: &mut h.log,
            round: 3,
        };
        h.swarm.refresh_knowledge(leader, &mut ctx);
        assert_eq!(h.swarm.get(leader).unwrap().outbox().pending().len(), 1);
        h.swarm.broadcast(leader, &mut ctx);

        assert!(h.swarm.get(leader).unwrap().outbox().is_empty());
        assert_eq!(h.swarm.get(follower).unwrap().knowledge().mailbox_len(), 1);
        assert_eq!(h.swarm.get(stranger).unwrap().knowledge().mailbox_len(), 0);
        assert!(h.swarm.bases()[0].reported_fires().contains(&GridPos::new(53, 53)));
        assert_eq!(h.log.broadcasts, vec![(leader, 1, 2)]);
    }

    #[test]
    fn test_registration_applied_on_drain() {
        let mut h = Harness::new(GridPos::new(10, 10));
        let leader = h.spawn(Role::Leader, 50, 50);
        let scout = h.spawn(Role::Scout, 53, 50);

        // the scout sees a lone leader in formation and registers
        h.step(scout);
        assert_eq!(h.swarm.get(leader).unwrap().knowledge().mailbox_len(), 1);

        let mut ctx = StepContext {
            world: &mut h.world,
            rng: &mut h.rng,
            ledger: &mut h.ledger,
            observer: &mut h.log,
            round: 1,
        };
        h.swarm.refresh_knowledge(leader, &mut ctx);
        assert_eq!(h.swarm.get(leader).unwrap().knowledge().network.followers(), vec![scout]);
        assert_eq!(h.swarm.get(scout).unwrap().knowledge().network.leader(), Some(leader));
    }
}

//! Local world view of a single drone
//!
//! Everything a drone decides on comes from here: who is in radio range,
//! which neighbour and which leader are closest, the fires it has heard of
//! and its own network graph. Surroundings are rebuilt every round; the set
//! of reported fires only ever grows.

use crate::network::{Message, MessageKind, NetworkGraph};
use crate::types::*;
use log::trace;
use std::collections::{BTreeSet, VecDeque};

/// Closest drone of some category, captured at refresh time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closest {
    /// Drone id
    pub drone: DroneId,
    /// Its position when the view was refreshed
    pub pos: GridPos,
    /// Chebyshev distance at refresh time
    pub distance: u32,
}

/// Another drone seen by the range query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sighting {
    /// Drone id
    pub drone: DroneId,
    /// Current position
    pub pos: GridPos,
    /// Current role
    pub role: Role,
}

/// Knowledge store owned by one drone
#[derive(Debug, Clone)]
pub struct Knowledge {
    owner: DroneId,
    base_pos: GridPos,
    drones_in_range: Vec<DroneId>,
    same_cell: Vec<DroneId>,
    neighbours: Vec<DroneId>,
    closest_neighbour: Option<Closest>,
    closest_leader: Option<Closest>,
    reported_fires: BTreeSet<GridPos>,
    mailbox: VecDeque<Message>,
    /// Typed links of the owner
    pub network: NetworkGraph,
}

impl Knowledge {
    /// Empty knowledge for a drone deployed from `base_pos`
    pub fn new(owner: DroneId, base_pos: GridPos, follower_capacity: usize) -> Self {
        Self {
            owner,
            base_pos,
            drones_in_range: Vec::new(),
            same_cell: Vec::new(),
            neighbours: Vec::new(),
            closest_neighbour: None,
            closest_leader: None,
            reported_fires: BTreeSet::new(),
            mailbox: VecDeque::new(),
            network: NetworkGraph::new(owner, follower_capacity),
        }
    }

    /// Home base position
    pub fn base_pos(&self) -> GridPos {
        self.base_pos
    }

    /// Every other drone within radio range, same cell included
    pub fn drones_in_range(&self) -> &[DroneId] {
        &self.drones_in_range
    }

    /// Other drones sharing the owner's cell
    pub fn same_cell(&self) -> &[DroneId] {
        &self.same_cell
    }

    /// Other drones within range in a different cell
    pub fn neighbours(&self) -> &[DroneId] {
        &self.neighbours
    }

    /// Closest neighbour of any role
    pub fn closest_neighbour(&self) -> Option<Closest> {
        self.closest_neighbour
    }

    /// Closest leader among the neighbours
    pub fn closest_leader(&self) -> Option<Closest> {
        self.closest_leader
    }

    /// Distance to the closest leader, `None` without one
    pub fn distance_to_closest_leader(&self) -> Option<u32> {
        self.closest_leader.map(|c| c.distance)
    }

    /// At least one other drone shares the owner's cell
    pub fn is_crowded(&self) -> bool {
        !self.same_cell.is_empty()
    }

    /// Station-keeping check against the closest leader; vacuously true without one
    pub fn is_in_formation(&self, desired_distance: u32) -> bool {
        match self.distance_to_closest_leader() {
            Some(d) => d == desired_distance,
            None => true,
        }
    }

    /// Fires heard of so far
    pub fn reported_fires(&self) -> &BTreeSet<GridPos> {
        &self.reported_fires
    }

    /// Remember a fire; returns whether it was new
    pub fn record_fire(&mut self, fire: GridPos) -> bool {
        self.reported_fires.insert(fire)
    }

    /// Append a message to the mailbox
    pub fn deliver(&mut self, message: Message) {
        self.mailbox.push_back(message);
    }

    /// Messages waiting in the mailbox
    pub fn mailbox_len(&self) -> usize {
        self.mailbox.len()
    }

    /// Rebuild the surroundings from a range query around `pos`.
    ///
    /// The owner itself is skipped if present. Ties for closest keep the
    /// first drone in query order.
    pub fn refresh_surroundings(&mut self, pos: GridPos, seen: &[Sighting]) {
        self.drones_in_range.clear();
        self.same_cell.clear();
        self.neighbours.clear();
        self.closest_neighbour = None;
        self.closest_leader = None;

        for sighting in seen.iter().filter(|s| s.drone != self.owner) {
            self.drones_in_range.push(sighting.drone);
            if sighting.pos == pos {
                self.same_cell.push(sighting.drone);
                continue;
            }
            self.neighbours.push(sighting.drone);

            let candidate = Closest {
                drone: sighting.drone,
                pos: sighting.pos,
                distance: pos.chebyshev_distance(&sighting.pos),
            };
            if self.closest_neighbour.map_or(true, |c| candidate.distance < c.distance) {
                self.closest_neighbour = Some(candidate);
            }
            if sighting.role.is_leader()
                && self.closest_leader.map_or(true, |c| candidate.distance < c.distance)
            {
                self.closest_leader = Some(candidate);
            }
        }
    }

    /// Drain the mailbox, folding fire alerts into `reported_fires`.
    ///
    /// Link control messages are returned in arrival order; they touch the
    /// sender's graph too and are applied by the swarm.
    pub fn drain_mailbox(&mut self) -> Vec<Message> {
        let mut control = Vec::new();
        while let Some(message) = self.mailbox.pop_front() {
            match message.kind {
                MessageKind::FireAlert => {
                    if let Some(fire) = message.content {
                        if self.record_fire(fire) {
                            trace!("{} learned of fire at {} from {}", self.owner, fire, message.sender);
                        }
                    }
                }
                MessageKind::Registration | MessageKind::Deregistration => control.push(message),
            }
        }
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(id: u32, x: i32, y: i32, role: Role) -> Sighting {
        Sighting {
            drone: DroneId::new(id),
            pos: GridPos::new(x, y),
            role,
        }
    }

    fn knowledge() -> Knowledge {
        Knowledge::new(DroneId::new(0), GridPos::new(0, 0), 10)
    }

    #[test]
    fn test_partition_and_closest() {
        let mut k = knowledge();
        let pos = GridPos::new(10, 10);
        let seen = [
            sighting(0, 10, 10, Role::Scout),
            sighting(1, 10, 10, Role::Scout),
            sighting(2, 13, 10, Role::Leader),
            sighting(3, 12, 11, Role::Scout),
            sighting(4, 8, 8, Role::Leader),
        ];
        k.refresh_surroundings(pos, &seen);

        assert_eq!(k.same_cell(), &[DroneId::new(1)]);
        assert_eq!(k.neighbours(), &[DroneId::new(2), DroneId::new(3), DroneId::new(4)]);
        assert_eq!(k.drones_in_range().len(), 4);
        assert!(k.is_crowded());

        // 3 and 4 tie at distance 2; query order wins
        let closest = k.closest_neighbour().unwrap();
        assert_eq!(closest.drone, DroneId::new(3));
        assert_eq!(closest.distance, 2);

        let leader = k.closest_leader().unwrap();
        assert_eq!(leader.drone, DroneId::new(4));
        assert_eq!(k.distance_to_closest_leader(), Some(2));
    }

    #[test]
    fn test_refresh_resets_view() {
        let mut k = knowledge();
        k.refresh_surroundings(GridPos::new(5, 5), &[sighting(1, 6, 6, Role::Leader)]);
        assert!(k.closest_leader().is_some());

        k.refresh_surroundings(GridPos::new(5, 5), &[]);
        assert!(k.closest_leader().is_none());
        assert!(k.closest_neighbour().is_none());
        assert!(k.neighbours().is_empty());
    }

    #[test]
    fn test_in_formation() {
        let mut k = knowledge();
        assert!(k.is_in_formation(9));

        k.refresh_surroundings(GridPos::new(20, 20), &[sighting(1, 29, 22, Role::Leader)]);
        assert!(k.is_in_formation(9));
        assert!(!k.is_in_formation(8));
    }

    #[test]
    fn test_drain_mailbox() {
        let mut k = knowledge();
        let sender = DroneId::new(5);
        k.deliver(Message::fire_alert(sender, GridPos::new(3, 4), 0, GridPos::new(1, 1)));
        k.deliver(Message::registration(sender, 0, GridPos::new(1, 1)));
        k.deliver(Message::fire_alert(sender, GridPos::new(3, 4), 1, GridPos::new(1, 1)));
        assert_eq!(k.mailbox_len(), 3);

        let control = k.drain_mailbox();
        assert_eq!(control.len(), 1);
        assert_eq!(control[0].kind, MessageKind::Registration);
        assert_eq!(k.mailbox_len(), 0);
        assert_eq!(k.reported_fires().len(), 1);
        assert!(k.reported_fires().contains(&GridPos::new(3, 4)));
    }
}

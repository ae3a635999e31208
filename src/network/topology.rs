//! Decentralized leader/follower/peer network formation
//!
//! Each round a drone inspects its own knowledge plus what it can observe of
//! the drones around it, and decides which registrations and deregistrations
//! to send. Nothing here mutates state: the returned [`Directive`]s are
//! delivered straight into the targets' mailboxes and take effect when those
//! mailboxes are drained.

use super::message::MessageKind;
use crate::config::DroneConfig;
use crate::knowledge::Knowledge;
use crate::types::*;
use log::trace;

/// What a drone can observe about other drones
pub trait PeerDirectory {
    /// Current role of `id`
    fn role_of(&self, id: DroneId) -> Role;
    /// Current position of `id`
    fn position_of(&self, id: DroneId) -> GridPos;
    /// Leader in `id`'s own network view
    fn leader_of(&self, id: DroneId) -> Option<DroneId>;
    /// Followers in `id`'s own network view
    fn followers_of(&self, id: DroneId) -> Vec<DroneId>;
    /// Whether `id` currently keeps formation
    fn is_in_formation(&self, id: DroneId) -> bool;
}

/// One control message to send directly to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    /// Registration or deregistration
    pub kind: MessageKind,
    /// Receiving drone
    pub target: DroneId,
}

impl Directive {
    /// Register with `target`
    pub const fn register(target: DroneId) -> Self {
        Self {
            kind: MessageKind::Registration,
            target,
        }
    }

    /// Deregister from `target`
    pub const fn deregister(target: DroneId) -> Self {
        Self {
            kind: MessageKind::Deregistration,
            target,
        }
    }
}

/// Planning input borrowed from the acting drone
#[derive(Debug, Clone, Copy)]
pub struct LocalView<'a> {
    /// Acting drone
    pub id: DroneId,
    /// Its position
    pub pos: GridPos,
    /// Its knowledge (refreshed this round)
    pub knowledge: &'a Knowledge,
    /// Its parameters
    pub params: &'a DroneConfig,
    /// Its station-keeping distance
    pub desired_distance: u32,
}

impl LocalView<'_> {
    fn in_formation(&self) -> bool {
        self.knowledge.is_in_formation(self.desired_distance)
    }

    fn in_range(&self, other: GridPos) -> bool {
        self.pos.chebyshev_distance(&other) <= self.params.communication_range
    }
}

/// Messages the acting drone sends this round to maintain its links
pub fn plan_network(role: Role, view: &LocalView<'_>, dir: &dyn PeerDirectory) -> Vec<Directive> {
    match role {
        Role::Leader => leader_network(view, dir),
        Role::Scout => scout_network(view, dir),
        Role::Cordon | Role::Walker => Vec::new(),
    }
}

/// Leaders recruit only while in formation: leaderless non-leaders fill the
/// open follower slots (first in range-query order), and other leaders that
/// keep formation are offered a peer link.
fn leader_network(view: &LocalView<'_>, dir: &dyn PeerDirectory) -> Vec<Directive> {
    if !view.in_formation() {
        return Vec::new();
    }
    let graph = &view.knowledge.network;
    let mut directives = Vec::new();

    let slots = graph.available_slots();
    if slots > 0 {
        directives.extend(
            view.knowledge
                .neighbours()
                .iter()
                .copied()
                .filter(|id| !graph.is_linked(*id))
                .filter(|id| !dir.role_of(*id).is_leader() && dir.leader_of(*id).is_none())
                .take(slots)
                .map(Directive::register),
        );
    }

    directives.extend(
        view.knowledge
            .neighbours()
            .iter()
            .copied()
            .filter(|id| !graph.is_linked(*id))
            .filter(|id| dir.role_of(*id).is_leader() && dir.is_in_formation(*id))
            .map(Directive::register),
    );

    if !directives.is_empty() {
        trace!("{} offers {} links ({} slots open)", view.id, directives.len(), slots);
    }
    directives
}

/// Scouts attach to the closest leader in formation, drop a leader that
/// left range or formation (with all peers), prune out-of-range peers and,
/// on first contact, link with the closest co-followers.
fn scout_network(view: &LocalView<'_>, dir: &dyn PeerDirectory) -> Vec<Directive> {
    let graph = &view.knowledge.network;

    let Some(leader) = graph.leader() else {
        return match view.knowledge.closest_leader() {
            Some(closest) if dir.is_in_formation(closest.drone) => vec![Directive::register(closest.drone)],
            _ => Vec::new(),
        };
    };

    if !view.in_range(dir.position_of(leader)) || !dir.is_in_formation(leader) {
        trace!("{} leaves leader {}", view.id, leader);
        let mut directives = vec![Directive::deregister(leader)];
        directives.extend(graph.peers().into_iter().map(Directive::deregister));
        return directives;
    }

    let peers = graph.peers();
    if !peers.is_empty() {
        return peers
            .into_iter()
            .filter(|peer| !view.in_range(dir.position_of(*peer)))
            .map(Directive::deregister)
            .collect();
    }

    let mut candidates: Vec<(u32, DroneId)> = dir
        .followers_of(leader)
        .into_iter()
        .filter(|id| *id != view.id)
        .map(|id| (view.pos.chebyshev_distance(&dir.position_of(id)), id))
        .filter(|(distance, _)| *distance <= view.params.communication_range)
        .collect();
    candidates.sort_by_key(|(distance, _)| *distance);
    candidates
        .into_iter()
        .take(view.params.max_peers)
        .map(|(_, id)| Directive::register(id))
        .collect()
}

/// `battery_level + |neighbours| − 2 × |neighbouring leaders|`
pub fn leader_score(battery_level: f64, neighbours: usize, neighbouring_leaders: usize) -> f64 {
    battery_level + neighbours as f64 - 2.0 * neighbouring_leaders as f64
}

/// Local leader election.
///
/// Demote to scout when strictly below the best visible neighbour score,
/// promote to leader when strictly above, keep the role on a tie or without
/// neighbours. No global convergence is implied.
pub fn elect_role(current: Role, own_score: f64, neighbour_scores: &[f64]) -> Role {
    let Some(best) = neighbour_scores.iter().copied().reduce(f64::max) else {
        return current;
    };
    if own_score < best {
        Role::Scout
    } else if own_score > best {
        Role::Leader
    } else {
        current
    }
}

//! Per-drone view of the leader/follower/peer network
//!
//! Every drone owns one [`NetworkGraph`] holding only its own typed edges.
//! Edges are created and removed in pairs through [`link_pair`] and
//! [`unlink_pair`] so both views change together; a graph never stores a
//! reference to another drone, only its id.
//!
//! Invariants enforced here:
//! - a node holds at most one `Leader` edge
//! - a node holds at most `follower_capacity` `Follower` edges
//! - a node never links to itself

use crate::types::*;
use log::trace;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Edge type, seen from the graph owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// The other drone is the owner's leader
    Leader,
    /// The other drone follows the owner
    Follower,
    /// Same-rank link
    Peer,
}

impl LinkKind {
    /// Kind the other end stores for the same edge
    pub const fn reciprocal(&self) -> LinkKind {
        match self {
            LinkKind::Leader => LinkKind::Follower,
            LinkKind::Follower => LinkKind::Leader,
            LinkKind::Peer => LinkKind::Peer,
        }
    }
}

/// Typed adjacency of one drone
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGraph {
    owner: DroneId,
    follower_capacity: usize,
    links: BTreeMap<DroneId, LinkKind>,
    known: BTreeSet<DroneId>,
}

impl NetworkGraph {
    /// Empty graph for `owner`
    pub fn new(owner: DroneId, follower_capacity: usize) -> Self {
        Self {
            owner,
            follower_capacity,
            links: BTreeMap::new(),
            known: BTreeSet::new(),
        }
    }

    /// Owning drone
    pub fn owner(&self) -> DroneId {
        self.owner
    }

    /// Maximum number of follower edges
    pub fn follower_capacity(&self) -> usize {
        self.follower_capacity
    }

    /// Current leader, if any
    pub fn leader(&self) -> Option<DroneId> {
        self.links
            .iter()
            .find(|(_, kind)| **kind == LinkKind::Leader)
            .map(|(id, _)| *id)
    }

    /// Current followers, in id order
    pub fn followers(&self) -> Vec<DroneId> {
        self.of_kind(LinkKind::Follower)
    }

    /// Current peers, in id order
    pub fn peers(&self) -> Vec<DroneId> {
        self.of_kind(LinkKind::Peer)
    }

    /// Number of follower edges
    pub fn follower_count(&self) -> usize {
        self.links.values().filter(|k| **k == LinkKind::Follower).count()
    }

    /// Follower slots still open
    pub fn available_slots(&self) -> usize {
        self.follower_capacity.saturating_sub(self.follower_count())
    }

    /// Edge type towards `other`
    pub fn link_kind(&self, other: DroneId) -> Option<LinkKind> {
        self.links.get(&other).copied()
    }

    /// Whether any edge towards `other` exists
    pub fn is_linked(&self, other: DroneId) -> bool {
        self.links.contains_key(&other)
    }

    /// All current edges, in id order
    pub fn links(&self) -> impl Iterator<Item = (DroneId, LinkKind)> + '_ {
        self.links.iter().map(|(id, kind)| (*id, *kind))
    }

    /// Every drone this one has ever been linked with
    pub fn known_nodes(&self) -> &BTreeSet<DroneId> {
        &self.known
    }

    /// Whether an edge of `kind` towards `other` would keep the invariants
    pub fn can_accept(&self, other: DroneId, kind: LinkKind) -> bool {
        if self.link_kind(other) == Some(kind) {
            return true;
        }
        match kind {
            LinkKind::Leader => self.leader().is_none(),
            LinkKind::Follower => self.follower_count() < self.follower_capacity,
            LinkKind::Peer => true,
        }
    }

    fn insert(&mut self, other: DroneId, kind: LinkKind) {
        assert_ne!(other, self.owner, "drone {} cannot link to itself", self.owner);
        self.links.insert(other, kind);
        self.known.insert(other);
    }

    fn remove(&mut self, other: DroneId) -> Option<LinkKind> {
        self.links.remove(&other)
    }

    fn of_kind(&self, kind: LinkKind) -> Vec<DroneId> {
        self.links
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Edge kinds `(a's view of b, b's view of a)` implied by the two roles
pub fn link_kinds(a_role: Role, b_role: Role) -> (LinkKind, LinkKind) {
    match (a_role.is_leader(), b_role.is_leader()) {
        (true, false) => (LinkKind::Follower, LinkKind::Leader),
        (false, true) => (LinkKind::Leader, LinkKind::Follower),
        _ => (LinkKind::Peer, LinkKind::Peer),
    }
}

/// Create the edge between `a` and `b` on both ends.
///
/// Edge kinds follow the current roles. The link is refused as a whole,
/// leaving both graphs untouched, when either end cannot accept it.
///
/// # Panics
/// When both graphs belong to the same drone.
pub fn link_pair(a: &mut NetworkGraph, a_role: Role, b: &mut NetworkGraph, b_role: Role) -> bool {
    assert_ne!(a.owner, b.owner, "drone {} cannot link to itself", a.owner);
    let (a_kind, b_kind) = link_kinds(a_role, b_role);

    if !a.can_accept(b.owner, a_kind) || !b.can_accept(a.owner, b_kind) {
        trace!("link {} <-> {} refused", a.owner, b.owner);
        return false;
    }

    a.insert(b.owner, a_kind);
    b.insert(a.owner, b_kind);
    true
}

/// Remove the edge between `a` and `b` on both ends; returns whether one existed
pub fn unlink_pair(a: &mut NetworkGraph, b: &mut NetworkGraph) -> bool {
    let removed_a = a.remove(b.owner).is_some();
    let removed_b = b.remove(a.owner).is_some();
    removed_a || removed_b
}

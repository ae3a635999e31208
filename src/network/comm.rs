//! Outgoing message buffer and recipient selection
//!
//! Messages queued during a step are flushed once, at the end of that step.
//! Delivery is single-hop, at most once per recipient, without acknowledgment
//! or retry. The buffer is cleared even when nobody is listening.

use super::graph::NetworkGraph;
use super::message::Message;
use crate::types::*;

/// Counters kept per drone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommStats {
    /// Messages queued for broadcast
    pub messages_queued: u64,
    /// Individual mailbox deliveries
    pub deliveries: u64,
    /// Broadcasts that reached nobody
    pub dropped_broadcasts: u64,
}

/// Outgoing buffer of one drone
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pending: Vec<Message>,
    stats: CommStats,
}

impl Outbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for the end-of-step broadcast
    pub fn queue(&mut self, message: Message) {
        self.pending.push(message);
        self.stats.messages_queued += 1;
    }

    /// Messages waiting for broadcast
    pub fn pending(&self) -> &[Message] {
        &self.pending
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued message, leaving the buffer empty
    pub fn take(&mut self) -> Vec<Message> {
        core::mem::take(&mut self.pending)
    }

    /// Book the outcome of one broadcast
    pub fn record_delivery(&mut self, messages: usize, recipients: usize) {
        if recipients == 0 {
            self.stats.dropped_broadcasts += 1;
        }
        self.stats.deliveries += (messages * recipients) as u64;
    }

    /// Communication counters
    pub fn stats(&self) -> CommStats {
        self.stats
    }
}

/// Drones among `in_range` that may receive a broadcast from a sender with
/// `role` and network view `graph`.
///
/// Leaders reach their followers, scouts their peers and leader, every other
/// role reaches all drones in range. Order follows `in_range`, without
/// duplicates.
pub fn valid_recipients(role: Role, graph: &NetworkGraph, in_range: &[DroneId]) -> Vec<DroneId> {
    let mut recipients = Vec::with_capacity(in_range.len());
    for id in in_range {
        if recipients.contains(id) {
            continue;
        }
        let allowed = match role {
            Role::Leader => graph.followers().contains(id),
            Role::Scout => graph.peers().contains(id) || graph.leader() == Some(*id),
            Role::Cordon | Role::Walker => true,
        };
        if allowed {
            recipients.push(*id);
        }
    }
    recipients
}

/// Whether a sender with `role` also reports to its base
pub const fn reports_to_base(role: Role) -> bool {
    role.is_leader()
}

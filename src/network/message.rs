//! Single-hop messages exchanged between drones

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A burning cell was spotted
    FireAlert,
    /// Request to link with the receiver
    Registration,
    /// Request to drop the link with the receiver
    Deregistration,
}

/// One message, consumed exactly once by the receiving mailbox drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message type
    pub kind: MessageKind,
    /// Sending drone
    pub sender: DroneId,
    /// Fire position for alerts
    pub content: Option<GridPos>,
    /// Round the message was sent in
    pub sent_round: u64,
    /// Sender position at send time
    pub sender_pos: GridPos,
}

impl Message {
    /// Fire alert about `fire`
    pub fn fire_alert(sender: DroneId, fire: GridPos, round: u64, sender_pos: GridPos) -> Self {
        Self {
            kind: MessageKind::FireAlert,
            sender,
            content: Some(fire),
            sent_round: round,
            sender_pos,
        }
    }

    /// Link request
    pub fn registration(sender: DroneId, round: u64, sender_pos: GridPos) -> Self {
        Self {
            kind: MessageKind::Registration,
            sender,
            content: None,
            sent_round: round,
            sender_pos,
        }
    }

    /// Unlink request
    pub fn deregistration(sender: DroneId, round: u64, sender_pos: GridPos) -> Self {
        Self {
            kind: MessageKind::Deregistration,
            sender,
            content: None,
            sent_round: round,
            sender_pos,
        }
    }

    /// Control message of the given kind
    pub fn control(kind: MessageKind, sender: DroneId, round: u64, sender_pos: GridPos) -> Self {
        Self {
            kind,
            sender,
            content: None,
            sent_round: round,
            sender_pos,
        }
    }

    /// Overwrite the delivery stamp
    pub fn stamp(&mut self, round: u64, sender_pos: GridPos) {
        self.sent_round = round;
        self.sender_pos = sender_pos;
    }
}

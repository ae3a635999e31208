//! Base stations: deployment points, charging pads and fire report sinks

use crate::network::{Message, MessageKind};
use crate::types::*;
use log::info;
use serde::Serialize;
use std::collections::BTreeSet;

/// A base station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneBase {
    index: usize,
    pos: GridPos,
    drones: Vec<DroneId>,
    reported_fires: BTreeSet<GridPos>,
}

impl DroneBase {
    /// Create a base at `pos`
    pub fn new(index: usize, pos: GridPos) -> Self {
        Self {
            index,
            pos,
            drones: Vec::new(),
            reported_fires: BTreeSet::new(),
        }
    }

    /// Index of this base in the swarm
    pub fn index(&self) -> usize {
        self.index
    }

    /// Base cell
    pub fn pos(&self) -> GridPos {
        self.pos
    }

    /// Drones deployed from this base
    pub fn drones(&self) -> &[DroneId] {
        &self.drones
    }

    /// Fires reported by leaders in range
    pub fn reported_fires(&self) -> &BTreeSet<GridPos> {
        &self.reported_fires
    }

    pub(crate) fn register_drone(&mut self, drone: DroneId) {
        self.drones.push(drone);
    }

    /// Take a broadcast message; only fire alerts carry anything for a base
    pub fn receive(&mut self, message: &Message) {
        if message.kind != MessageKind::FireAlert {
            return;
        }
        if let Some(fire) = message.content {
            if self.reported_fires.insert(fire) {
                info!("base {} at {} received fire report {} from {}", self.index, self.pos, fire, message.sender);
            }
        }
    }
}

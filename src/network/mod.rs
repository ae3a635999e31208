//! Single-hop messaging and decentralized network formation

pub mod comm;
pub mod graph;
pub mod message;
pub mod topology;

pub use comm::{valid_recipients, CommStats, Outbox};
pub use graph::{link_pair, unlink_pair, LinkKind, NetworkGraph};
pub use message::{Message, MessageKind};
pub use topology::{elect_role, leader_score, plan_network, Directive, LocalView, PeerDirectory};

//! Drone behavior control: decision, state machine and navigation

pub mod decision;
pub mod navigation;
pub mod state_machine;

pub use decision::{decide, role_switch_event, DecisionInputs};
pub use navigation::{change_target, formation_move, FormationMove};
pub use state_machine::{next_state, DroneEvent, DroneState, EntryAction, GuardInputs};

//! Per-round event selection
//!
//! Exactly one event is produced per drone per round. Battery handling
//! comes first, then the role-specific analysis.

use super::state_machine::{DroneEvent, DroneState};
use crate::types::Role;

/// Inputs of the analysis step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionInputs {
    /// Current state
    pub state: DroneState,
    /// Current role
    pub role: Role,
    /// Battery cannot cover the trip home with the reserve intact
    pub needs_recharging: bool,
    /// At least one fire is known
    pub fires_known: bool,
}

/// Select this round's event.
///
/// A drone already heading home or charging keeps feeding `Recharge` until
/// it is back to `Idle`, so arriving at the base (where a return is never
/// needed) still leads into charging.
pub fn decide(inputs: &DecisionInputs) -> DroneEvent {
    if matches!(inputs.state, DroneState::Recharging | DroneState::ReturnToBase) {
        return DroneEvent::Recharge;
    }
    if inputs.needs_recharging {
        return DroneEvent::NeedToReturn;
    }
    match inputs.role {
        Role::Leader => DroneEvent::Deploy,
        Role::Scout => scout_analysis(inputs),
        Role::Cordon => {
            if inputs.fires_known {
                DroneEvent::FireDetected
            } else {
                DroneEvent::NoFireDetected
            }
        }
        Role::Walker => DroneEvent::Deploy,
    }
}

/// Fire events only apply once the scout is patrolling, so known fires are
/// ignored until it has left the base and dispersed.
fn scout_analysis(inputs: &DecisionInputs) -> DroneEvent {
    if matches!(inputs.state, DroneState::Idle | DroneState::Dispersing) {
        return DroneEvent::Deploy;
    }
    if inputs.fires_known {
        DroneEvent::FireDetected
    } else {
        DroneEvent::Deploy
    }
}

/// Event replacing `Deploy` when the election moved the drone to `new_role`
/// while it was in a state owned by the old role
pub fn role_switch_event(state: DroneState, old_role: Role, new_role: Role) -> Option<DroneEvent> {
    if old_role == new_role {
        return None;
    }
    match (new_role, state) {
        (Role::Scout, DroneState::Formation | DroneState::HoveringLeader) => Some(DroneEvent::TurnToScout),
        (Role::Leader, DroneState::Patrolling | DroneState::Cordoning) => Some(DroneEvent::TurnToLeader),
        _ => None,
    }
}

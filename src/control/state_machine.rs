//! Drone behavior state machine
//!
//! An explicit transition table: each row is `(state, event, guard, next)`.
//! For a given state and event the first row whose guard holds wins.
//! Entering a state, including re-entering the same one, runs that state's
//! [`EntryAction`]. An event with no matching row leaves the drone where it
//! is and runs nothing.

use crate::types::Role;
use serde::Serialize;

/// Behavior states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DroneState {
    /// At base, waiting to deploy
    #[default]
    Idle,
    /// Moving off a crowded cell
    Dispersing,
    /// Closing in on station-keeping distance
    Formation,
    /// Leader holding formation
    HoveringLeader,
    /// Random walk looking for fires
    Patrolling,
    /// Holding around a known fire
    Cordoning,
    /// Flying home to recharge
    ReturnToBase,
    /// Charging at base
    Recharging,
}

impl DroneState {
    /// Every state, in declaration order
    pub const ALL: [DroneState; 8] = [
        DroneState::Idle,
        DroneState::Dispersing,
        DroneState::Formation,
        DroneState::HoveringLeader,
        DroneState::Patrolling,
        DroneState::Cordoning,
        DroneState::ReturnToBase,
        DroneState::Recharging,
    ];

    /// Name used in telemetry
    pub const fn as_str(&self) -> &'static str {
        match self {
            DroneState::Idle => "Idle",
            DroneState::Dispersing => "Dispersing",
            DroneState::Formation => "Formation",
            DroneState::HoveringLeader => "HoveringLeader",
            DroneState::Patrolling => "Patrolling",
            DroneState::Cordoning => "Cordoning",
            DroneState::ReturnToBase => "ReturnToBase",
            DroneState::Recharging => "Recharging",
        }
    }

    /// Deployed states that a low battery can interrupt
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            DroneState::Dispersing
                | DroneState::Formation
                | DroneState::HoveringLeader
                | DroneState::Patrolling
                | DroneState::Cordoning
        )
    }

    /// Side effect run on entering this state
    pub const fn entry_action(&self) -> EntryAction {
        match self {
            DroneState::Idle => EntryAction::None,
            DroneState::Dispersing => EntryAction::Disperse,
            DroneState::Formation => EntryAction::Formation,
            DroneState::HoveringLeader | DroneState::Cordoning => EntryAction::Hover,
            DroneState::Patrolling => EntryAction::RandomWalk,
            DroneState::ReturnToBase => EntryAction::MoveToBase,
            DroneState::Recharging => EntryAction::Recharge,
        }
    }
}

impl core::fmt::Display for DroneState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one event a drone feeds its state machine each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneEvent {
    Deploy,
    FireDetected,
    NoFireDetected,
    NeedToReturn,
    Recharge,
    TurnToScout,
    TurnToLeader,
}

impl DroneEvent {
    /// Event name used in logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            DroneEvent::Deploy => "deploy",
            DroneEvent::FireDetected => "fire_detected",
            DroneEvent::NoFireDetected => "no_fire_detected",
            DroneEvent::NeedToReturn => "need_to_return",
            DroneEvent::Recharge => "recharge",
            DroneEvent::TurnToScout => "turn_to_scout",
            DroneEvent::TurnToLeader => "turn_to_leader",
        }
    }
}

impl core::fmt::Display for DroneEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State entry side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// Stay put, no cost
    None,
    /// Random neighbouring cell, current cell excluded
    Disperse,
    /// One-cell nudge towards desired distance
    Formation,
    /// Random neighbouring cell, current cell included
    RandomWalk,
    /// Hold position and pay the hovering cost
    Hover,
    /// One cell towards the base
    MoveToBase,
    /// One round of charge
    Recharge,
}

/// Facts the guards are evaluated against, taken once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardInputs {
    /// Another drone shares the cell
    pub crowded: bool,
    /// Current role
    pub role: Role,
    /// Station-keeping distance reached (or no leader in range)
    pub in_formation: bool,
    /// Standing on the home base cell
    pub at_base: bool,
    /// Battery at capacity
    pub fully_charged: bool,
}

/// Transition guard predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    Crowded,
    IsLeader,
    IsScout,
    LeaderNotCrowded,
    LeaderInFormation,
    LeaderOutOfFormation,
    AtBase,
    FullyCharged,
}

impl Guard {
    /// Evaluate against this round's inputs
    pub fn holds(&self, inputs: &GuardInputs) -> bool {
        let leader = inputs.role == Role::Leader;
        match self {
            Guard::Always => true,
            Guard::Crowded => inputs.crowded,
            Guard::IsLeader => leader,
            Guard::IsScout => inputs.role == Role::Scout,
            Guard::LeaderNotCrowded => leader && !inputs.crowded,
            Guard::LeaderInFormation => leader && inputs.in_formation,
            Guard::LeaderOutOfFormation => leader && !inputs.in_formation,
            Guard::AtBase => inputs.at_base,
            Guard::FullyCharged => inputs.fully_charged,
        }
    }
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DroneState,
    pub event: DroneEvent,
    pub guard: Guard,
    pub to: DroneState,
}

const fn row(from: DroneState, event: DroneEvent, guard: Guard, to: DroneState) -> Transition {
    Transition { from, event, guard, to }
}

use DroneEvent as E;
use DroneState as S;

/// The full transition table, in priority order
pub const TRANSITIONS: &[Transition] = &[
    // deploy
    row(S::Idle, E::Deploy, Guard::Crowded, S::Dispersing),
    row(S::Idle, E::Deploy, Guard::IsLeader, S::Formation),
    row(S::Idle, E::Deploy, Guard::IsScout, S::Patrolling),
    row(S::Dispersing, E::Deploy, Guard::LeaderNotCrowded, S::Formation),
    row(S::Dispersing, E::Deploy, Guard::IsScout, S::Patrolling),
    row(S::Dispersing, E::Deploy, Guard::Always, S::Dispersing),
    row(S::Formation, E::Deploy, Guard::LeaderInFormation, S::HoveringLeader),
    row(S::Formation, E::Deploy, Guard::Always, S::Formation),
    row(S::HoveringLeader, E::Deploy, Guard::LeaderOutOfFormation, S::Formation),
    row(S::HoveringLeader, E::Deploy, Guard::Crowded, S::Dispersing),
    row(S::HoveringLeader, E::Deploy, Guard::Always, S::HoveringLeader),
    row(S::Patrolling, E::Deploy, Guard::Always, S::Patrolling),
    // fires
    row(S::Patrolling, E::FireDetected, Guard::Always, S::Cordoning),
    row(S::Cordoning, E::FireDetected, Guard::Always, S::Cordoning),
    row(S::Cordoning, E::NoFireDetected, Guard::Always, S::Patrolling),
    // battery
    row(S::Dispersing, E::NeedToReturn, Guard::Always, S::ReturnToBase),
    row(S::Formation, E::NeedToReturn, Guard::Always, S::ReturnToBase),
    row(S::HoveringLeader, E::NeedToReturn, Guard::Always, S::ReturnToBase),
    row(S::Patrolling, E::NeedToReturn, Guard::Always, S::ReturnToBase),
    row(S::Cordoning, E::NeedToReturn, Guard::Always, S::ReturnToBase),
    row(S::ReturnToBase, E::NeedToReturn, Guard::AtBase, S::Recharging),
    row(S::ReturnToBase, E::NeedToReturn, Guard::Always, S::ReturnToBase),
    row(S::ReturnToBase, E::Recharge, Guard::AtBase, S::Recharging),
    row(S::ReturnToBase, E::Recharge, Guard::Always, S::ReturnToBase),
    row(S::Recharging, E::Recharge, Guard::FullyCharged, S::Idle),
    row(S::Recharging, E::Recharge, Guard::Always, S::Recharging),
    // role switches
    row(S::HoveringLeader, E::TurnToScout, Guard::Always, S::Patrolling),
    row(S::Formation, E::TurnToScout, Guard::Always, S::Patrolling),
    row(S::Patrolling, E::TurnToLeader, Guard::Always, S::Formation),
    row(S::Cordoning, E::TurnToLeader, Guard::Always, S::Formation),
];

/// Target of `event` from `state`, or `None` when no row matches
pub fn next_state(state: DroneState, event: DroneEvent, inputs: &GuardInputs) -> Option<DroneState> {
    TRANSITIONS
        .iter()
        .filter(|t| t.from == state && t.event == event)
        .find(|t| t.guard.holds(inputs))
        .map(|t| t.to)
}

/// Whether `event` is handled at all from `state`
pub fn accepts(state: DroneState, event: DroneEvent) -> bool {
    TRANSITIONS.iter().any(|t| t.from == state && t.event == event)
}

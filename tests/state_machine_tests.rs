//! Drone behavior state machine driven through the swarm

mod common;

use common::Harness;
use drone_swarm_sim::control::state_machine::{accepts, TRANSITIONS};
use drone_swarm_sim::control::{DroneEvent, DroneState};
use drone_swarm_sim::*;

#[cfg(test)]
mod table_tests {
    use super::*;

    #[test]
    fn test_every_state_is_reachable() {
        for state in DroneState::ALL {
            if state == DroneState::Idle {
                continue;
            }
            assert!(TRANSITIONS.iter().any(|t| t.to == state), "{state} unreachable");
        }
    }

    #[test]
    fn test_every_state_has_an_exit() {
        for state in DroneState::ALL {
            assert!(TRANSITIONS.iter().any(|t| t.from == state && t.to != state), "{state} is a trap");
        }
    }

    #[test]
    fn test_fire_events_only_matter_while_patrolling_or_cordoning() {
        for state in DroneState::ALL {
            let handled = accepts(state, DroneEvent::FireDetected);
            assert_eq!(handled, matches!(state, DroneState::Patrolling | DroneState::Cordoning));
        }
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[test]
    fn test_unmatched_event_changes_nothing() {
        let mut h = Harness::new(60, 60, (5, 5));
        let scout = h.spawn(Role::Scout, 30, 30);
        h.refresh(scout);
        h.dispatch(scout, DroneEvent::FireDetected);

        let drone = h.drone(scout);
        assert_eq!(drone.state(), DroneState::Idle);
        assert_eq!(drone.position(), GridPos::new(30, 30));
        assert_eq!(drone.battery().level(), 100.0);
        assert!(h.log.transitions.is_empty());
    }

    #[test]
    fn test_walker_stays_idle() {
        let mut h = Harness::new(60, 60, (5, 5));
        let walker = h.spawn(Role::Walker, 30, 30);
        for _ in 0..3 {
            h.step(walker);
        }
        assert_eq!(h.drone(walker).state(), DroneState::Idle);
        assert_eq!(h.drone(walker).role(), Role::Walker);
        assert!(h.log.transitions.is_empty());
    }

    #[test]
    fn test_scout_spots_fire_and_cordons() {
        let mut h = Harness::new(60, 60, (25, 25));
        let scout = h.spawn(Role::Scout, 30, 30);
        h.step(scout);
        assert_eq!(h.drone(scout).state(), DroneState::Patrolling);

        h.world.ignite(GridPos::new(33, 32)).unwrap();
        h.step(scout);
        let drone = h.drone(scout);
        assert_eq!(drone.state(), DroneState::Cordoning);
        assert!(drone.knowledge().reported_fires().contains(&GridPos::new(33, 32)));

        // self-transition reruns the hover entry action
        let pos = drone.position();
        let level = drone.battery().level();
        for i in 1..=3 {
            h.step(scout);
            let drone = h.drone(scout);
            assert_eq!(drone.state(), DroneState::Cordoning);
            assert_eq!(drone.position(), pos);
            assert_eq!(drone.battery().level(), level - 0.5 * f64::from(i));
        }
        let cordon_entries = h
            .log
            .transitions_of(scout)
            .filter(|t| t.to == DroneState::Cordoning)
            .count();
        assert_eq!(cordon_entries, 4);
    }

    #[test]
    fn test_crowded_scouts_leave_dispersal_for_patrol() {
        let mut h = Harness::new(60, 60, (30, 30));
        let a = h.spawn(Role::Scout, 30, 30);
        let b = h.spawn(Role::Scout, 30, 30);

        h.step(a);
        assert_eq!(h.drone(a).state(), DroneState::Dispersing);
        h.step(a);
        assert_eq!(h.drone(a).state(), DroneState::Patrolling);
        assert_eq!(h.drone(b).state(), DroneState::Idle);
    }

    #[test]
    fn test_scout_with_known_fire_disperses_then_cordons() {
        let mut h = Harness::new(100, 100, (30, 30));
        let a = h.spawn(Role::Scout, 30, 30);
        let _b = h.spawn(Role::Scout, 30, 30);
        h.drone_mut(a).knowledge_mut().record_fire(GridPos::new(90, 90));

        h.step(a);
        assert_eq!(h.drone(a).state(), DroneState::Dispersing);
        let level = h.drone(a).battery().level();

        h.step(a);
        assert_eq!(h.drone(a).state(), DroneState::Patrolling);
        assert!(h.drone(a).battery().level() < level);

        h.step(a);
        assert_eq!(h.drone(a).state(), DroneState::Cordoning);
        for _ in 0..50 {
            h.step(a);
            assert_ne!(h.drone(a).state(), DroneState::Dispersing);
        }
    }
}

#[cfg(test)]
mod election_tests {
    use super::*;

    #[test]
    fn test_weaker_leader_turns_to_scout() {
        let mut h = Harness::new(100, 100, (45, 45));
        let weak = h.spawn(Role::Leader, 50, 50);
        let strong = h.spawn(Role::Leader, 59, 50);

        h.refresh(weak);
        h.dispatch(weak, DroneEvent::Deploy);
        assert_eq!(h.drone(weak).state(), DroneState::Formation);

        h.drone_mut(weak).battery_mut().set_level(50.0);
        h.step(weak);

        let drone = h.drone(weak);
        assert_eq!(drone.role(), Role::Scout);
        assert_eq!(drone.state(), DroneState::Patrolling);
        assert_eq!(h.log.role_changes, vec![(weak, Role::Leader, Role::Scout)]);
        assert!(h
            .log
            .transitions_of(weak)
            .any(|t| t.event == DroneEvent::TurnToScout && t.to == DroneState::Patrolling));
        assert_eq!(h.drone(strong).role(), Role::Leader);
    }

    #[test]
    fn test_stronger_scout_turns_to_leader() {
        let mut h = Harness::new(100, 100, (45, 45));
        let strong = h.spawn(Role::Scout, 50, 50);
        let weak = h.spawn(Role::Scout, 53, 50);
        h.drone_mut(weak).battery_mut().set_level(20.0);

        h.refresh(strong);
        h.dispatch(strong, DroneEvent::Deploy);
        assert_eq!(h.drone(strong).state(), DroneState::Patrolling);

        h.step(strong);
        let drone = h.drone(strong);
        assert_eq!(drone.role(), Role::Leader);
        assert_eq!(drone.state(), DroneState::Formation);
        assert!(h
            .log
            .transitions_of(strong)
            .any(|t| t.event == DroneEvent::TurnToLeader && t.from == DroneState::Patrolling));
    }

    #[test]
    fn test_tie_keeps_role() {
        let mut h = Harness::new(100, 100, (45, 45));
        let a = h.spawn(Role::Scout, 50, 50);
        let b = h.spawn(Role::Scout, 53, 50);

        // full charge and one neighbour each: both score 101
        h.refresh(b);
        h.step(a);
        assert_eq!(h.drone(a).role(), Role::Scout);
        assert!(h.log.role_changes.is_empty());
    }
}

//! Scalability tests
//!
//! Runs swarms of 50, 75 and 100+ drones and checks that the structural
//! invariants still hold at that size.

use drone_swarm_sim::network::LinkKind;
use drone_swarm_sim::telemetry::EventLog;
use drone_swarm_sim::*;
use std::collections::HashSet;

const SMALL_SWARM: usize = 50;
const MEDIUM_SWARM: usize = 75;
const LARGE_SWARM: usize = 100;

fn run_swarm(drones: usize, bases: &[(i32, i32)], rounds: u64) -> Simulation<GridWorld, EventLog> {
    let mut config = SwarmConfig::test_config();
    config.simulation.width = 120;
    config.simulation.height = 120;
    config.simulation.max_rounds = rounds;
    config.drone.leader_ratio = 0.2;

    let world = GridWorld::new(120, 120);
    let mut sim = Simulation::with_parts(config, world, EventLog::new()).unwrap();
    let per_base = drones / bases.len();
    for base in bases {
        sim.add_base_with((*base).into(), per_base).unwrap();
    }
    sim.run();
    sim
}

fn assert_structure(sim: &Simulation<GridWorld, EventLog>) {
    let swarm = sim.swarm();
    for drone in swarm.drones() {
        let graph = &drone.knowledge().network;
        assert!(graph.follower_count() <= graph.follower_capacity());
        assert!(graph.links().filter(|(_, k)| *k == LinkKind::Leader).count() <= 1);
        for (other, kind) in graph.links() {
            let back = swarm.get(other).unwrap().knowledge().network.link_kind(drone.id());
            assert_eq!(back, Some(kind.reciprocal()));
        }
        assert!(!sim.world().out_of_bounds(drone.position()));
    }
}

mod population_tests {
    use super::*;

    #[test]
    fn test_50_drones_one_base() {
        let sim = run_swarm(SMALL_SWARM, &[(60, 60)], 100);
        assert_eq!(sim.swarm().len(), SMALL_SWARM);
        assert_structure(&sim);
    }

    #[test]
    fn test_75_drones_three_bases() {
        let sim = run_swarm(MEDIUM_SWARM, &[(20, 20), (60, 100), (100, 30)], 100);
        assert_eq!(sim.swarm().len(), MEDIUM_SWARM);
        assert_eq!(sim.swarm().bases().len(), 3);
        assert_structure(&sim);
    }

    #[test]
    fn test_100_drones_two_bases() {
        let sim = run_swarm(LARGE_SWARM, &[(30, 60), (90, 60)], 150);
        assert_eq!(sim.swarm().len(), LARGE_SWARM);
        assert_eq!(sim.ledger().drone_deployments(), LARGE_SWARM);
        assert_structure(&sim);
        assert_eq!(sim.observer().rounds_completed, 150);
    }

    #[test]
    fn test_ids_are_unique_and_dense() {
        let sim = run_swarm(LARGE_SWARM, &[(60, 60)], 1);
        let ids: HashSet<DroneId> = sim.swarm().ids().into_iter().collect();
        assert_eq!(ids.len(), LARGE_SWARM);
        assert!(ids.iter().all(|id| id.index() < LARGE_SWARM));
    }
}

mod spread_tests {
    use super::*;

    #[test]
    fn test_swarm_spreads_out_from_base() {
        let sim = run_swarm(SMALL_SWARM, &[(60, 60)], 60);
        let cells: HashSet<GridPos> = sim.swarm().drones().map(|d| d.position()).collect();
        assert!(cells.len() > SMALL_SWARM / 2, "only {} distinct cells", cells.len());
    }

    #[test]
    fn test_fire_near_base_known_swarm_wide() {
        let mut config = SwarmConfig::test_config();
        config.simulation.width = 120;
        config.simulation.height = 120;
        config.simulation.max_rounds = 80;
        let world = GridWorld::new(120, 120);
        let mut sim = Simulation::with_parts(config, world, EventLog::new()).unwrap();
        sim.add_base_with(GridPos::new(60, 60), SMALL_SWARM).unwrap();
        sim.world_mut().ignite(GridPos::new(62, 62)).unwrap();
        sim.run();

        let aware = sim
            .swarm()
            .drones()
            .filter(|d| d.knowledge().reported_fires().contains(&GridPos::new(62, 62)))
            .count();
        assert_eq!(aware, SMALL_SWARM);
        // a drone already told by an earlier one has nothing new to broadcast
        let broadcasters: HashSet<DroneId> = sim.observer().broadcasts.iter().map(|(id, _, _)| *id).collect();
        assert!(!broadcasters.is_empty());
        assert!(broadcasters.len() <= SMALL_SWARM);
    }
}

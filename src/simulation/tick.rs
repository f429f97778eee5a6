//! Tick pipeline - advances the arena by one step
//!
//! Fixed order:
//! 1. move every live mobile agent
//! 2. edge avoidance
//! 3. scroll the viewport after the Player
//! 4. kill agents that left the arena
//! 5. report every agent visible in the viewport
//! 6. proximity avoidance and combat for every nearby pair
//! 7. purge the dead and top up Prey
//!
//! While paused, steps 1 and 2 and the steering half of step 6 are skipped.
//! The inter-tick delay belongs to the driver, not to this pipeline.

use crate::broadcast::ArenaEvent;
use crate::combat::{kill_agent, resolve_collision};
use crate::entity::Agent;
use crate::simulation::population::reap_dead;
use crate::steering::{avoid_collision, avoid_edges, within_detection};
use crate::world::World;

/// Run a single arena tick
///
/// Returns the events produced, in order, for the driver to deliver once
/// the world lock is released.
pub fn run_tick(world: &mut World) -> Vec<ArenaEvent> {
    let mut events = Vec::new();
    let paused = world.paused;

    if !paused {
        move_agents(world);
        steer_away_from_edges(world);
    }
    world.follow_player();
    kill_out_of_bounds(world, &mut events);
    report_visible(world, &mut events);
    resolve_encounters(world, !paused, &mut events);
    reap_dead(world, &mut events);

    world.current_tick += 1;
    events
}

fn move_agents(world: &mut World) {
    let interval = world.config().wander_interval;
    let (agents, rng) = world.agents_and_rng_mut();
    for agent in agents.iter_mut() {
        agent.step(interval, rng);
    }
}

fn steer_away_from_edges(world: &mut World) {
    for agent in world.agents_mut().iter_mut() {
        avoid_edges(agent);
    }
}

/// Kill every live mobile agent whose box has left the arena
pub fn kill_out_of_bounds(world: &mut World, events: &mut Vec<ArenaEvent>) -> usize {
    let mut killed = 0;
    for idx in 0..world.agent_count() {
        let agent = &world.agents()[idx];
        if !agent.is_alive() || !agent.role().is_mobile() || !agent.is_out_of_bounds() {
            continue;
        }
        kill_agent(world, idx, None, events);
        killed += 1;
    }
    killed
}

fn report_visible(world: &World, events: &mut Vec<ArenaEvent>) {
    events.extend(
        (0..world.agent_count())
            .filter_map(|idx| world.visible_snapshot(idx))
            .map(ArenaEvent::AgentState),
    );
}

/// Scan every ordered pair inside the detection box
///
/// Each pair first resolves a possible collision, then the acting agent
/// steers relative to the other. An acting agent that dies stops scanning.
pub fn resolve_encounters(world: &mut World, steer: bool, events: &mut Vec<ArenaEvent>) {
    for i in 0..world.agent_count() {
        if !world.agents()[i].is_alive() {
            continue;
        }
        let mut detect = world.detect_distance();
        for j in 0..world.agent_count() {
            let (a, b) = (&world.agents()[i], &world.agents()[j]);
            if i == j || a.id() == b.id() || !b.is_alive() || !within_detection(a, b, detect) {
                continue;
            }

            if resolve_collision(world, i, j, events).is_some() {
                // Detection scales with the Player, who may have just grown
                detect = world.detect_distance();
            }
            if !world.agents()[i].is_alive() {
                break;
            }
            if steer {
                let (acting, other) = pair_mut(world.agents_mut(), i, j);
                avoid_collision(acting, other);
            }
        }
    }
}

/// Two distinct mutable elements of one slice
fn pair_mut(agents: &mut [Agent], i: usize, j: usize) -> (&mut Agent, &mut Agent) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = agents.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = agents.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ArenaConfig;
    use crate::core::types::AgentId;
    use crate::entity::Role;
    use std::f64::consts::PI;

    fn world() -> World {
        let mut world = World::new(ArenaConfig {
            seed: Some(5),
            ..ArenaConfig::default()
        })
        .unwrap();
        world.reset_requested = false;
        world
    }

    fn place(world: &mut World, role: Role, x: i32, y: i32, heading: f64) -> AgentId {
        let agent = world.create_agent(role).with_position(x, y).with_heading(heading);
        world.insert_agent(agent)
    }

    #[test]
    fn test_tick_moves_mobile_agents_only() {
        let mut world = world();
        let prey = place(&mut world, Role::Prey, 500, 500, 0.0);
        let treasure = place(&mut world, Role::Treasure, 1500, 900, 0.0);
        run_tick(&mut world);
        assert_eq!(world.agent(prey).unwrap().x, 505);
        assert_eq!(world.agent(treasure).unwrap().x, 1500);
        assert_eq!(world.current_tick, 1);
    }

    #[test]
    fn test_paused_tick_freezes_movement() {
        let mut world = world();
        let prey = place(&mut world, Role::Prey, 500, 500, 0.0);
        world.paused = true;
        run_tick(&mut world);
        let agent = world.agent(prey).unwrap();
        assert_eq!((agent.x, agent.y), (500, 500));
        assert_eq!(agent.steps_alive(), 0);
    }

    #[test]
    fn test_out_of_bounds_agent_dies_and_is_purged() {
        let mut world = world();
        place(&mut world, Role::Player, 1200, 700, 0.0);
        // Heading straight out through the left wall
        let prey = place(&mut world, Role::Prey, 2, 700, PI);
        let events = run_tick(&mut world);
        assert!(world.agent(prey).is_none());
        assert_eq!(world.dead_counter(), 1);
        assert!(events.contains(&ArenaEvent::news(format!("Prey {} was killed by the edge", prey))));
    }

    #[test]
    fn test_player_at_edge_requests_reset() {
        let mut world = world();
        place(&mut world, Role::Player, 2395, 700, 0.0);
        let events = run_tick(&mut world);
        assert!(world.reset_requested);
        assert!(world.player_id().is_none());
        assert!(events.contains(&ArenaEvent::news("You scored: 0 points!")));
    }

    #[test]
    fn test_reports_only_visible_agents() {
        let mut world = world();
        let player = place(&mut world, Role::Player, 600, 400, 0.0);
        place(&mut world, Role::Treasure, 2200, 1300, 0.0);
        world.center_viewport();
        let events = run_tick(&mut world);
        let reported: Vec<AgentId> = events
            .iter()
            .filter_map(|e| match e {
                ArenaEvent::AgentState(s) => Some(s.id),
                _ => None,
            })
            .collect();
        assert_eq!(reported, vec![player]);
    }

    #[test]
    fn test_enforcer_catches_adjacent_prey() {
        let mut world = world();
        place(&mut world, Role::Player, 200, 200, 0.0);
        let enforcer = place(&mut world, Role::Enforcer, 1000, 700, 0.0);
        let prey = place(&mut world, Role::Prey, 1000, 703, 0.0);
        run_tick(&mut world);
        assert!(world.agent(prey).is_none());
        let enforcer = world.agent(enforcer).unwrap();
        assert_eq!(enforcer.size, 10);
        assert_eq!(enforcer.speed, 5.0);
    }

    #[test]
    fn test_treasure_count_survives_being_taken() {
        let mut world = world();
        place(&mut world, Role::Player, 200, 200, 0.0);
        let prey = place(&mut world, Role::Prey, 995, 700, 0.0);
        place(&mut world, Role::Treasure, 1003, 701, 0.0);
        run_tick(&mut world);
        assert_eq!(world.count_role(Role::Treasure), 1);
        assert_eq!(world.agent(prey).unwrap().score(), 1);
    }

    #[test]
    fn test_detection_range_follows_player_size() {
        for (growth, expected) in [(0, 0), (1, 1)] {
            let mut world = world();
            let player = place(&mut world, Role::Player, 200, 200, 0.0);
            world.agent_mut(player).unwrap().grow_size(growth);
            // 70 apart: outside 8 * 8 = 64, inside 9 * 8 = 72
            let enforcer = place(&mut world, Role::Enforcer, 1000, 700, 0.0);
            place(&mut world, Role::Prey, 1070, 700, 0.0);

            resolve_encounters(&mut world, true, &mut Vec::new());

            let corrections = world.agent(enforcer).unwrap().correction_count();
            assert_eq!(corrections, expected, "player growth {}", growth);
        }
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut world = world();
        place(&mut world, Role::Prey, 100, 100, 0.0);
        place(&mut world, Role::Prey, 200, 200, 0.0);
        let agents = world.agents_mut();
        let (a, b) = pair_mut(agents, 1, 0);
        assert_eq!((a.x, b.x), (200, 100));
        let (a, b) = pair_mut(agents, 0, 1);
        assert_eq!((a.x, b.x), (100, 200));
    }
}

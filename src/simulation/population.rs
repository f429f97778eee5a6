//! Population lifecycle
//!
//! Resets repopulate the arena by role quota. Dead non-Treasure agents are
//! purged each tick and every `top_up_threshold` deaths bring in fresh Prey.

use crate::broadcast::ArenaEvent;
use crate::core::types::AgentId;
use crate::entity::Role;
use crate::world::World;

/// Result of purging dead agents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapSummary {
    pub removed: usize,
    pub spawned: usize,
}

/// Clear the arena and repopulate it in place
///
/// One Player, N Prey, N/4 Enforcers and N/3 Treasure. The viewport is
/// recentered on the new Player.
pub fn reset_arena(world: &mut World) -> Vec<ArenaEvent> {
    let mut events = vec![ArenaEvent::news("reset")];

    world.clear_agents();
    world.reset_requested = false;
    world.begin_generation();

    let prey = world.config().prey_count;
    let enforcers = world.config().enforcer_count();
    let treasure = world.config().treasure_count();

    add_agents(world, Role::Player, 1, &mut events);
    add_agents(world, Role::Prey, prey, &mut events);
    add_agents(world, Role::Enforcer, enforcers, &mut events);
    add_agents(world, Role::Treasure, treasure, &mut events);

    world.center_viewport();
    let score = world.player().map(|p| p.score()).unwrap_or(0);
    events.push(ArenaEvent::Score(score));

    tracing::info!(
        "Arena reset (generation {}): {} prey, {} enforcers, {} treasure",
        world.generation(),
        world.count_role(Role::Prey),
        world.count_role(Role::Enforcer),
        world.count_role(Role::Treasure)
    );
    events
}

/// Spawn `count` agents of one role
///
/// Additions other than Treasure are announced.
pub fn add_agents(world: &mut World, role: Role, count: u32, events: &mut Vec<ArenaEvent>) -> Vec<AgentId> {
    if count == 0 {
        return Vec::new();
    }
    let ids: Vec<AgentId> = (0..count).map(|_| world.spawn_agent(role)).collect();

    if role != Role::Treasure {
        tracing::info!("Creating {} {}", count, role);
        events.push(ArenaEvent::news(format!("Added {} new {}", count, role)));
    }
    ids
}

/// Purge dead non-Treasure agents and top up Prey when enough have died
pub fn reap_dead(world: &mut World, events: &mut Vec<ArenaEvent>) -> ReapSummary {
    let removed = world.remove_agents_where(|a| !a.is_alive() && a.role() != Role::Treasure);
    if removed == 0 {
        return ReapSummary::default();
    }

    let mut summary = ReapSummary {
        removed,
        spawned: 0,
    };
    let deaths = world.record_deaths(removed as u32);
    if deaths >= world.config().top_up_threshold {
        let count = world.config().top_up_count;
        summary.spawned = add_agents(world, Role::Prey, count, events).len();
        world.reset_dead_counter();
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ArenaConfig;

    fn world(prey_count: u32) -> World {
        World::new(ArenaConfig {
            prey_count,
            seed: Some(11),
            ..ArenaConfig::default()
        })
        .unwrap()
    }

    fn kill_one_prey(world: &mut World) {
        if let Some(prey) = world
            .agents_mut()
            .iter_mut()
            .find(|a| a.role() == Role::Prey && a.is_alive())
        {
            prey.kill();
        }
    }

    #[test]
    fn test_reset_fills_quotas() {
        let mut world = world(30);
        let events = reset_arena(&mut world);

        assert_eq!(world.count_role(Role::Player), 1);
        assert_eq!(world.count_role(Role::Prey), 30);
        assert_eq!(world.count_role(Role::Enforcer), 7);
        assert_eq!(world.count_role(Role::Treasure), 10);
        assert!(!world.reset_requested);
        assert_eq!(world.generation(), 1);
        assert_eq!(events.first(), Some(&ArenaEvent::news("reset")));
        assert!(events.contains(&ArenaEvent::news("Added 30 new Prey")));
        assert!(!events.iter().any(|e| matches!(e, ArenaEvent::News(m) if m.contains("Treasure"))));
        assert_eq!(events.last(), Some(&ArenaEvent::Score(0)));
    }

    #[test]
    fn test_reset_restarts_ids_and_counters() {
        let mut world = world(8);
        reset_arena(&mut world);
        kill_one_prey(&mut world);
        reap_dead(&mut world, &mut Vec::new());
        assert_eq!(world.dead_counter(), 1);

        reset_arena(&mut world);
        assert_eq!(world.dead_counter(), 0);
        assert_eq!(world.player_id(), Some(AgentId(1)));
        assert_eq!(world.generation(), 2);
    }

    #[test]
    fn test_reset_centers_viewport_on_player() {
        let mut world = world(4);
        reset_arena(&mut world);
        let player = world.player().unwrap();
        let vp = world.viewport();
        assert!(vp.intersects(player.x, player.y, player.size));
        assert!(vp.x >= 0 && vp.x <= 2400 - 1200);
        assert!(vp.y >= 0 && vp.y <= 1400 - 700);
    }

    #[test]
    fn test_top_up_after_exactly_four_deaths() {
        let mut world = world(12);
        reset_arena(&mut world);
        let mut events = Vec::new();

        for expected in 1..=3 {
            kill_one_prey(&mut world);
            let summary = reap_dead(&mut world, &mut events);
            assert_eq!(summary.spawned, 0);
            assert_eq!(world.dead_counter(), expected);
        }
        assert_eq!(world.count_role(Role::Prey), 9);

        kill_one_prey(&mut world);
        let summary = reap_dead(&mut world, &mut events);
        assert_eq!(summary, ReapSummary { removed: 1, spawned: 2 });
        assert_eq!(world.dead_counter(), 0);
        assert_eq!(world.count_role(Role::Prey), 10);
        assert!(events.contains(&ArenaEvent::news("Added 2 new Prey")));
    }

    #[test]
    fn test_dead_treasure_is_never_reaped() {
        let mut world = world(3);
        reset_arena(&mut world);
        for agent in world.agents_mut().iter_mut().filter(|a| a.role() == Role::Treasure) {
            agent.kill();
        }
        let summary = reap_dead(&mut world, &mut Vec::new());
        assert_eq!(summary.removed, 0);
        assert_eq!(world.count_role(Role::Treasure), 1);
    }

    #[test]
    fn test_overshooting_threshold_still_tops_up() {
        let mut world = world(12);
        reset_arena(&mut world);
        for _ in 0..3 {
            kill_one_prey(&mut world);
        }
        reap_dead(&mut world, &mut Vec::new());
        for _ in 0..2 {
            kill_one_prey(&mut world);
        }
        let summary = reap_dead(&mut world, &mut Vec::new());
        assert_eq!(summary.spawned, 2);
        assert_eq!(world.dead_counter(), 0);
    }
}

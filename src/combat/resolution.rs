//! Collision outcome rules
//!
//! A hit is an axis-aligned overlap measured with the acting agent's size
//! only. Outcomes are decided by role alone, in priority order:
//! 1. the other agent is Treasure: the acting agent takes it
//! 2. the acting agent is Treasure: the other agent takes it
//! 3. non-Enforcer vs Enforcer, Enforcer vs Enforcer, or neither an
//!    Enforcer: the acting agent dies and the other is the killer
//! 4. an acting Enforcer vs a non-Enforcer: the other agent dies
//!
//! Every kill grows the killer; an Enforcer killer also gets faster.

use crate::broadcast::ArenaEvent;
use crate::core::constants::{ENFORCER_SPEED_REWARD, KILL_SIZE_REWARD, TREASURE_SIZE_REWARD};
use crate::entity::{Agent, Role};
use crate::world::World;

/// Which side of an ordered (acting, other) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Acting,
    Other,
}

/// What happens when two agents collide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Treasure is relocated and the taker scores and grows
    TreasureTaken { treasure: Side, taker: Side },
    /// Victim dies and the killer grows
    Kill { victim: Side, killer: Side },
}

/// Bounding-box overlap using the acting agent's size
pub fn is_hit(acting: &Agent, other: &Agent) -> bool {
    (acting.x - other.x).abs() < acting.size && (acting.y - other.y).abs() < acting.size
}

/// Outcome for an ordered pair of roles
pub fn classify(acting: Role, other: Role) -> Resolution {
    use Role::*;
    match (acting, other) {
        (_, Treasure) => Resolution::TreasureTaken {
            treasure: Side::Other,
            taker: Side::Acting,
        },
        (Treasure, _) => Resolution::TreasureTaken {
            treasure: Side::Acting,
            taker: Side::Other,
        },
        (Prey | Player, Enforcer) | (Enforcer, Enforcer) | (Prey | Player, Prey | Player) => {
            Resolution::Kill {
                victim: Side::Acting,
                killer: Side::Other,
            }
        }
        (Enforcer, Prey | Player) => Resolution::Kill {
            victim: Side::Other,
            killer: Side::Acting,
        },
    }
}

/// Resolve a collision between the agents at `acting` and `other`
///
/// Returns `None` on a miss.
pub fn resolve_collision(
    world: &mut World,
    acting: usize,
    other: usize,
    events: &mut Vec<ArenaEvent>,
) -> Option<Resolution> {
    let (a, b) = (&world.agents()[acting], &world.agents()[other]);
    if !is_hit(a, b) {
        return None;
    }

    let resolution = classify(a.role(), b.role());
    let index = |side: Side| match side {
        Side::Acting => acting,
        Side::Other => other,
    };

    match resolution {
        Resolution::TreasureTaken { treasure, taker } => {
            take_treasure(world, index(treasure), index(taker), events);
        }
        Resolution::Kill { victim, killer } => {
            kill_agent(world, index(victim), Some(index(killer)), events);
        }
    }
    Some(resolution)
}

/// Relocate a Treasure and reward whoever took it
pub fn take_treasure(world: &mut World, treasure: usize, taker: usize, events: &mut Vec<ArenaEvent>) {
    // Report the old spot as gone before moving
    world.agents_mut()[treasure].kill();
    events.extend(world.visible_snapshot(treasure).map(ArenaEvent::AgentState));
    world.relocate_agent(treasure);

    let taker = &mut world.agents_mut()[taker];
    taker.score_up();
    taker.grow_size(TREASURE_SIZE_REWARD);
    if taker.role() == Role::Player {
        events.push(ArenaEvent::Score(taker.score()));
    }
}

/// Kill a non-Treasure agent, optionally crediting a killer
///
/// With no killer the death is attributed to the arena edge. A dead Player
/// requests a reset and reports its final score.
pub fn kill_agent(world: &mut World, victim: usize, killer: Option<usize>, events: &mut Vec<ArenaEvent>) {
    world.agents_mut()[victim].kill();
    let (victim_role, victim_id, victim_score) = {
        let v = &world.agents()[victim];
        (v.role(), v.id(), v.score())
    };

    match killer {
        Some(killer) => {
            let k = &mut world.agents_mut()[killer];
            events.push(ArenaEvent::news(format!(
                "{} {} was killed by {}",
                victim_role,
                victim_id,
                k.role()
            )));
            k.grow_size(KILL_SIZE_REWARD);
            if k.role() == Role::Enforcer {
                k.grow_speed(ENFORCER_SPEED_REWARD);
            }
            // Killer growth is otherwise invisible to the client
            events.extend(world.visible_snapshot(killer).map(ArenaEvent::AgentState));
        }
        None => {
            events.push(ArenaEvent::news(format!(
                "{} {} was killed by the edge",
                victim_role, victim_id
            )));
        }
    }
    events.extend(world.visible_snapshot(victim).map(ArenaEvent::AgentState));

    tracing::debug!("{} {} died (killer: {:?})", victim_role, victim_id, killer);

    if victim_role == Role::Player {
        world.reset_requested = true;
        events.push(ArenaEvent::news(format!("You scored: {} points!", victim_score)));
        events.push(ArenaEvent::Score(victim_score));
    }
}

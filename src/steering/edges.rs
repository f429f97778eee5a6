//! Wall avoidance
//!
//! Walls are checked in the order right, bottom, left, top. Only the first
//! wall whose approach quadrant matches turns the agent, so an agent in a
//! corner resolves one wall per tick.

use crate::core::constants::{EDGE_MARGIN, EDGE_STEER_STEP};
use crate::entity::{Agent, Quadrant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Right,
    Bottom,
    Left,
    Top,
}

/// Heading delta for an agent near `wall` heading into `quadrant`
///
/// `None` when the agent is not approaching that wall.
pub fn wall_turn(wall: Wall, quadrant: Quadrant) -> Option<f64> {
    use Quadrant::*;
    match (wall, quadrant) {
        (Wall::Right, First) => Some(EDGE_STEER_STEP),
        (Wall::Right, Fourth) => Some(-EDGE_STEER_STEP),
        (Wall::Bottom, First) => Some(-EDGE_STEER_STEP),
        (Wall::Bottom, Second) => Some(EDGE_STEER_STEP),
        (Wall::Left, Third) => Some(EDGE_STEER_STEP),
        (Wall::Left, Second) => Some(-EDGE_STEER_STEP),
        (Wall::Top, Third) => Some(-EDGE_STEER_STEP),
        (Wall::Top, Fourth) => Some(EDGE_STEER_STEP),
        _ => None,
    }
}

/// Walls whose margin band the agent is inside, in evaluation order
fn walls_within_margin(agent: &Agent) -> impl Iterator<Item = Wall> {
    let bounds = agent.bounds();
    [
        (Wall::Right, agent.x + EDGE_MARGIN > bounds.width),
        (Wall::Bottom, agent.y + EDGE_MARGIN > bounds.height),
        (Wall::Left, agent.x < EDGE_MARGIN),
        (Wall::Top, agent.y < EDGE_MARGIN),
    ]
    .into_iter()
    .filter_map(|(wall, near)| near.then_some(wall))
}

/// Turn the agent away from the first wall it is approaching
///
/// Returns the wall that caused a turn. Clears `avoiding` when no wall fires.
/// Dead agents, Treasure and the Player are left alone.
pub fn avoid_edges(agent: &mut Agent) -> Option<Wall> {
    if !agent.is_alive() || !agent.role().is_mobile() || !agent.role().steers_automatically() {
        return None;
    }

    let quadrant = agent.quadrant();
    let hit = walls_within_margin(agent)
        .find_map(|wall| wall_turn(wall, quadrant).map(|delta| (wall, delta)));

    match hit {
        Some((wall, delta)) => {
            agent.change_heading(delta);
            agent.avoiding = true;
            Some(wall)
        }
        None => {
            agent.avoiding = false;
            None
        }
    }
}

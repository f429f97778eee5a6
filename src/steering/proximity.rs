//! Proximity micro-avoidance
//!
//! For a nearby pair, the acting agent looks one step ahead along three
//! candidate headings and keeps the one that closes in (when pursuing) or
//! opens up (when evading) the Manhattan distance to the other agent.

use crate::core::constants::PROXIMITY_CORRECTION;
use crate::entity::{Agent, Role};

/// Candidate heading offsets in tie-break order: unchanged, negative, positive
const CANDIDATES: [f64; 3] = [0.0, -PROXIMITY_CORRECTION, PROXIMITY_CORRECTION];

/// True when `other` lies inside the detection box around `agent`
pub fn within_detection(agent: &Agent, other: &Agent, detect_distance: i32) -> bool {
    (agent.x - other.x).abs() <= detect_distance && (agent.y - other.y).abs() <= detect_distance
}

/// Manhattan distance to `other` after one step with the heading offset
pub fn predicted_distance(agent: &Agent, other: &Agent, correction: f64) -> i32 {
    let (dx, dy) = agent.displacement(correction);
    (agent.x + dx - other.x).abs() + (agent.y + dy - other.y).abs()
}

/// Pick the heading offset for `agent` reacting to `other`
///
/// Earlier candidates win ties, so "no correction" beats the negative
/// correction, which beats the positive one.
pub fn choose_correction(agent: &Agent, other: &Agent) -> f64 {
    let pursuing = agent.role().pursues(other.role());
    let mut best = CANDIDATES[0];
    let mut best_distance = predicted_distance(agent, other, best);

    for &correction in &CANDIDATES[1..] {
        let distance = predicted_distance(agent, other, correction);
        let better = if pursuing {
            distance < best_distance
        } else {
            distance > best_distance
        };
        if better {
            best = correction;
            best_distance = distance;
        }
    }
    best
}

/// Whether `agent` reacts to `other` at all
///
/// The Player never steers automatically. An agent busy avoiding a wall
/// ignores everyone except the Player.
pub fn reacts_to(agent: &Agent, other: &Agent) -> bool {
    if !agent.role().steers_automatically() {
        return false;
    }
    !agent.avoiding || other.role() == Role::Player
}

/// Steer `agent` relative to `other`, returning the applied offset
pub fn avoid_collision(agent: &mut Agent, other: &Agent) -> Option<f64> {
    if !reacts_to(agent, other) {
        return None;
    }
    let correction = choose_correction(agent, other);
    agent.change_heading(correction);
    Some(correction)
}

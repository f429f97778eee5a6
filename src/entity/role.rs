//! Agent roles
//!
//! The role is fixed at creation and drives every behavioral branch:
//! movement, steering eligibility, pursuit vs. evasion, and combat outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::constants::{BASE_SPEED, ENFORCER_SPEED_OFFSET, PLAYER_SPEED_OFFSET};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Wandering animal; chases Treasure, evades everything else
    Prey,
    /// Stationary prize; relocated when taken, never removed
    Treasure,
    /// The single human-controlled agent
    Player,
    /// Predator that hunts every non-Enforcer
    Enforcer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Prey, Role::Treasure, Role::Player, Role::Enforcer];

    /// Speed at spawn
    pub fn spawn_speed(self) -> f64 {
        match self {
            Role::Enforcer => BASE_SPEED + ENFORCER_SPEED_OFFSET,
            Role::Player => BASE_SPEED + PLAYER_SPEED_OFFSET,
            Role::Prey | Role::Treasure => BASE_SPEED,
        }
    }

    /// Whether the agent moves on its own each tick
    pub fn is_mobile(self) -> bool {
        !matches!(self, Role::Treasure)
    }

    /// Whether the automatic steering heuristics may touch this agent's heading
    pub fn steers_automatically(self) -> bool {
        !matches!(self, Role::Player)
    }

    /// Whether an agent with this role closes in on `other` instead of evading it
    pub fn pursues(self, other: Role) -> bool {
        match (self, other) {
            (Role::Enforcer, Role::Enforcer) => false,
            (Role::Enforcer, _) => true,
            (Role::Prey | Role::Player, Role::Treasure) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Prey => "Prey",
            Role::Treasure => "Treasure",
            Role::Player => "Player",
            Role::Enforcer => "Enforcer",
        };
        f.write_str(name)
    }
}

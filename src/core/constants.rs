//! Fixed movement and steering constants
//!
//! Values that the arena rules treat as fixed. Tunable values live in
//! `ArenaConfig` instead.

use std::f64::consts::PI;

/// Minimum distance from every wall at spawn, and the band in which
/// edge avoidance starts turning an agent away.
pub const EDGE_MARGIN: i32 = 50;

/// Heading change applied per tick by edge avoidance
pub const EDGE_STEER_STEP: f64 = PI / 10.0;

/// Candidate heading offset evaluated by proximity avoidance
pub const PROXIMITY_CORRECTION: f64 = PI / 6.0;

/// Heading change applied by a single player steer command
pub const PLAYER_TURN: f64 = PI / 6.0;

/// Speed change applied by a single player speed command
pub const PLAYER_SPEED_STEP: f64 = 2.0;

/// Upper bound (exclusive) of the random wander perturbation
pub const WANDER_MAX: f64 = PI / 2.0;

// Kinematics at spawn
pub const BASE_SPEED: f64 = 5.0;
pub const BASE_SIZE: i32 = 8;
pub const ENFORCER_SPEED_OFFSET: f64 = -1.0;
pub const PLAYER_SPEED_OFFSET: f64 = -2.0;

// Combat rewards
pub const TREASURE_SIZE_REWARD: i32 = 1;
pub const KILL_SIZE_REWARD: i32 = 2;
pub const ENFORCER_SPEED_REWARD: f64 = 1.0;

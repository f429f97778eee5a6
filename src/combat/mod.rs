//! Collision detection and combat outcomes

pub mod resolution;

pub use resolution::{classify, is_hit, kill_agent, resolve_collision, take_treasure, Resolution, Side};

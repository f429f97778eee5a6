//! Animal Arena - pursuit and evasion on a bounded plane
//!
//! Autonomous Prey, Enforcers and Treasure share a rectangular arena with a
//! single externally steered Player. Each tick moves every agent, steers it
//! away from walls and neighbours, resolves collisions and reports what is in
//! view. The driver paces ticks in bounded batches and resets the arena when
//! the Player dies or a reset is requested.

pub mod broadcast;
pub mod combat;
pub mod command;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod steering;
pub mod world;

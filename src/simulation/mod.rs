//! Simulation loop: per-tick pipeline, population lifecycle and the batch driver

pub mod driver;
pub mod population;
pub mod tick;

pub use driver::{ArenaDriver, BatchExit, BatchPhase, BatchReport, SharedWorld, TickBudget};
pub use population::{add_agents, reap_dead, reset_arena, ReapSummary};
pub use tick::run_tick;

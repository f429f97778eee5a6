pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::ArenaConfig;
pub use error::{ArenaError, Result};
pub use types::{AgentId, ArenaBounds, Tick};

//! Control input
//!
//! Text commands from the outside world are parsed into `ControlCommand`s and
//! applied to the arena under the world lock.

pub mod control;

pub use control::ControlCommand;

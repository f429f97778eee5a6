//! Player and run-mode control commands

use std::fmt;
use std::str::FromStr;

use crate::broadcast::ArenaEvent;
use crate::core::constants::{PLAYER_SPEED_STEP, PLAYER_TURN};
use crate::core::error::{ArenaError, Result};
use crate::world::World;

/// A control input accepted while the arena runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    SteerLeft,
    SteerRight,
    SpeedUp,
    SpeedDown,
    ResetNow,
    TogglePause,
}

impl ControlCommand {
    pub const ALL: [ControlCommand; 6] = [
        ControlCommand::SteerLeft,
        ControlCommand::SteerRight,
        ControlCommand::SpeedUp,
        ControlCommand::SpeedDown,
        ControlCommand::ResetNow,
        ControlCommand::TogglePause,
    ];

    /// Canonical wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::SteerLeft => "steer-left",
            ControlCommand::SteerRight => "steer-right",
            ControlCommand::SpeedUp => "speed-up",
            ControlCommand::SpeedDown => "speed-down",
            ControlCommand::ResetNow => "reset-now",
            ControlCommand::TogglePause => "toggle-pause",
        }
    }

    /// Short single-word form accepted from older clients
    pub fn alias(&self) -> &'static str {
        match self {
            ControlCommand::SteerLeft => "left",
            ControlCommand::SteerRight => "right",
            ControlCommand::SpeedUp => "up",
            ControlCommand::SpeedDown => "down",
            ControlCommand::ResetNow => "reset",
            ControlCommand::TogglePause => "pause",
        }
    }

    /// Whether the command acts on the Player agent
    pub fn needs_player(&self) -> bool {
        matches!(
            self,
            ControlCommand::SteerLeft
                | ControlCommand::SteerRight
                | ControlCommand::SpeedUp
                | ControlCommand::SpeedDown
        )
    }

    /// Whether a sleeping batch should wake up to notice the command
    pub fn interrupts_batch(&self) -> bool {
        matches!(self, ControlCommand::ResetNow)
    }

    /// Apply the command to the arena
    ///
    /// Player commands fail with `NoPlayer` between a Player death and the
    /// next reset. The returned events are meant to be delivered after the
    /// world lock is released.
    pub fn apply(self, world: &mut World) -> Result<Vec<ArenaEvent>> {
        let mut events = Vec::new();
        match self {
            ControlCommand::SteerLeft => player(world)?.change_heading(-PLAYER_TURN),
            ControlCommand::SteerRight => player(world)?.change_heading(PLAYER_TURN),
            ControlCommand::SpeedUp => player(world)?.grow_speed(PLAYER_SPEED_STEP),
            ControlCommand::SpeedDown => player(world)?.grow_speed(-PLAYER_SPEED_STEP),
            ControlCommand::ResetNow => {
                tracing::info!("Reset requested");
                world.reset_requested = true;
            }
            ControlCommand::TogglePause => {
                world.paused = !world.paused;
                let message = if world.paused {
                    "Game paused"
                } else {
                    "Game continued!"
                };
                tracing::info!("{}", message);
                events.push(ArenaEvent::news(message));
            }
        }
        Ok(events)
    }
}

fn player(world: &mut World) -> Result<&mut crate::entity::Agent> {
    world.player_mut().ok_or(ArenaError::NoPlayer)
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlCommand {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        ControlCommand::ALL
            .into_iter()
            .find(|cmd| {
                cmd.name().eq_ignore_ascii_case(input) || cmd.alias().eq_ignore_ascii_case(input)
            })
            .ok_or_else(|| ArenaError::UnknownCommand(input.to_string()))
    }
}

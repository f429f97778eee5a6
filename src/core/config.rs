//! Arena configuration with documented defaults
//!
//! Every tunable value of the arena lives here. Fixed rule constants
//! (steering steps, spawn kinematics) live in `core::constants`.

use std::path::Path;

use serde::Deserialize;

use crate::core::constants::{BASE_SIZE, EDGE_MARGIN};
use crate::core::error::{ArenaError, Result};
use crate::core::types::ArenaBounds;

/// Configuration for one arena and its run-batch driver
///
/// Missing fields in a TOML file fall back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === ARENA ===
    /// Arena width in world units
    pub arena_width: i32,

    /// Arena height in world units
    pub arena_height: i32,

    // === VIEWPORT ===
    /// Width of the visible sub-rectangle that gates state reports
    pub viewport_width: i32,

    /// Height of the visible sub-rectangle that gates state reports
    pub viewport_height: i32,

    /// The viewport scrolls once the Player comes closer than this to its edge
    pub viewport_follow_margin: i32,

    // === POPULATION ===
    /// Prey quota N on reset. Enforcers get N/4, Treasure N/3, plus one Player.
    pub prey_count: u32,

    /// Non-Treasure deaths that trigger a Prey top-up
    pub top_up_threshold: u32,

    /// Prey spawned per top-up
    pub top_up_count: u32,

    // === STEERING ===
    /// Proximity detection half-extent as a multiple of the Player's size
    ///
    /// The box grows with the Player, so a growing Player sees reactions
    /// from farther away.
    pub detect_factor: i32,

    /// Steps between random wander perturbations
    pub wander_interval: u32,

    // === DRIVER ===
    /// Bounded number of active (unpaused) ticks per run batch
    pub max_ticks_per_batch: u32,

    /// Delay between ticks inside a run batch
    pub tick_delay_ms: u64,

    /// Pause before repopulating on reset
    pub reset_delay_ms: u64,

    /// Cadence at which the harness invokes a run batch
    pub batch_interval_ms: u64,

    /// Delay before the harness invokes the first run batch
    pub initial_delay_ms: u64,

    /// Seed for the world RNG; entropy when absent
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            arena_width: 2400,
            arena_height: 1400,

            viewport_width: 1200,
            viewport_height: 700,
            viewport_follow_margin: 250,

            prey_count: 30,
            top_up_threshold: 4,
            top_up_count: 2,

            detect_factor: 8,
            wander_interval: 12,

            max_ticks_per_batch: 100,
            tick_delay_ms: 50,
            reset_delay_ms: 2000,
            batch_interval_ms: 5000,
            initial_delay_ms: 3000,

            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: ArenaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn bounds(&self) -> ArenaBounds {
        ArenaBounds::new(self.arena_width, self.arena_height)
    }

    /// Enforcer quota derived from the Prey quota
    pub fn enforcer_count(&self) -> u32 {
        self.prey_count / 4
    }

    /// Treasure quota derived from the Prey quota
    pub fn treasure_count(&self) -> u32 {
        self.prey_count / 3
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        // Spawning needs an interior at least EDGE_MARGIN from every wall
        if self.arena_width <= 2 * EDGE_MARGIN || self.arena_height <= 2 * EDGE_MARGIN {
            return Err(ArenaError::InvalidConfig(format!(
                "arena {}x{} must exceed {} units in both axes",
                self.arena_width,
                self.arena_height,
                2 * EDGE_MARGIN
            )));
        }

        if self.viewport_width <= 0
            || self.viewport_height <= 0
            || self.viewport_width > self.arena_width
            || self.viewport_height > self.arena_height
        {
            return Err(ArenaError::InvalidConfig(format!(
                "viewport {}x{} must fit inside arena {}x{}",
                self.viewport_width, self.viewport_height, self.arena_width, self.arena_height
            )));
        }

        if self.viewport_follow_margin < 0
            || 2 * self.viewport_follow_margin > self.viewport_width.min(self.viewport_height)
        {
            return Err(ArenaError::InvalidConfig(format!(
                "viewport_follow_margin ({}) must be within half the viewport",
                self.viewport_follow_margin
            )));
        }

        if self.max_ticks_per_batch == 0 {
            return Err(ArenaError::InvalidConfig(
                "max_ticks_per_batch must be positive".into(),
            ));
        }

        if self.batch_interval_ms == 0 {
            return Err(ArenaError::InvalidConfig(
                "batch_interval_ms must be positive".into(),
            ));
        }

        if self.top_up_threshold == 0 {
            return Err(ArenaError::InvalidConfig(
                "top_up_threshold must be positive".into(),
            ));
        }

        if self.detect_factor <= 0 || self.wander_interval == 0 {
            return Err(ArenaError::InvalidConfig(
                "detect_factor and wander_interval must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Proximity detection half-extent for a Player of the given size
    pub fn detect_distance(&self, player_size: Option<i32>) -> i32 {
        player_size.unwrap_or(BASE_SIZE) * self.detect_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enforcer_count(), 7);
        assert_eq!(config.treasure_count(), 10);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ArenaConfig::parse_toml("prey_count = 12\nseed = 42\n").unwrap();
        assert_eq!(config.prey_count, 12);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.arena_width, 2400);
        assert_eq!(config.tick_delay_ms, 50);
    }

    #[test]
    fn test_rejects_tiny_arena() {
        let result = ArenaConfig::parse_toml("arena_width = 90\nviewport_width = 80\n");
        assert!(matches!(result, Err(ArenaError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_viewport_larger_than_arena() {
        let config = ArenaConfig {
            viewport_width: 3000,
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_batch_budget() {
        let config = ArenaConfig {
            max_ticks_per_batch: 0,
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = ArenaConfig::parse_toml("prey_count = \"lots\"");
        assert!(matches!(result, Err(ArenaError::ConfigParse(_))));
    }

    #[test]
    fn test_detect_distance_scales_with_player() {
        let config = ArenaConfig::default();
        assert_eq!(config.detect_distance(Some(10)), 80);
        assert_eq!(config.detect_distance(None), BASE_SIZE * 8);
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let config = ArenaConfig::parse_toml(include_str!("../../data/arena.toml")).unwrap();
        assert_eq!(config.prey_count, ArenaConfig::default().prey_count);
        assert_eq!(config.bounds(), ArenaConfig::default().bounds());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_rejects_zero_batch_interval() {
        let config = ArenaConfig {
            batch_interval_ms: 0,
            ..ArenaConfig::default()
        };
        assert!(matches!(config.validate(), Err(ArenaError::InvalidConfig(_))));
    }
}

//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for agents
///
/// Assigned from a monotonically increasing counter at spawn; never reused
/// while the agent is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Arena dimensions in integer world units, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: i32,
    pub height: i32,
}

impl ArenaBounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when a box of half-extent `size` anchored at (x, y) lies inside the arena
    pub fn contains_box(&self, x: i32, y: i32, size: i32) -> bool {
        x >= 0 && y >= 0 && x + size <= self.width && y + size <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_ordering() {
        assert!(AgentId(1) < AgentId(2));
        assert_eq!(AgentId(7).to_string(), "7");
    }

    #[test]
    fn test_contains_box_edges() {
        let bounds = ArenaBounds::new(100, 50);
        assert!(bounds.contains_box(0, 0, 8));
        assert!(bounds.contains_box(92, 42, 8));
        assert!(!bounds.contains_box(93, 10, 8));
        assert!(!bounds.contains_box(10, 43, 8));
        assert!(!bounds.contains_box(-1, 10, 8));
        assert!(!bounds.contains_box(10, -1, 8));
    }
}

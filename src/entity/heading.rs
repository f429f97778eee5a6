//! Headings and quadrants
//!
//! Angles are in radians with y pointing down, so quadrant 1 heads
//! right-and-down, quadrant 2 left-and-down, quadrant 3 left-and-up and
//! quadrant 4 right-and-up.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub const EAST: f64 = 0.0;
pub const SOUTH: f64 = FRAC_PI_2;
pub const WEST: f64 = PI;
pub const NORTH: f64 = 1.5 * PI;

/// One of four 90° heading ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Quadrant {
    /// `[0, π/2)`
    First = 1,
    /// `[π/2, π)`
    Second = 2,
    /// `[π, 3π/2)`
    Third = 3,
    /// `[3π/2, 2π)`
    Fourth = 4,
}

impl Quadrant {
    /// Classify a heading already normalized into `[0, 2π)`
    pub fn of(heading: f64) -> Self {
        if heading < SOUTH {
            Quadrant::First
        } else if heading < WEST {
            Quadrant::Second
        } else if heading < NORTH {
            Quadrant::Third
        } else {
            Quadrant::Fourth
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

/// Wrap any finite angle into `[0, 2π)`
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_quadrant_boundaries() {
        assert_eq!(Quadrant::of(0.0), Quadrant::First);
        assert_eq!(Quadrant::of(SOUTH), Quadrant::Second);
        assert_eq!(Quadrant::of(WEST), Quadrant::Third);
        assert_eq!(Quadrant::of(NORTH), Quadrant::Fourth);
        assert_eq!(Quadrant::of(TAU - 1e-9), Quadrant::Fourth);
    }

    #[test]
    fn test_normalize_wraps_both_directions() {
        assert!((normalize(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((normalize(-0.5) - (TAU - 0.5)).abs() < 1e-12);
        assert_eq!(normalize(TAU), 0.0);
        assert_eq!(normalize(-1e-18), 0.0);
    }

    proptest! {
        #[test]
        fn prop_normalized_heading_in_range(angle in -100.0f64..100.0) {
            let h = normalize(angle);
            prop_assert!((0.0..TAU).contains(&h));
        }

        #[test]
        fn prop_quadrant_matches_angle_range(angle in -100.0f64..100.0) {
            let h = normalize(angle);
            let expected = (h / FRAC_PI_2).floor() as u8 + 1;
            prop_assert_eq!(Quadrant::of(h).number(), expected.min(4));
        }
    }
}

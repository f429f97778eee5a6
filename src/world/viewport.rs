//! Visible sub-rectangle of the arena
//!
//! The viewport decides which agent updates are worth transmitting. It
//! follows the Player and is always clamped to `[0, W-w] × [0, H-h]`.

use serde::Serialize;

use crate::core::types::ArenaBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Center on a point, then clamp into the arena
    pub fn center_on(&mut self, x: i32, y: i32, bounds: ArenaBounds) {
        self.x = x - self.width / 2;
        self.y = y - self.height / 2;
        self.clamp(bounds);
    }

    /// Scroll so that (x, y) stays at least `margin` from every viewport edge
    pub fn follow(&mut self, x: i32, y: i32, margin: i32, bounds: ArenaBounds) {
        if x > self.x + self.width - margin {
            self.x = x + margin - self.width;
        }
        if y > self.y + self.height - margin {
            self.y = y + margin - self.height;
        }
        if x < self.x + margin {
            self.x = x - margin;
        }
        if y < self.y + margin {
            self.y = y - margin;
        }
        self.clamp(bounds);
    }

    pub fn clamp(&mut self, bounds: ArenaBounds) {
        self.x = self.x.clamp(0, (bounds.width - self.width).max(0));
        self.y = self.y.clamp(0, (bounds.height - self.height).max(0));
    }

    /// True when a box of half-extent `size` at (x, y) overlaps the viewport
    pub fn intersects(&self, x: i32, y: i32, size: i32) -> bool {
        x + size >= self.x
            && y + size >= self.y
            && x <= self.x + self.width
            && y <= self.y + self.height
    }

    /// Translate arena coordinates into viewport coordinates
    pub fn to_local(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.x, y - self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ArenaBounds {
        ArenaBounds::new(2400, 1400)
    }

    #[test]
    fn test_center_clamps_to_arena() {
        let mut vp = Viewport::new(1200, 700);
        vp.center_on(100, 100, bounds());
        assert_eq!((vp.x, vp.y), (0, 0));

        vp.center_on(2350, 1350, bounds());
        assert_eq!((vp.x, vp.y), (1200, 700));

        vp.center_on(1200, 700, bounds());
        assert_eq!((vp.x, vp.y), (600, 350));
    }

    #[test]
    fn test_follow_scrolls_near_edges() {
        let mut vp = Viewport::new(1200, 700);
        vp.center_on(1200, 700, bounds());

        // Inside the comfort zone: no scroll
        vp.follow(1200, 700, 250, bounds());
        assert_eq!((vp.x, vp.y), (600, 350));

        // Within 250 of the right edge (600 + 1200 - 250 = 1550)
        vp.follow(1600, 700, 250, bounds());
        assert_eq!(vp.x, 1600 + 250 - 1200);

        // Within 250 of the top edge
        vp.follow(1600, 500, 250, bounds());
        assert_eq!(vp.y, 250);
    }

    #[test]
    fn test_follow_never_leaves_arena() {
        let mut vp = Viewport::new(1200, 700);
        vp.follow(2399, 1399, 250, bounds());
        assert_eq!((vp.x, vp.y), (1200, 700));
        vp.follow(0, 0, 250, bounds());
        assert_eq!((vp.x, vp.y), (0, 0));
    }

    #[test]
    fn test_intersects_counts_partial_overlap() {
        let vp = Viewport {
            x: 100,
            y: 100,
            width: 200,
            height: 100,
        };
        assert!(vp.intersects(150, 150, 8));
        assert!(vp.intersects(95, 95, 8));
        assert!(!vp.intersects(80, 150, 8));
        assert!(!vp.intersects(150, 201, 8));
        assert_eq!(vp.to_local(150, 120), (50, 20));
    }
}

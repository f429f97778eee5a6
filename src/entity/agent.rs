//! Mobile arena agent
//!
//! Position is integer arena coordinates; motion uses truncated
//! trigonometric steps, not a physics model.

use rand::Rng;
use std::f64::consts::TAU;

use crate::core::constants::{BASE_SIZE, EDGE_MARGIN, WANDER_MAX};
use crate::core::types::{AgentId, ArenaBounds};
use crate::entity::heading::{normalize, Quadrant};
use crate::entity::role::Role;

/// A single simulated entity
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    role: Role,
    bounds: ArenaBounds,
    pub x: i32,
    pub y: i32,
    heading: f64,
    quadrant: Quadrant,
    pub speed: f64,
    pub size: i32,
    alive: bool,
    /// Set while edge avoidance is actively turning the agent; suppresses wander
    pub avoiding: bool,
    steps_alive: u32,
    correction_count: u32,
    score: u32,
}

impl Agent {
    /// Spawn at a random interior point at least `EDGE_MARGIN` from every
    /// wall with a uniformly random heading.
    pub fn spawn<R: Rng + ?Sized>(id: AgentId, role: Role, bounds: ArenaBounds, rng: &mut R) -> Self {
        let mut agent = Self {
            id,
            role,
            bounds,
            x: 0,
            y: 0,
            heading: 0.0,
            quadrant: Quadrant::First,
            speed: role.spawn_speed(),
            size: BASE_SIZE,
            alive: true,
            avoiding: false,
            steps_alive: 0,
            correction_count: 0,
            score: 0,
        };
        agent.place_randomly(rng);
        // Initial placement is not a correction
        agent.correction_count = 0;
        agent
    }

    /// Move to a hand-picked position, bypassing random placement
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set an explicit heading, routed through `change_heading`
    pub fn with_heading(mut self, heading: f64) -> Self {
        let delta = heading - self.heading;
        self.change_heading(delta);
        self.correction_count = 0;
        self
    }

    fn place_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.x = rng.gen_range(EDGE_MARGIN..=self.bounds.width - EDGE_MARGIN);
        self.y = rng.gen_range(EDGE_MARGIN..=self.bounds.height - EDGE_MARGIN);
        let delta = rng.gen_range(0.0..TAU) - self.heading;
        self.change_heading(delta);
        self.alive = true;
    }

    /// Move a taken Treasure to a fresh random spot and revive it
    pub fn relocate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.place_randomly(rng);
    }

    /// Advance one tick along the current heading
    ///
    /// Every `wander_interval` steps a wall-free, non-Player agent turns by a
    /// random amount in `[0, π/2)`.
    pub fn step<R: Rng + ?Sized>(&mut self, wander_interval: u32, rng: &mut R) {
        if !self.alive || !self.role.is_mobile() {
            return;
        }
        self.steps_alive += 1;
        let (dx, dy) = self.displacement(0.0);
        self.x += dx;
        self.y += dy;

        if self.steps_alive % wander_interval == 0 && !self.avoiding && self.role.steers_automatically() {
            self.change_heading(rng.gen_range(0.0..WANDER_MAX));
        }
    }

    /// One-step displacement if the heading were offset by `correction`
    ///
    /// Components are truncated toward zero, not rounded.
    pub fn displacement(&self, correction: f64) -> (i32, i32) {
        let angle = self.heading + correction;
        (
            (angle.cos() * self.speed) as i32,
            (angle.sin() * self.speed) as i32,
        )
    }

    /// The only path by which heading and quadrant change
    pub fn change_heading(&mut self, delta: f64) {
        self.heading = normalize(self.heading + delta);
        self.quadrant = Quadrant::of(self.heading);
        self.correction_count += 1;
    }

    /// Mark dead and clamp into the arena so the corpse renders on screen
    pub fn kill(&mut self) {
        self.alive = false;
        self.x = self.x.max(0);
        self.y = self.y.max(0);
        if self.x + self.size > self.bounds.width {
            self.x = self.bounds.width - self.size;
        }
        if self.y + self.size > self.bounds.height {
            self.y = self.bounds.height - self.size;
        }
    }

    pub fn score_up(&mut self) {
        self.score += 1;
    }

    pub fn grow_size(&mut self, delta: i32) {
        self.size += delta;
    }

    pub fn grow_speed(&mut self, delta: f64) {
        self.speed += delta;
    }

    /// True when the agent's box has left the arena
    pub fn is_out_of_bounds(&self) -> bool {
        !self.bounds.contains_box(self.x, self.y, self.size)
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn steps_alive(&self) -> u32 {
        self.steps_alive
    }

    pub fn correction_count(&self) -> u32 {
        self.correction_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.bounds
    }
}

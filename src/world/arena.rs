//! Arena world - owns every live agent and the run-mode flags

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::broadcast::AgentSnapshot;
use crate::core::config::ArenaConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, ArenaBounds, Tick};
use crate::entity::{Agent, Role};
use crate::world::viewport::Viewport;

/// Why a run batch should stop early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    PopulationEmpty,
    ResetRequested,
}

/// The live arena
///
/// Created once and reset in place; never reconstructed between rounds.
pub struct World {
    config: ArenaConfig,
    agents: Vec<Agent>,
    player: Option<AgentId>,
    /// Non-Treasure deaths since the last top-up
    dead_counter: u32,
    next_agent_id: u32,
    viewport: Viewport,
    /// Set by a Player death or a reset command; consumed by the driver
    pub reset_requested: bool,
    /// Freezes movement and steering while set
    pub paused: bool,
    rng: ChaCha8Rng,
    pub current_tick: Tick,
    /// Number of resets performed so far
    generation: u32,
}

impl World {
    /// An empty arena that requests a reset before its first batch
    ///
    /// Fails with `InvalidConfig` when the config would make spawning or
    /// stepping impossible.
    pub fn new(config: ArenaConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let viewport = Viewport::new(config.viewport_width, config.viewport_height);

        Ok(Self {
            config,
            agents: Vec::new(),
            player: None,
            dead_counter: 0,
            next_agent_id: 1,
            viewport,
            reset_requested: true,
            paused: false,
            rng,
            current_tick: 0,
            generation: 0,
        })
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.config.bounds()
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // === AGENTS ===

    /// Build a randomly placed agent with the next id, without inserting it
    pub fn create_agent(&mut self, role: Role) -> Agent {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        let bounds = self.bounds();
        Agent::spawn(id, role, bounds, &mut self.rng)
    }

    /// Add an agent to the live set
    ///
    /// A `Player` replaces the player reference.
    pub fn insert_agent(&mut self, agent: Agent) -> AgentId {
        let id = agent.id();
        self.next_agent_id = self.next_agent_id.max(id.0 + 1);
        if agent.role() == Role::Player {
            self.player = Some(id);
        }
        self.agents.push(agent);
        id
    }

    pub fn spawn_agent(&mut self, role: Role) -> AgentId {
        let agent = self.create_agent(role);
        self.insert_agent(agent)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Agents and the RNG borrowed together, for per-agent random draws
    pub fn agents_and_rng_mut(&mut self) -> (&mut [Agent], &mut ChaCha8Rng) {
        (&mut self.agents, &mut self.rng)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id() == id)
    }

    /// Move the agent at `idx` to a fresh random spot and revive it
    pub fn relocate_agent(&mut self, idx: usize) {
        if let Some(agent) = self.agents.get_mut(idx) {
            agent.relocate(&mut self.rng);
        }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.agents.iter().filter(|a| a.role() == role).count()
    }

    /// Remove every agent matching the predicate, returning how many went
    pub fn remove_agents_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Agent) -> bool,
    {
        let before = self.agents.len();
        self.agents.retain(|a| !predicate(a));
        if let Some(player) = self.player {
            if !self.agents.iter().any(|a| a.id() == player) {
                self.player = None;
            }
        }
        before - self.agents.len()
    }

    /// Drop every agent and restart id allocation
    pub fn clear_agents(&mut self) {
        self.agents.clear();
        self.player = None;
        self.dead_counter = 0;
        self.next_agent_id = 1;
    }

    // === PLAYER ===

    pub fn player_id(&self) -> Option<AgentId> {
        self.player
    }

    pub fn player(&self) -> Option<&Agent> {
        self.player.and_then(|id| self.agent(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Agent> {
        let id = self.player?;
        self.agent_mut(id)
    }

    // === COUNTERS ===

    pub fn dead_counter(&self) -> u32 {
        self.dead_counter
    }

    /// Add deaths to the counter, returning the new total
    pub fn record_deaths(&mut self, deaths: u32) -> u32 {
        self.dead_counter += deaths;
        self.dead_counter
    }

    pub fn reset_dead_counter(&mut self) {
        self.dead_counter = 0;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn begin_generation(&mut self) {
        self.generation += 1;
        self.current_tick = 0;
    }

    // === VIEWPORT ===

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Center the viewport on the Player
    pub fn center_viewport(&mut self) {
        let bounds = self.bounds();
        if let Some((x, y)) = self.player().map(|p| (p.x, p.y)) {
            self.viewport.center_on(x, y, bounds);
        }
    }

    /// Scroll the viewport after the Player and clamp it
    pub fn follow_player(&mut self) {
        let bounds = self.bounds();
        let margin = self.config.viewport_follow_margin;
        if let Some((x, y)) = self.player().map(|p| (p.x, p.y)) {
            self.viewport.follow(x, y, margin, bounds);
        }
    }

    /// Snapshot of the agent at `idx` if its box intersects the viewport
    pub fn visible_snapshot(&self, idx: usize) -> Option<AgentSnapshot> {
        let agent = self.agents.get(idx)?;
        if !self.viewport.intersects(agent.x, agent.y, agent.size) {
            return None;
        }
        Some(AgentSnapshot::from_agent(agent, &self.viewport))
    }

    /// Proximity detection half-extent, scaled by the Player's size
    pub fn detect_distance(&self) -> i32 {
        self.config.detect_distance(self.player().map(|p| p.size))
    }

    /// Reason to stop the current run batch, if any
    pub fn halt_reason(&self) -> Option<HaltReason> {
        if self.reset_requested {
            Some(HaltReason::ResetRequested)
        } else if self.agents.is_empty() {
            Some(HaltReason::PopulationEmpty)
        } else {
            None
        }
    }
}

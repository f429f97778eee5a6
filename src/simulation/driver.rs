//! Run-batch driver
//!
//! Owns the shared world and paces ticks in bounded batches:
//!
//! ```text
//! Idle -> (reset pending?) Resetting -> Running -> Idle
//! ```
//!
//! A batch runs at most `max_ticks_per_batch` unpaused ticks and stops early
//! when a reset is requested or the population empties. Events are produced
//! under the world lock and delivered after it is released. Every sleep is
//! cancellable by shutdown, and a reset command cuts the inter-tick delay
//! short.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Notify};
use tokio::time::MissedTickBehavior;

use crate::broadcast::{dispatch, ArenaEvent, Broadcaster};
use crate::command::ControlCommand;
use crate::core::error::{ArenaError, Result};
use crate::simulation::population::reset_arena;
use crate::simulation::tick::run_tick;
use crate::world::{HaltReason, World};

/// World handle shared between the driver and control input
pub type SharedWorld = Arc<Mutex<World>>;

/// Where the driver is in its batch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Resetting,
    Running,
}

/// How a run batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchExit {
    /// The tick budget was used up
    Completed,
    PopulationEmpty,
    ResetRequested,
    /// Shutdown was signalled during a sleep
    Cancelled,
    /// Another batch held the gate; nothing ran
    AlreadyRunning,
}

impl From<HaltReason> for BatchExit {
    fn from(reason: HaltReason) -> Self {
        match reason {
            HaltReason::PopulationEmpty => BatchExit::PopulationEmpty,
            HaltReason::ResetRequested => BatchExit::ResetRequested,
        }
    }
}

/// Summary of one run batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub exit: BatchExit,
    pub reset_performed: bool,
    pub active_ticks: u32,
    pub paused_ticks: u32,
    /// Live population when the batch ended
    pub survivors: usize,
}

impl BatchReport {
    fn skipped() -> Self {
        Self {
            exit: BatchExit::AlreadyRunning,
            reset_performed: false,
            active_ticks: 0,
            paused_ticks: 0,
            survivors: 0,
        }
    }
}

/// Tick allowance for one batch; paused ticks are free
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickBudget {
    max: u32,
    active: u32,
    paused: u32,
}

impl TickBudget {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            active: 0,
            paused: 0,
        }
    }

    pub fn record(&mut self, paused: bool) {
        if paused {
            self.paused += 1;
        } else {
            self.active += 1;
        }
    }

    pub fn exhausted(&self) -> bool {
        self.active >= self.max
    }

    pub fn active(&self) -> u32 {
        self.active
    }

    pub fn paused(&self) -> u32 {
        self.paused
    }
}

/// Why a driver sleep ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Elapsed,
    Interrupted,
    Shutdown,
}

enum Step {
    Halted(HaltReason),
    Ticked {
        events: Vec<ArenaEvent>,
        paused: bool,
        halt: Option<HaltReason>,
    },
}

/// Drives the arena in run batches
pub struct ArenaDriver {
    world: SharedWorld,
    broadcaster: Arc<dyn Broadcaster>,
    max_ticks: u32,
    tick_delay: Duration,
    reset_delay: Duration,
    batch_interval: Duration,
    initial_delay: Duration,
    /// Held for the whole of a batch; overlapping invocations are skipped
    batch_gate: Mutex<()>,
    /// Wakes a batch sleeping between ticks; stores no permit when none is
    interrupt: Notify,
    shutdown: watch::Receiver<bool>,
    phase: watch::Sender<BatchPhase>,
}

impl ArenaDriver {
    /// Wrap a world; timing is read from its config
    pub fn new(
        world: World,
        broadcaster: Arc<dyn Broadcaster>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let config = world.config();
        let max_ticks = config.max_ticks_per_batch;
        let tick_delay = Duration::from_millis(config.tick_delay_ms);
        let reset_delay = Duration::from_millis(config.reset_delay_ms);
        let batch_interval = Duration::from_millis(config.batch_interval_ms.max(1));
        let initial_delay = Duration::from_millis(config.initial_delay_ms);
        let (phase, _) = watch::channel(BatchPhase::Idle);

        Self {
            world: Arc::new(Mutex::new(world)),
            max_ticks,
            tick_delay,
            reset_delay,
            batch_interval,
            initial_delay,
            broadcaster,
            batch_gate: Mutex::new(()),
            interrupt: Notify::new(),
            shutdown,
            phase,
        }
    }

    pub fn world(&self) -> SharedWorld {
        Arc::clone(&self.world)
    }

    pub fn phase(&self) -> BatchPhase {
        *self.phase.borrow()
    }

    pub fn watch_phase(&self) -> watch::Receiver<BatchPhase> {
        self.phase.subscribe()
    }

    /// Run one batch: reset if pending, then tick until the budget or a halt
    pub async fn run_batch(&self) -> BatchReport {
        let Ok(_gate) = self.batch_gate.try_lock() else {
            tracing::debug!("Run batch already in progress, skipping");
            return BatchReport::skipped();
        };

        let mut report = self.drive().await;
        report.survivors = self.world.lock().await.agent_count();
        self.phase.send_replace(BatchPhase::Idle);

        tracing::info!(
            "Batch ended ({:?}) after {} ticks, {} paused; {} agents alive",
            report.exit,
            report.active_ticks,
            report.paused_ticks,
            report.survivors
        );
        report
    }

    async fn drive(&self) -> BatchReport {
        let mut budget = TickBudget::new(self.max_ticks);
        let mut reset_performed = false;
        let finish = |exit, budget: &TickBudget, reset_performed| BatchReport {
            exit,
            reset_performed,
            active_ticks: budget.active(),
            paused_ticks: budget.paused(),
            survivors: 0,
        };

        let reset_due = self.world.lock().await.reset_requested;
        if reset_due {
            self.phase.send_replace(BatchPhase::Resetting);
            if self.pause_for(self.reset_delay, false).await == Wake::Shutdown {
                return finish(BatchExit::Cancelled, &budget, false);
            }
            let events = reset_arena(&mut *self.world.lock().await);
            self.deliver(&events);
            reset_performed = true;
        }

        self.phase.send_replace(BatchPhase::Running);
        tracing::debug!("Start with run loop");

        let exit = loop {
            if budget.exhausted() {
                break BatchExit::Completed;
            }

            let step = {
                let mut world = self.world.lock().await;
                step_world(&mut world)
            };
            match step {
                Step::Halted(reason) => break reason.into(),
                Step::Ticked {
                    events,
                    paused,
                    halt,
                } => {
                    self.deliver(&events);
                    budget.record(paused);
                    if let Some(reason) = halt {
                        break reason.into();
                    }
                }
            }

            if self.pause_for(self.tick_delay, true).await == Wake::Shutdown {
                tracing::info!("Shutdown during run batch");
                break BatchExit::Cancelled;
            }
        };

        finish(exit, &budget, reset_performed)
    }

    /// Parse and apply one line of control input
    ///
    /// Unknown input is ignored. Player commands fail with `NoPlayer` while
    /// the arena has no Player.
    pub async fn handle_control(&self, input: &str) -> Result<()> {
        let command = match input.parse::<ControlCommand>() {
            Ok(command) => command,
            Err(ArenaError::UnknownCommand(input)) => {
                tracing::trace!("Ignoring control input {:?}", input);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.apply_control(command).await
    }

    pub async fn apply_control(&self, command: ControlCommand) -> Result<()> {
        let events = {
            let mut world = self.world.lock().await;
            command.apply(&mut world)?
        };
        if command.interrupts_batch() {
            self.interrupt.notify_waiters();
        }
        self.deliver(&events);
        Ok(())
    }

    /// Run batches on a fixed cadence until shutdown
    ///
    /// The first batch starts after the initial delay. `limit` caps the
    /// number of batches. Returns how many batches ran.
    pub async fn run_on_cadence(&self, limit: Option<u32>) -> u32 {
        let start = tokio::time::Instant::now() + self.initial_delay;
        let mut cadence = tokio::time::interval_at(start, self.batch_interval);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = self.shutdown.clone();
        let mut batches = 0;

        while limit.map_or(true, |limit| batches < limit) {
            tokio::select! {
                _ = cadence.tick() => {}
                _ = shutdown_signalled(&mut shutdown) => break,
            }
            let report = self.run_batch().await;
            batches += 1;
            if report.exit == BatchExit::Cancelled {
                break;
            }
        }
        batches
    }

    fn deliver(&self, events: &[ArenaEvent]) {
        dispatch(self.broadcaster.as_ref(), events);
    }

    /// Sleep that ends early on shutdown, or on a batch interrupt when
    /// `interruptible` is set
    async fn pause_for(&self, duration: Duration, interruptible: bool) -> Wake {
        let mut shutdown = self.shutdown.clone();
        if *shutdown.borrow() {
            return Wake::Shutdown;
        }
        tokio::select! {
            _ = shutdown_signalled(&mut shutdown) => Wake::Shutdown,
            _ = self.interrupt.notified(), if interruptible => Wake::Interrupted,
            _ = tokio::time::sleep(duration) => Wake::Elapsed,
        }
    }
}

fn step_world(world: &mut World) -> Step {
    if let Some(reason) = world.halt_reason() {
        return Step::Halted(reason);
    }
    let paused = world.paused;
    let events = run_tick(world);
    Step::Ticked {
        events,
        paused,
        halt: world.halt_reason(),
    }
}

/// Resolves once shutdown is signalled; never resolves if the sender is gone
async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

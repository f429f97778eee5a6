//! Animal Arena - headless runner
//!
//! Runs the arena on its batch cadence, reads control commands from stdin
//! (one per line, e.g. steer-left or its short form left) and reports events
//! on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use animal_arena::broadcast::{ArenaEvent, ChannelBroadcaster};
use animal_arena::core::config::ArenaConfig;
use animal_arena::core::error::Result;
use animal_arena::simulation::ArenaDriver;
use animal_arena::world::World;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tokio::sync::{broadcast, watch};

/// Animal Arena - pursuit/evasion simulation
#[derive(Parser, Debug)]
#[command(name = "animal-arena")]
#[command(about = "Run the arena headless, steering the Player from stdin")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the Prey population
    #[arg(long)]
    prey: Option<u32>,

    /// Print every event as a JSON line
    #[arg(long)]
    json: bool,

    /// Stop after this many batches
    #[arg(long)]
    batches: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("animal_arena=info")),
        )
        .init();

    let config = load_config(&args)?;
    tracing::info!(
        "Animal Arena starting: {}x{} arena, {} prey",
        config.arena_width,
        config.arena_height,
        config.prey_count
    );

    let runtime = Runtime::new()?;
    let result = runtime.block_on(run(config, args.json, args.batches));
    // Blocking stdin reads would otherwise hold the runtime open
    runtime.shutdown_background();
    result
}

fn load_config(args: &Args) -> Result<ArenaConfig> {
    let mut config = match &args.config {
        Some(path) => ArenaConfig::load_from_toml(path)?,
        None => ArenaConfig::new(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(prey) = args.prey {
        config.prey_count = prey;
    }
    config.validate()?;
    Ok(config)
}

async fn run(config: ArenaConfig, json: bool, batches: Option<u32>) -> Result<()> {
    let (broadcaster, events) = ChannelBroadcaster::new(1024);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = Arc::new(ArenaDriver::new(
        World::new(config)?,
        Arc::new(broadcaster),
        shutdown_rx,
    ));

    tokio::spawn(report_events(events, json));
    tokio::spawn(read_controls(Arc::clone(&driver)));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let ran = driver.run_on_cadence(batches).await;

    let world = driver.world();
    let world = world.lock().await;
    tracing::info!(
        "Stopped after {} batches: generation {}, {} agents alive",
        ran,
        world.generation(),
        world.agent_count()
    );
    Ok(())
}

async fn report_events(mut events: broadcast::Receiver<ArenaEvent>, json: bool) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Event reporter lagged, {} events dropped", skipped);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        if json {
            match event.to_json() {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Unable to encode event: {}", e),
            }
            continue;
        }

        match event {
            ArenaEvent::News(message) => println!("{}", message),
            ArenaEvent::Score(score) => println!("Score: {}", score),
            ArenaEvent::AgentState(snapshot) => tracing::trace!("{:?}", snapshot),
        }
    }
}

async fn read_controls(driver: Arc<ArenaDriver>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Err(e) = driver.handle_control(&line).await {
                    tracing::warn!("Control {:?} rejected: {}", line.trim(), e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Stopped reading controls: {}", e);
                break;
            }
        }
    }
}

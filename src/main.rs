use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, mpsc};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use assurance::config;
use assurance::console::{self, LoggingToggle};
use assurance::state::AppState;
use assurance::trigger::KeyCombinationDetector;
use assurance::{AssuranceEvent, InboundEventQueue};

/// How long `replay` waits for the listener to drain before giving up.
const REPLAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(
    name = "assurance",
    version = env!("ASSURANCE_VERSION"),
    about = "Remote debugging session tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create ~/.assurance/ and a default config.toml
    Init,
    /// Print the effective configuration
    Config,
    /// Watch key input for the session toggle combination (default)
    Watch,
    /// Feed JSON-lines events through an inbound queue and print them in delivery order
    Replay {
        /// File with one JSON event per line
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load()?;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Init => {
            config::ensure_dirs()?;
            let path = config::config_path()?;
            if config::write_default(&path)? {
                println!("wrote default config to {}", path.display());
            } else {
                println!("config already exists at {}", path.display());
            }
            Ok(())
        }
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(&config).context("failed to render configuration")?;
            print!("{rendered}");
            Ok(())
        }
        Commands::Watch => {
            init_logging(&config)?;
            if !config.trigger.enabled {
                bail!("key combination trigger is disabled in config.toml");
            }
            let state = AppState::new(config.status_log.capacity);
            let detector =
                KeyCombinationDetector::new(config.trigger.sequence()?, LoggingToggle::new(state))?;
            console::run(detector)
        }
        Commands::Replay { file } => {
            init_logging(&config)?;
            run_replay(Path::new(&file))
        }
    }
}

/// Send tracing output to ~/.assurance/assurance.log at the configured level.
fn init_logging(config: &config::Config) -> Result<()> {
    config::ensure_dirs()?;
    let path = config::log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

/// Offer every event in `path` before starting the queue, then print them as
/// the listener receives them.
fn run_replay(path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let mut events = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event = AssuranceEvent::from_json(line)
            .with_context(|| format!("{}:{}: invalid event", path.display(), i + 1))?;
        events.push(event);
    }

    let (tx, rx) = mpsc::channel();
    let queue = InboundEventQueue::new(Box::new(move |event: AssuranceEvent| {
        let label = match event.control_type() {
            Some(command) => format!("{}:{command}", event.event_type),
            None => event.event_type.clone(),
        };
        println!("{label}\t{}", serde_json::Value::Object(event.payload));
        tx.send(())?;
        Ok(())
    }))?;

    let total = events.len();
    for event in events {
        queue.offer(event);
    }
    queue.start();

    for delivered in 0..total {
        if rx.recv_timeout(REPLAY_TIMEOUT).is_err() {
            queue.close();
            bail!("timed out after {delivered} of {total} events");
        }
    }
    queue.close();

    let failed = queue.failed_deliveries();
    if failed > 0 {
        bail!("{failed} event(s) failed to deliver");
    }
    eprintln!("replayed {total} events");
    Ok(())
}

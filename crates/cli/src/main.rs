//! Ordertrail CLI - simulated food-delivery tracking in the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ordertrail_sim::{CompletionWatcher, Outcome, RandomFaults, SimConfig, Simulator};
use ordertrail_storage::{CompletionStore, JsonStore};

mod console;

#[derive(Parser)]
#[command(name = "ordertrail")]
#[command(about = "Simulated food-delivery tracking", long_about = None)]
struct Cli {
    /// Directory holding tracking state
    #[arg(long, default_value = ".ordertrail", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a simulated delivery end to end
    Track {
        /// Scale the scripted delays down for a quick run
        #[arg(long)]
        fast: bool,
        /// Probability of a simulated update failure per attempt
        #[arg(long, default_value = "0.05")]
        failure_rate: f32,
        /// Seed for reproducible failure injection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show whether the last tracked delivery completed
    Status,
    /// Clear the completion flag
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(JsonStore::new(&cli.data_dir).await?);

    match cli.command {
        Commands::Track {
            fast,
            failure_rate,
            seed,
        } => track(store, fast, failure_rate, seed).await?,
        Commands::Status => {
            if store.is_completed().await? {
                println!("Last tracked delivery completed.");
            } else {
                println!("No completed delivery on record.");
            }
        }
        Commands::Reset => {
            store.set_completed(false).await?;
            println!("Completion flag cleared.");
        }
    }

    Ok(())
}

async fn track(
    store: Arc<JsonStore>,
    fast: bool,
    failure_rate: f32,
    seed: Option<u64>,
) -> Result<()> {
    let base = if fast {
        SimConfig::fast()
    } else {
        SimConfig::default()
    };
    let config = SimConfig {
        failure_rate,
        ..base
    };

    let faults = match seed {
        Some(seed) => RandomFaults::seeded(failure_rate, seed),
        None => RandomFaults::new(failure_rate),
    };

    let cancel = CancellationToken::new();

    // Ctrl-C requests a clean stop; the loop exits at its next
    // suspension point without marking completion.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("stop requested");
                cancel.cancel();
            }
        });
    }

    // Clear any stale marker before the watcher starts reading.
    store.set_completed(false).await?;

    // Independent observer reconciling displayed state with the store.
    let watch_cancel = CancellationToken::new();
    let watcher = CompletionWatcher::new(store.clone(), watch_cancel.clone());
    let watch_handle = tokio::spawn(watcher.watch());

    let sim = Simulator::new(store, console::ConsoleSink::new(), faults, cancel)
        .with_config(config);
    let order_id = sim.order_id();
    println!("Tracking order #{}", order_id.short());

    let outcome = sim.run().await;

    watch_cancel.cancel();
    let observed = watch_handle.await.unwrap_or(false);

    match outcome {
        Outcome::Completed => {
            println!(
                "Delivery complete{}",
                if observed { " (confirmed by watcher)" } else { "" }
            );
        }
        Outcome::Cancelled => println!("Tracking stopped before delivery finished."),
        Outcome::Failed => println!("Tracking ended after an unexpected failure."),
    }

    Ok(())
}
